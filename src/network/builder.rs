use itertools::Itertools;
use std::collections::BTreeMap;
use strum::IntoEnumIterator;
use tracing::{debug, info, warn};

use super::{CarryOver, FacilityRow, Network, RouteRow};
use crate::config::{Config, NetworkConfig, VesselConfig};
use crate::domain::{
    Capability, CapabilityTerms, FacilityKind, Node, NodeIndex, NodeKey, PerProduct, Period,
    Product, ProductionEdge, RouteKind, Slot, StorageEdge, TransportEdge, WetStorage,
};
use crate::error::{PlannerError, Result};
use crate::optimizer::cost::{vessel_route_cost, VesselClass};

/// Expands the facility and route tables into the time-expanded network
pub struct NetworkBuilder<'a> {
    vessel: &'a VesselConfig,
    settings: &'a NetworkConfig,
}

impl<'a> NetworkBuilder<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self {
            vessel: &config.vessel,
            settings: &config.network,
        }
    }

    pub fn build(&self, facilities: &[FacilityRow], routes: &[RouteRow]) -> Result<Network> {
        let mut network = Network::default();

        for row in facilities {
            if network.find(&row.name, Slot::Period(Period::first())).is_some() {
                warn!(location = %row.name, "duplicate facility row ignored");
                continue;
            }
            self.add_facility(&mut network, row);
        }

        for route in routes {
            self.add_route(&mut network, route)?;
        }

        let demand_sites = network
            .nodes
            .iter()
            .filter(|n| n.is_aggregate())
            .map(|n| n.location())
            .join(", ");
        info!(
            nodes = network.nodes.len(),
            demand_sites = %demand_sites,
            transport_edges = network.transport.len(),
            production_edges = network.production.len(),
            storage_edges = network.storage.len(),
            "network built"
        );

        Ok(network)
    }

    fn add_facility(&self, network: &mut Network, row: &FacilityRow) {
        let mut active: Vec<Capability> = row.kind.capabilities().to_vec();
        if row.offshore_foundation {
            active.push(Capability::OffshoreFoundationFabrication);
        }
        let mut carry: BTreeMap<Capability, CarryOver> = active
            .iter()
            .map(|c| (*c, CarryOver::for_capability(*c)))
            .collect();

        let wet_storage = row.wet_storage.then(|| WetStorage {
            unit_cost: row.wet_storage_cost.unwrap_or(0.0),
            capacity: whole(row.wet_storage_capacity),
        });

        let mut previous: Option<NodeIndex> = None;
        for period in Period::iter() {
            let capabilities = carry
                .iter_mut()
                .map(|(capability, carry)| {
                    let cells = row.cells(*capability);
                    let capacity = if *capability == Capability::TurbineInstallation {
                        installation_capacity(row, period)
                    } else {
                        carry.take_period(cells.capacity)
                    };
                    let terms = CapabilityTerms {
                        unit_cost: cells.unit_cost.unwrap_or(0.0),
                        capacity,
                    };
                    (*capability, terms)
                })
                .collect::<BTreeMap<_, _>>();

            let node = Node {
                key: NodeKey::new(row.name.clone(), Slot::Period(period)),
                latitude: row.latitude,
                longitude: row.longitude,
                kind: row.kind,
                capabilities,
                wet_storage,
                steel_supply: row.steel_supply,
                turbine_demand: 0,
            };
            let Some(index) = network.insert_node(node) else {
                continue;
            };

            let node = network.node(index);
            let production: Vec<ProductionEdge> = node
                .capabilities
                .iter()
                .map(|(capability, terms)| ProductionEdge {
                    node: index,
                    capability: *capability,
                    unit_cost: terms.unit_cost,
                    capacity: terms.capacity,
                })
                .collect();
            network.production.extend(production);

            if let Some(source) = previous {
                network.storage.push(StorageEdge {
                    source,
                    target: index,
                    unit_cost: wet_storage.map(|w| w.unit_cost).unwrap_or(0.0),
                    capacity: wet_storage.map(|w| w.capacity).unwrap_or(0),
                });
            }
            previous = Some(index);
        }

        if row.kind == FacilityKind::InstallationSite {
            self.add_demand_sink(network, row);
        }
    }

    /// Aggregate node holding the site's total demand, fed by one collection
    /// route per period
    fn add_demand_sink(&self, network: &mut Network, row: &FacilityRow) {
        let sink = Node {
            key: NodeKey::new(row.name.clone(), Slot::Aggregate),
            latitude: row.latitude,
            longitude: row.longitude,
            kind: row.kind,
            capabilities: BTreeMap::new(),
            wet_storage: None,
            steel_supply: 0,
            turbine_demand: row.turbine_demand,
        };
        let Some(sink) = network.insert_node(sink) else {
            return;
        };

        let vessel_exempt = self.settings.vessel_exempt_sites.contains(&row.name);
        if vessel_exempt {
            debug!(site = %row.name, "collection routes exempt from vessel capacity");
        }

        for period in Period::iter() {
            let Some(source) = network.find(&row.name, Slot::Period(period)) else {
                continue;
            };
            network.transport.push(TransportEdge {
                source,
                target: sink,
                period,
                kind: RouteKind::Collection,
                unit_cost: PerProduct::splat(0.0),
                capacity: PerProduct::splat(self.settings.collection_capacity),
                vessel_exempt,
            });
        }
    }

    fn add_route(&self, network: &mut Network, route: &RouteRow) -> Result<()> {
        for period in Period::iter() {
            let source = lookup(network, &route.source, period)?;
            let target = lookup(network, &route.target, period)?;

            let class =
                VesselClass::for_route(network.node(source).kind, network.node(target).kind);
            let vessel_cost = vessel_route_cost(route.distance_km, class, self.vessel);

            let mut unit_cost = PerProduct::splat(0.0);
            unit_cost[Product::Vessel] = vessel_cost;
            let mut capacity = PerProduct::splat(self.settings.route_capacity);
            capacity[Product::Vessel] = route.vessel_capacity;

            network.transport.push(TransportEdge {
                source,
                target,
                period,
                kind: RouteKind::Shipping,
                unit_cost,
                capacity,
                vessel_exempt: false,
            });
        }
        Ok(())
    }
}

fn lookup(network: &Network, location: &str, period: Period) -> Result<NodeIndex> {
    let slot = Slot::Period(period);
    network
        .find(location, slot)
        .ok_or_else(|| PlannerError::UnknownLocation {
            location: location.to_string(),
            slot,
        })
}

/// Installation is only possible from the site's earliest installable month on.
/// Outside that window the capacity is zero; inside it the nominal value applies
/// without carry-over.
fn installation_capacity(row: &FacilityRow, period: Period) -> u32 {
    let open = row.install_from.map_or(true, |from| period >= from);
    if open {
        whole(row.cells(Capability::TurbineInstallation).capacity)
    } else {
        0
    }
}

fn whole(value: Option<f64>) -> u32 {
    value.map(|v| v.max(0.0).trunc() as u32).unwrap_or(0)
}
