//! Read-only views over a solved plan
//!
//! A [`SolvedNetwork`] owns the network and the realized flow of every edge. It is
//! handed to whoever renders the plan and dropped with it.

use serde::Serialize;
use std::collections::BTreeMap;
use strum::IntoEnumIterator;

use crate::config::ReportConfig;
use crate::domain::{
    Capability, EdgeFunction, Node, NodeKey, Period, Product, ProductionEdge, StorageEdge,
    TransportEdge, STORED_PRODUCT,
};
use crate::network::Network;
use crate::optimizer::cost::realized_cost;
use crate::optimizer::{EdgeQuantities, FlowQuantities};

/// Realized output of one edge for one product
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlowRecord {
    pub function: EdgeFunction,
    pub source: NodeKey,
    pub target: NodeKey,
    pub period: Period,
    pub product: Product,
    pub quantity: f64,
}

/// What happened at one location in one period
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SiteActivity {
    pub location: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Onshore and at-sea foundation output combined
    pub foundations_built: f64,
    pub foundations_stored: f64,
    pub turbines_assembled: f64,
    pub turbines_installed: f64,
}

/// Products moved on one route in one period
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Shipment {
    pub source: String,
    pub target: String,
    pub products: BTreeMap<Product, f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeriodActivity {
    pub period: Period,
    pub sites: Vec<SiteActivity>,
    pub shipments: Vec<Shipment>,
}

/// (function, quantity) pairs realized at one node
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocationSummary {
    pub period: Period,
    pub location: String,
    pub entries: Vec<(EdgeFunction, f64)>,
}

/// Everything the CLI prints for a solved plan
#[derive(Debug, Clone, Serialize)]
pub struct PlanReport {
    pub total_cost: f64,
    pub transportation: Vec<FlowRecord>,
    pub production: Vec<LocationSummary>,
    pub storage: Vec<LocationSummary>,
    pub activity: Vec<PeriodActivity>,
}

#[derive(Debug, Clone)]
pub struct SolvedNetwork {
    network: Network,
    flows: FlowQuantities,
    total_cost: f64,
}

impl SolvedNetwork {
    pub fn new(network: Network, flows: FlowQuantities) -> Self {
        let total_cost = realized_cost(&network, &flows);
        Self {
            network,
            flows,
            total_cost,
        }
    }

    pub fn network(&self) -> &Network {
        &self.network
    }

    /// Objective value of the plan
    pub fn total_cost(&self) -> f64 {
        self.total_cost
    }

    pub fn transport_flows(&self) -> impl Iterator<Item = (&TransportEdge, &EdgeQuantities)> {
        self.network.transport.iter().zip(&self.flows.transport)
    }

    pub fn production_flows(&self) -> impl Iterator<Item = (&ProductionEdge, &EdgeQuantities)> {
        self.network.production.iter().zip(&self.flows.production)
    }

    pub fn storage_flows(&self) -> impl Iterator<Item = (&StorageEdge, &EdgeQuantities)> {
        self.network.storage.iter().zip(&self.flows.storage)
    }

    /// Shipped quantities at or above `threshold`; vessel uses are left out
    pub fn transportation_results(&self, threshold: f64) -> Vec<FlowRecord> {
        self.transport_flows()
            .flat_map(|(edge, q)| {
                let source = self.key(edge.source);
                let target = self.key(edge.target);
                Product::physical()
                    .filter(move |p| q.produced[*p] >= threshold)
                    .map(move |product| FlowRecord {
                        function: edge.function(),
                        source: source.clone(),
                        target: target.clone(),
                        period: edge.period,
                        product,
                        quantity: q.produced[product],
                    })
            })
            .collect()
    }

    pub fn production_results(&self, threshold: f64) -> Vec<FlowRecord> {
        let mut records = Vec::new();
        for (edge, q) in self.production_flows() {
            let node = self.network.node(edge.node);
            let Some(period) = node.slot().period() else {
                continue;
            };
            for product in Product::physical() {
                if q.produced[product] >= threshold {
                    records.push(FlowRecord {
                        function: edge.function(),
                        source: node.key.clone(),
                        target: node.key.clone(),
                        period,
                        product,
                        quantity: q.produced[product],
                    });
                }
            }
        }
        records
    }

    /// Inventory carried into each period at or above `threshold`, keyed by the
    /// period it arrives in
    pub fn storage_results(&self, threshold: f64) -> Vec<FlowRecord> {
        let mut records = Vec::new();
        for (edge, q) in self.storage_flows() {
            let target = self.network.node(edge.target);
            let Some(period) = target.slot().period() else {
                continue;
            };
            let quantity = q.produced[STORED_PRODUCT];
            if quantity >= threshold {
                records.push(FlowRecord {
                    function: edge.function(),
                    source: self.key(edge.source),
                    target: target.key.clone(),
                    period,
                    product: STORED_PRODUCT,
                    quantity,
                });
            }
        }
        records
    }

    /// Production per (period, location): what each capability turned out
    pub fn production_by_period_location(
        &self,
        threshold: f64,
    ) -> BTreeMap<(Period, String), Vec<(EdgeFunction, f64)>> {
        let mut summary: BTreeMap<(Period, String), Vec<(EdgeFunction, f64)>> = BTreeMap::new();
        for (edge, q) in self.production_flows() {
            let node = self.network.node(edge.node);
            let Some(period) = node.slot().period() else {
                continue;
            };
            let entries = summary
                .entry((period, node.location().to_string()))
                .or_default();
            for product in Product::physical() {
                if q.produced[product] >= threshold {
                    entries.push((edge.function(), q.produced[product]));
                }
            }
        }
        summary
    }

    /// Storage per (period, location), keyed by the period the inventory leaves
    pub fn storage_by_period_location(
        &self,
        threshold: f64,
    ) -> BTreeMap<(Period, String), Vec<(EdgeFunction, f64)>> {
        let mut summary: BTreeMap<(Period, String), Vec<(EdgeFunction, f64)>> = BTreeMap::new();
        for (edge, q) in self.storage_flows() {
            let node = self.network.node(edge.source);
            let Some(period) = node.slot().period() else {
                continue;
            };
            let entries = summary
                .entry((period, node.location().to_string()))
                .or_default();
            let quantity = q.produced[STORED_PRODUCT];
            if quantity >= threshold {
                entries.push((edge.function(), quantity));
            }
        }
        summary
    }

    /// Per-site counts and the routes that actually moved something in `period`
    pub fn period_activity(&self, period: Period) -> PeriodActivity {
        let sites = self
            .network
            .nodes
            .iter()
            .enumerate()
            .filter(|(_, node)| node.slot().period() == Some(period))
            .map(|(index, node)| self.site_activity(index, node))
            .collect();

        let shipments = self
            .transport_flows()
            .filter(|(edge, _)| edge.period == period)
            .filter(|(edge, _)| !self.network.node(edge.target).is_aggregate())
            .filter_map(|(edge, q)| {
                let products: BTreeMap<Product, f64> = q
                    .produced
                    .iter()
                    .map(|(p, v)| (p, v.round()))
                    .filter(|(_, v)| *v > 0.0)
                    .collect();
                (!products.is_empty()).then(|| Shipment {
                    source: self.network.node(edge.source).location().to_string(),
                    target: self.network.node(edge.target).location().to_string(),
                    products,
                })
            })
            .collect();

        PeriodActivity {
            period,
            sites,
            shipments,
        }
    }

    fn site_activity(&self, index: usize, node: &Node) -> SiteActivity {
        let produced = |capabilities: &[Capability], product: Product| -> f64 {
            self.production_flows()
                .filter(|(edge, _)| edge.node == index && capabilities.contains(&edge.capability))
                .map(|(_, q)| q.produced[product])
                .sum::<f64>()
                .round()
        };
        let foundations_stored = self
            .storage_flows()
            .filter(|(edge, _)| edge.source == index)
            .map(|(_, q)| q.produced[STORED_PRODUCT])
            .sum::<f64>()
            .round();

        SiteActivity {
            location: node.location().to_string(),
            latitude: node.latitude,
            longitude: node.longitude,
            foundations_built: produced(
                &[
                    Capability::FoundationFabrication,
                    Capability::OffshoreFoundationFabrication,
                ],
                Product::Foundation,
            ),
            foundations_stored,
            turbines_assembled: produced(&[Capability::TurbineAssembly], Product::Turbine),
            turbines_installed: produced(
                &[Capability::TurbineInstallation],
                Product::InstalledTurbine,
            ),
        }
    }

    pub fn report(&self, config: &ReportConfig) -> PlanReport {
        let threshold = config.materiality_threshold;
        let summaries = |map: BTreeMap<(Period, String), Vec<(EdgeFunction, f64)>>| {
            map.into_iter()
                .filter(|(_, entries)| !entries.is_empty())
                .map(|((period, location), entries)| LocationSummary {
                    period,
                    location,
                    entries,
                })
                .collect::<Vec<_>>()
        };

        PlanReport {
            total_cost: self.total_cost,
            transportation: self.transportation_results(threshold),
            production: summaries(self.production_by_period_location(threshold)),
            storage: summaries(self.storage_by_period_location(threshold)),
            activity: Period::iter()
                .map(|period| self.period_activity(period))
                .collect(),
        }
    }

    fn key(&self, index: usize) -> NodeKey {
        self.network.node(index).key.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::domain::{FacilityKind, Slot};
    use crate::network::{CapabilityCells, FacilityRow, NetworkBuilder, RouteRow};
    use strum::EnumCount;

    fn facility(name: &str, kind: FacilityKind) -> FacilityRow {
        FacilityRow {
            name: name.to_string(),
            latitude: 35.0,
            longitude: 135.0,
            kind,
            wet_storage: false,
            wet_storage_cost: None,
            wet_storage_capacity: None,
            offshore_foundation: false,
            capabilities: [CapabilityCells::default(); Capability::COUNT],
            steel_supply: 0,
            turbine_demand: 0,
            install_from: None,
        }
    }

    /// Yard -> port network with hand-written flows instead of a solver run
    fn solved(edit: impl FnOnce(&Network, &mut FlowQuantities)) -> SolvedNetwork {
        let mut yard = facility("Aioi", FacilityKind::LargeShipyard);
        yard.capabilities[Capability::FoundationFabrication.index()] = CapabilityCells {
            unit_cost: Some(3.0),
            capacity: Some(2.0),
        };
        let port = facility("Akita", FacilityKind::BasePort);
        let route = RouteRow {
            source: "Aioi".to_string(),
            target: "Akita".to_string(),
            distance_km: 100.0,
            vessel_capacity: 5.0,
        };
        let config = Config::default();
        let network = NetworkBuilder::new(&config)
            .build(&[yard, port], &[route])
            .unwrap();
        let mut flows = FlowQuantities {
            transport: vec![EdgeQuantities::default(); network.transport.len()],
            production: vec![EdgeQuantities::default(); network.production.len()],
            storage: vec![EdgeQuantities::default(); network.storage.len()],
        };
        edit(&network, &mut flows);
        SolvedNetwork::new(network, flows)
    }

    fn foundation_edge(network: &Network, period: Period) -> usize {
        network
            .production
            .iter()
            .position(|e| {
                e.capability == Capability::FoundationFabrication
                    && network.node(e.node).slot() == Slot::Period(period)
            })
            .unwrap()
    }

    #[test]
    fn test_transportation_skips_vessels_and_noise() {
        let solved = solved(|_, flows| {
            let q = &mut flows.transport[0];
            q.produced[Product::Foundation] = 2.0;
            q.produced[Product::Module] = 0.05;
            q.produced[Product::Vessel] = 1.0;
        });
        let records = solved.transportation_results(0.1);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].product, Product::Foundation);
        assert_eq!(records[0].period, Period::November);
        assert_eq!(records[0].source, NodeKey::new("Aioi", Slot::Period(Period::November)));
        assert_eq!(records[0].target.location, "Akita");
    }

    #[test]
    fn test_total_cost_sums_realized_flows() {
        let solved = solved(|network, flows| {
            flows.transport[0].produced[Product::Vessel] = 1.0;
            let index = foundation_edge(network, Period::January);
            flows.production[index].produced[Product::Foundation] = 2.0;
        });
        // one transport vessel-day round trip at 5 knots plus the distance, and two foundations
        let expected = 2.0 * 2_974_000.0 + 100.0 + 2.0 * 3.0;
        assert!((solved.total_cost() - expected).abs() < 1e-6);
    }

    #[test]
    fn test_production_summary_by_period_location() {
        let solved = solved(|network, flows| {
            let index = foundation_edge(network, Period::March);
            flows.production[index].consumed[Product::HalfHull1] = 1.0;
            flows.production[index].consumed[Product::HalfHull3] = 1.0;
            flows.production[index].produced[Product::Foundation] = 1.0;
        });
        let summary = solved.production_by_period_location(0.1);
        let entries = &summary[&(Period::March, "Aioi".to_string())];
        assert_eq!(
            entries,
            &vec![(EdgeFunction::Production(Capability::FoundationFabrication), 1.0)]
        );
        assert!(summary[&(Period::April, "Aioi".to_string())].is_empty());
        assert_eq!(solved.production_results(0.1).len(), 1);
    }

    #[test]
    fn test_period_activity_omits_idle_routes() {
        let solved = solved(|network, flows| {
            let index = foundation_edge(network, Period::May);
            flows.production[index].produced[Product::Foundation] = 2.0;
            let may = network
                .transport
                .iter()
                .position(|e| e.period == Period::May)
                .unwrap();
            flows.transport[may].produced[Product::Foundation] = 2.0;
            flows.transport[may].produced[Product::Vessel] = 1.0;
        });

        let may = solved.period_activity(Period::May);
        assert_eq!(may.sites.len(), 2);
        let yard = may.sites.iter().find(|s| s.location == "Aioi").unwrap();
        assert_eq!(yard.foundations_built, 2.0);
        assert_eq!(yard.turbines_installed, 0.0);
        assert_eq!(may.shipments.len(), 1);
        assert_eq!(may.shipments[0].products[&Product::Foundation], 2.0);
        assert_eq!(may.shipments[0].products[&Product::Vessel], 1.0);

        let june = solved.period_activity(Period::June);
        assert!(june.shipments.is_empty());
    }

    #[test]
    fn test_report_drops_empty_summaries() {
        let solved = solved(|_, _| {});
        let report = solved.report(&ReportConfig::default());
        assert_eq!(report.total_cost, 0.0);
        assert!(report.production.is_empty());
        assert!(report.storage.is_empty());
        assert_eq!(report.activity.len(), Period::COUNT);
        let json = serde_json::to_value(&report).unwrap();
        assert!(json["activity"][0]["sites"].is_array());
    }
}
