//! Decision variables
//!
//! Every edge gets one integer flow variable per product and side that can carry
//! anything. Transport and storage edges pass goods through unchanged, so the
//! consumed and produced side share a single variable. Production edges have
//! separate variables for what they consume and what they produce, as given by
//! the recipe table. A missing variable means the flow is fixed at zero.

use good_lp::{variable, ProblemVariables, Solution, Variable};
use serde::Serialize;
use strum::IntoEnumIterator;

use super::recipes::recipe;
use crate::domain::{PerProduct, Product, Side};
use crate::network::Network;

#[derive(Debug, Clone)]
pub struct EdgeFlows {
    consumed: PerProduct<Option<Variable>>,
    produced: PerProduct<Option<Variable>>,
}

impl EdgeFlows {
    fn passthrough(vars: PerProduct<Option<Variable>>) -> Self {
        Self {
            consumed: vars.clone(),
            produced: vars,
        }
    }

    pub fn consumed(&self, product: Product) -> Option<Variable> {
        self.consumed[product]
    }

    pub fn produced(&self, product: Product) -> Option<Variable> {
        self.produced[product]
    }

    pub fn get(&self, side: Side, product: Product) -> Option<Variable> {
        match side {
            Side::Consumed => self.consumed(product),
            Side::Produced => self.produced(product),
        }
    }

    pub fn evaluate(&self, solution: &impl Solution) -> EdgeQuantities {
        let read = |v: &Option<Variable>| v.map(|v| solution.value(v)).unwrap_or(0.0);
        EdgeQuantities {
            consumed: self.consumed.map(|_, v| read(v)),
            produced: self.produced.map(|_, v| read(v)),
        }
    }
}

/// Realized flows of one edge
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EdgeQuantities {
    pub consumed: PerProduct<f64>,
    pub produced: PerProduct<f64>,
}

impl EdgeQuantities {
    pub fn get(&self, side: Side, product: Product) -> f64 {
        match side {
            Side::Consumed => self.consumed[product],
            Side::Produced => self.produced[product],
        }
    }
}

/// Variable table for a whole network, aligned with its edge vectors
#[derive(Debug, Clone)]
pub struct FlowVariables {
    pub transport: Vec<EdgeFlows>,
    pub production: Vec<EdgeFlows>,
    pub storage: Vec<EdgeFlows>,
    count: usize,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct FlowQuantities {
    pub transport: Vec<EdgeQuantities>,
    pub production: Vec<EdgeQuantities>,
    pub storage: Vec<EdgeQuantities>,
}

impl FlowVariables {
    pub fn register(network: &Network, vars: &mut ProblemVariables) -> Self {
        let mut count = 0;
        let mut flow = |capacity: f64| -> Option<Variable> {
            (capacity > 0.0).then(|| {
                count += 1;
                vars.add(variable().integer().min(0.0).max(capacity))
            })
        };

        let transport = network
            .transport
            .iter()
            .map(|edge| {
                EdgeFlows::passthrough(PerProduct::from_fn(|product| {
                    if product == Product::Vessel && edge.vessel_exempt {
                        None
                    } else {
                        flow(edge.capacity[product])
                    }
                }))
            })
            .collect();

        let production = network
            .production
            .iter()
            .map(|edge| {
                let recipe = recipe(edge.capability);
                let capacity = f64::from(edge.capacity);
                let mut side_flows = |side: Side| {
                    PerProduct::from_fn(|product| {
                        recipe
                            .capacity_factor(side, product)
                            .and_then(|factor| flow(factor * capacity))
                    })
                };
                let consumed = side_flows(Side::Consumed);
                let produced = side_flows(Side::Produced);
                EdgeFlows { consumed, produced }
            })
            .collect();

        let storage = network
            .storage
            .iter()
            .map(|edge| {
                EdgeFlows::passthrough(PerProduct::from_fn(|product| {
                    flow(edge.capacity_of(product))
                }))
            })
            .collect();

        Self {
            transport,
            production,
            storage,
            count,
        }
    }

    /// Number of variables registered
    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn evaluate(&self, solution: &impl Solution) -> FlowQuantities {
        let read = |edges: &[EdgeFlows]| -> Vec<EdgeQuantities> {
            edges.iter().map(|e| e.evaluate(solution)).collect()
        };
        FlowQuantities {
            transport: read(&self.transport),
            production: read(&self.production),
            storage: read(&self.storage),
        }
    }
}

/// Products that may move on a transport edge
pub fn shipped_products() -> impl Iterator<Item = Product> {
    Product::iter().filter(|p| p.vessel_share() > 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::domain::{Capability, FacilityKind, Period};
    use crate::network::{CapabilityCells, FacilityRow, NetworkBuilder};
    use strum::EnumCount;

    fn yard() -> FacilityRow {
        let mut capabilities = [CapabilityCells::default(); Capability::COUNT];
        capabilities[Capability::HalfHull3Fabrication.index()] = CapabilityCells {
            unit_cost: Some(5.0),
            capacity: Some(2.0),
        };
        FacilityRow {
            name: "Aioi".to_string(),
            latitude: 34.8,
            longitude: 134.5,
            kind: FacilityKind::MediumShipyard,
            wet_storage: false,
            wet_storage_cost: None,
            wet_storage_capacity: None,
            offshore_foundation: false,
            capabilities,
            steel_supply: 10,
            turbine_demand: 0,
            install_from: Some(Period::January),
        }
    }

    #[test]
    fn test_production_variables_follow_recipe() {
        let config = Config::default();
        let network = NetworkBuilder::new(&config).build(&[yard()], &[]).unwrap();
        let mut vars = ProblemVariables::new();
        let flows = FlowVariables::register(&network, &mut vars);

        let (index, _) = network
            .production
            .iter()
            .enumerate()
            .find(|(_, e)| e.capability == Capability::HalfHull3Fabrication)
            .unwrap();
        let edge = &flows.production[index];
        assert!(edge.consumed(Product::Module).is_some());
        assert!(edge.produced(Product::HalfHull3).is_some());
        assert!(edge.produced(Product::Module).is_none());
        assert!(edge.consumed(Product::Vessel).is_none());
        assert!(edge.produced(Product::Vessel).is_none());
    }

    #[test]
    fn test_zero_capacity_edges_get_no_variables() {
        let config = Config::default();
        let network = NetworkBuilder::new(&config).build(&[yard()], &[]).unwrap();
        let mut vars = ProblemVariables::new();
        let flows = FlowVariables::register(&network, &mut vars);

        // no wet storage, and module/half-hull-1 capacities are absent
        assert!(flows.storage.iter().all(|e| Product::iter().all(|p| e.produced(p).is_none())));
        // half-hull-3 fabrication in each of 12 periods: module in + half-hull-3 out
        assert_eq!(flows.len(), 24);
    }

    #[test]
    fn test_shipped_products_exclude_installed_turbines() {
        let shipped: Vec<Product> = shipped_products().collect();
        assert_eq!(shipped.len(), 6);
        assert!(!shipped.contains(&Product::InstalledTurbine));
        assert!(!shipped.contains(&Product::Vessel));
    }
}
