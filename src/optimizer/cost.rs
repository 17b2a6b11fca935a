//! Vessel pricing and the plan objective

use good_lp::Expression;

use super::flows::{EdgeFlows, FlowQuantities, FlowVariables};
use super::recipes::recipe;
use crate::config::VesselConfig;
use crate::domain::{FacilityKind, PerProduct, ProductionEdge, StorageEdge};
use crate::network::Network;

const HOURS_PER_DAY: f64 = 24.0;

/// Which charter applies to a route
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VesselClass {
    /// Base port to installation site: one large installation vessel
    Installation,
    /// Every other route: two standard transport vessels
    Transport,
}

impl VesselClass {
    pub fn for_route(source: FacilityKind, target: FacilityKind) -> Self {
        if source == FacilityKind::BasePort && target == FacilityKind::InstallationSite {
            VesselClass::Installation
        } else {
            VesselClass::Transport
        }
    }
}

/// Cost of one vessel-use on a route: a round trip charged at the day rate for
/// every started day of one-way transit, plus the one-way distance.
pub fn vessel_route_cost(distance_km: f64, class: VesselClass, config: &VesselConfig) -> f64 {
    let (day_rate, speed_knots) = match class {
        VesselClass::Installation => (config.install_day_rate, config.install_speed_knots),
        VesselClass::Transport => (config.transport_day_rate, config.transport_speed_knots),
    };
    let km_per_day = HOURS_PER_DAY * speed_knots * config.km_per_nautical_mile;
    let transit_days = (distance_km.max(0.0) / km_per_day).ceil();
    2.0 * day_rate * transit_days + distance_km
}

/// Per-product unit costs of a production edge; only the recipe's main output is charged
pub fn production_unit_costs(edge: &ProductionEdge) -> PerProduct<f64> {
    let costed = recipe(edge.capability).costed_product();
    PerProduct::from_fn(|p| if p == costed { edge.unit_cost } else { 0.0 })
}

pub fn storage_unit_costs(edge: &StorageEdge) -> PerProduct<f64> {
    PerProduct::from_fn(|p| edge.unit_cost_of(p))
}

/// Sum over every edge and product of unit cost x produced flow
pub fn objective(network: &Network, flows: &FlowVariables) -> Expression {
    let mut objective = Expression::default();
    let mut charge = |costs: &PerProduct<f64>, edge: &EdgeFlows| {
        for (product, cost) in costs.iter() {
            if *cost == 0.0 {
                continue;
            }
            if let Some(var) = edge.produced(product) {
                objective.add_mul(*cost, var);
            }
        }
    };

    for (edge, vars) in network.transport.iter().zip(&flows.transport) {
        charge(&edge.unit_cost, vars);
    }
    for (edge, vars) in network.production.iter().zip(&flows.production) {
        charge(&production_unit_costs(edge), vars);
    }
    for (edge, vars) in network.storage.iter().zip(&flows.storage) {
        charge(&storage_unit_costs(edge), vars);
    }

    objective
}

/// Objective value of a solved plan, recomputed from realized flows
pub fn realized_cost(network: &Network, quantities: &FlowQuantities) -> f64 {
    let weigh = |costs: &PerProduct<f64>, produced: &PerProduct<f64>| -> f64 {
        costs.iter().map(|(p, c)| c * produced[p]).sum()
    };

    let transport: f64 = network
        .transport
        .iter()
        .zip(&quantities.transport)
        .map(|(e, q)| weigh(&e.unit_cost, &q.produced))
        .sum();
    let production: f64 = network
        .production
        .iter()
        .zip(&quantities.production)
        .map(|(e, q)| weigh(&production_unit_costs(e), &q.produced))
        .sum();
    let storage: f64 = network
        .storage
        .iter()
        .zip(&quantities.storage)
        .map(|(e, q)| weigh(&storage_unit_costs(e), &q.produced))
        .sum();

    transport + production + storage
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Capability, Product};
    use rstest::rstest;

    #[rstest]
    #[case(FacilityKind::BasePort, FacilityKind::InstallationSite, VesselClass::Installation)]
    #[case(FacilityKind::LargeShipyard, FacilityKind::BasePort, VesselClass::Transport)]
    #[case(FacilityKind::InstallationSite, FacilityKind::BasePort, VesselClass::Transport)]
    #[case(FacilityKind::BasePort, FacilityKind::BasePort, VesselClass::Transport)]
    fn test_route_class(
        #[case] source: FacilityKind,
        #[case] target: FacilityKind,
        #[case] expected: VesselClass,
    ) {
        assert_eq!(VesselClass::for_route(source, target), expected);
    }

    #[test]
    fn test_zero_distance_is_free() {
        let config = VesselConfig::default();
        assert_eq!(vessel_route_cost(0.0, VesselClass::Transport, &config), 0.0);
        assert_eq!(vessel_route_cost(0.0, VesselClass::Installation, &config), 0.0);
    }

    #[test]
    fn test_transit_days_round_up() {
        let config = VesselConfig::default();
        // 5 knots: 222.24 km per day
        let one_day = vessel_route_cost(222.0, VesselClass::Transport, &config);
        assert_eq!(one_day, 2.0 * 2_974_000.0 + 222.0);
        let two_days = vessel_route_cost(223.0, VesselClass::Transport, &config);
        assert_eq!(two_days, 2.0 * 2_974_000.0 * 2.0 + 223.0);
    }

    #[test]
    fn test_installation_vessel_is_faster_but_dearer() {
        let config = VesselConfig::default();
        // 10 knots: 444.48 km per day, so 400 km is one day for both classes' rounding
        let install = vessel_route_cost(400.0, VesselClass::Installation, &config);
        let transport = vessel_route_cost(400.0, VesselClass::Transport, &config);
        assert_eq!(install, 2.0 * 10_100_000.0 + 400.0);
        assert_eq!(transport, 2.0 * 2_974_000.0 * 2.0 + 400.0);
    }

    #[test]
    fn test_production_charges_main_output_only() {
        let edge = ProductionEdge {
            node: 0,
            capability: Capability::HalfHull3Fabrication,
            unit_cost: 7.5,
            capacity: 1,
        };
        let costs = production_unit_costs(&edge);
        assert_eq!(costs[Product::HalfHull3], 7.5);
        assert_eq!(costs[Product::Module], 0.0);
        assert_eq!(costs.iter().filter(|(_, c)| **c > 0.0).count(), 1);
    }
}
