//! Shared fixtures: in-memory facility and route tables, plus checks that a
//! solved plan respects its own constraints.

#![allow(dead_code)]

use strum::EnumCount;
use windfarm_logistics::domain::{Capability, Product, Side, Slot};
use windfarm_logistics::optimizer::recipe;
use windfarm_logistics::optimizer::recipes::Term;
use windfarm_logistics::SolvedNetwork;

pub const TOLERANCE: f64 = 1e-6;

pub const FACILITY_HEADER: &str = "name,lat,lon,kind,wet,wet_cost,wet_cap,offshore,note,\
    module_cost,module_cap,,hh1_cost,hh1_cap,,hh3_cost,hh3_cap,,\
    foundation_cost,foundation_cap,,offshore_cost,offshore_cap,,\
    assembly_cost,assembly_cap,,install_cost,install_cap,steel,demand,install_from";

pub const ROUTE_HEADER: &str = "source,target,note,distance_km,vessel_capacity";

/// One facility table row
#[derive(Debug, Clone)]
pub struct Facility {
    name: String,
    kind: String,
    wet_storage: Option<(f64, f64)>,
    capabilities: [Option<(f64, f64)>; 7],
    steel: u32,
    demand: u32,
    install_from: String,
}

impl Facility {
    pub fn new(name: &str, kind: &str) -> Self {
        Self {
            name: name.to_string(),
            kind: kind.to_string(),
            wet_storage: None,
            capabilities: [None; 7],
            steel: 0,
            demand: 0,
            install_from: String::new(),
        }
    }

    /// Nominal monthly (unit cost, capacity)
    pub fn capability(mut self, capability: Capability, cost: f64, capacity: f64) -> Self {
        self.capabilities[capability.index()] = Some((cost, capacity));
        self
    }

    pub fn wet_storage(mut self, cost: f64, capacity: f64) -> Self {
        self.wet_storage = Some((cost, capacity));
        self
    }

    pub fn steel(mut self, steel: u32) -> Self {
        self.steel = steel;
        self
    }

    pub fn demand(mut self, demand: u32, install_from: &str) -> Self {
        self.demand = demand;
        self.install_from = install_from.to_string();
        self
    }

    pub fn line(&self) -> String {
        let (wet, wet_cost, wet_cap) = match self.wet_storage {
            Some((cost, capacity)) => ("TRUE".to_string(), cost.to_string(), capacity.to_string()),
            None => ("FALSE".to_string(), String::new(), String::new()),
        };
        let mut cells = vec![
            self.name.clone(),
            "39.0".to_string(),
            "140.0".to_string(),
            self.kind.clone(),
            wet,
            wet_cost,
            wet_cap,
            "FALSE".to_string(),
            String::new(),
        ];
        for (i, terms) in self.capabilities.iter().enumerate() {
            let (cost, capacity) = match terms {
                Some((cost, capacity)) => (cost.to_string(), capacity.to_string()),
                None => (String::new(), String::new()),
            };
            cells.push(cost);
            cells.push(capacity);
            // the last triple's spare column is taken by steel supply
            if i < 6 {
                cells.push(String::new());
            }
        }
        cells.push(self.steel.to_string());
        cells.push(self.demand.to_string());
        cells.push(self.install_from.clone());
        cells.join(",")
    }
}

pub fn facility_table(rows: &[Facility]) -> String {
    let mut table = String::from(FACILITY_HEADER);
    for row in rows {
        table.push('\n');
        table.push_str(&row.line());
    }
    table.push('\n');
    table
}

pub fn route_table(routes: &[(&str, &str, f64, f64)]) -> String {
    let mut table = String::from(ROUTE_HEADER);
    for (source, target, distance, vessels) in routes {
        table.push_str(&format!("\n{source},{target},,{distance},{vessels}"));
    }
    table.push('\n');
    table
}

/// Yard -> port -> site at zero distance. Costs per capability are given in
/// capability order; pass zeros for a free chain.
pub fn chain(costs: [f64; 7]) -> (String, String) {
    chain_with_steel(costs, 10)
}

pub fn chain_with_steel(costs: [f64; 7], steel: u32) -> (String, String) {
    let yard = Facility::new("Yard", "large_shipyard")
        .capability(Capability::ModuleFabrication, costs[0], 1.0)
        .capability(Capability::HalfHull1Fabrication, costs[1], 1.0)
        .capability(Capability::HalfHull3Fabrication, costs[2], 1.0)
        .capability(Capability::FoundationFabrication, costs[3], 1.0)
        .steel(steel);
    let port = Facility::new("Port", "base_port")
        .capability(Capability::TurbineAssembly, costs[5], 5.0);
    let site = Facility::new("Site", "installation_site")
        .capability(Capability::TurbineInstallation, costs[6], 5.0)
        .demand(1, "6月");

    (
        facility_table(&[yard, port, site]),
        route_table(&[("Yard", "Port", 0.0, 10.0), ("Port", "Site", 0.0, 10.0)]),
    )
}

/// Total output of one capability over the whole horizon
pub fn produced(solved: &SolvedNetwork, capability: Capability) -> f64 {
    let product = recipe(capability).costed_product();
    solved
        .production_flows()
        .filter(|(edge, _)| edge.capability == capability)
        .map(|(_, q)| q.produced[product])
        .sum()
}

pub fn assert_mass_balance(solved: &SolvedNetwork) {
    let network = solved.network();
    let mut net = vec![[0.0_f64; Product::COUNT]; network.nodes.len()];

    for (edge, q) in solved.transport_flows() {
        for product in Product::physical() {
            net[edge.source][product.index()] += q.consumed[product];
            net[edge.target][product.index()] -= q.produced[product];
        }
    }
    for (edge, q) in solved.storage_flows() {
        for product in Product::physical() {
            net[edge.source][product.index()] += q.consumed[product];
            net[edge.target][product.index()] -= q.produced[product];
        }
    }
    for (edge, q) in solved.production_flows() {
        for product in Product::physical() {
            net[edge.node][product.index()] += q.consumed[product];
            net[edge.node][product.index()] -= q.produced[product];
        }
    }

    for (node, balance) in network.nodes.iter().zip(&net) {
        for product in Product::physical() {
            assert!(
                balance[product.index()] <= node.supply(product) + TOLERANCE,
                "mass balance broken at {} for {}: {} > {}",
                node.key,
                product,
                balance[product.index()],
                node.supply(product)
            );
        }
    }
}

pub fn assert_bill_of_materials(solved: &SolvedNetwork) {
    for (edge, q) in solved.production_flows() {
        for balance in recipe(edge.capability).balances {
            let side = |terms: &[Term]| -> f64 {
                terms
                    .iter()
                    .map(|t| t.coefficient * q.get(t.side, t.product))
                    .sum()
            };
            let (lhs, rhs) = (side(balance.lhs), side(balance.rhs));
            assert!(
                (lhs - rhs).abs() < TOLERANCE,
                "{} unbalanced at node {}: {} vs {}",
                edge.capability,
                solved.network().node(edge.node).key,
                lhs,
                rhs
            );
        }
        assert!(q.get(Side::Consumed, Product::Vessel).abs() < TOLERANCE);
    }
}

pub fn assert_vessel_coupling(solved: &SolvedNetwork) {
    for (edge, q) in solved.transport_flows() {
        if edge.vessel_exempt {
            assert!(q.produced[Product::Vessel].abs() < TOLERANCE);
        }
        let load: f64 = Product::physical()
            .map(|p| p.vessel_share() * q.produced[p])
            .sum();
        assert!(
            q.produced[Product::Vessel] + TOLERANCE >= load,
            "vessel shortfall on {} -> {}",
            solved.network().node(edge.source).key,
            solved.network().node(edge.target).key
        );
    }
}

/// Installed turbines collected by a site's aggregate node
pub fn installed_at(solved: &SolvedNetwork, site: &str) -> f64 {
    let network = solved.network();
    let Some(sink) = network.find(site, Slot::Aggregate) else {
        return 0.0;
    };
    solved
        .transport_flows()
        .filter(|(edge, _)| edge.target == sink)
        .map(|(_, q)| q.produced[Product::InstalledTurbine])
        .sum()
}
