use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

use super::{Capability, FacilityKind, Period, Product};

/// Time coordinate of a node. Installation sites get one extra `Aggregate`
/// node that collects installed turbines from every period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Slot {
    Period(Period),
    Aggregate,
}

impl Slot {
    pub fn period(self) -> Option<Period> {
        match self {
            Slot::Period(period) => Some(period),
            Slot::Aggregate => None,
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Slot::Period(period) => write!(f, "{}", period),
            Slot::Aggregate => f.write_str("aggregate"),
        }
    }
}

/// Unique node identity: (location, slot)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NodeKey {
    pub location: String,
    pub slot: Slot,
}

impl NodeKey {
    pub fn new(location: impl Into<String>, slot: Slot) -> Self {
        Self {
            location: location.into(),
            slot,
        }
    }
}

impl fmt::Display for NodeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}_{})", self.location, self.slot)
    }
}

/// Monthly terms of one active capability
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CapabilityTerms {
    /// Cost per unit of the capability's output
    pub unit_cost: f64,
    /// Integer capacity for this period, after carry-over and seasonal gating
    pub capacity: u32,
}

/// Wet-storage terms (foundations held afloat between months)
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WetStorage {
    pub unit_cost: f64,
    pub capacity: u32,
}

/// A (location, slot) planning point
#[derive(Debug, Clone, Serialize)]
pub struct Node {
    pub key: NodeKey,
    pub latitude: f64,
    pub longitude: f64,
    pub kind: FacilityKind,
    /// Active capabilities only
    pub capabilities: BTreeMap<Capability, CapabilityTerms>,
    pub wet_storage: Option<WetStorage>,
    pub steel_supply: u32,
    pub turbine_demand: u32,
}

impl Node {
    pub fn location(&self) -> &str {
        &self.key.location
    }

    pub fn slot(&self) -> Slot {
        self.key.slot
    }

    pub fn is_aggregate(&self) -> bool {
        self.key.slot == Slot::Aggregate
    }

    pub fn has(&self, capability: Capability) -> bool {
        self.capabilities.contains_key(&capability)
    }

    /// Exogenous supply (positive) or demand (negative) of a product at this node
    pub fn supply(&self, product: Product) -> f64 {
        match product {
            Product::Steel => f64::from(self.steel_supply),
            Product::InstalledTurbine => -f64::from(self.turbine_demand),
            _ => 0.0,
        }
    }
}
