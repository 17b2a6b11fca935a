use serde::Serialize;

use super::{Capability, EdgeFunction, PerProduct, Period, Product};

/// Position of a node in `Network::nodes`
pub type NodeIndex = usize;

/// Product carried by storage edges
pub const STORED_PRODUCT: Product = Product::Foundation;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteKind {
    /// Same-period shipment between two locations
    Shipping,
    /// Site period node to the site's aggregate demand node
    Collection,
}

#[derive(Debug, Clone, Serialize)]
pub struct TransportEdge {
    pub source: NodeIndex,
    pub target: NodeIndex,
    pub period: Period,
    pub kind: RouteKind,
    pub unit_cost: PerProduct<f64>,
    pub capacity: PerProduct<f64>,
    /// Route draws no vessel capacity; its vessel flow is pinned to zero
    pub vessel_exempt: bool,
}

/// Self-loop converting products at one node
#[derive(Debug, Clone, Serialize)]
pub struct ProductionEdge {
    pub node: NodeIndex,
    pub capability: Capability,
    pub unit_cost: f64,
    pub capacity: u32,
}

/// Carries inventory from a location's node in one period to the next period
#[derive(Debug, Clone, Serialize)]
pub struct StorageEdge {
    pub source: NodeIndex,
    pub target: NodeIndex,
    pub unit_cost: f64,
    pub capacity: u32,
}

impl StorageEdge {
    pub fn unit_cost_of(&self, product: Product) -> f64 {
        if product == STORED_PRODUCT {
            self.unit_cost
        } else {
            0.0
        }
    }

    pub fn capacity_of(&self, product: Product) -> f64 {
        if product == STORED_PRODUCT {
            f64::from(self.capacity)
        } else {
            0.0
        }
    }

    pub fn function(&self) -> EdgeFunction {
        EdgeFunction::Storage
    }
}

impl TransportEdge {
    pub fn function(&self) -> EdgeFunction {
        EdgeFunction::Transport
    }
}

impl ProductionEdge {
    pub fn function(&self) -> EdgeFunction {
        EdgeFunction::Production(self.capability)
    }
}
