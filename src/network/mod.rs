//! Time-expanded supply-chain network
//!
//! One node per (location, period), one aggregate demand node per installation
//! site, and three edge kinds: transport, production (self-loops) and storage.

pub mod builder;
pub mod capacity;
pub mod inputs;

use serde::Serialize;
use std::collections::HashMap;

use crate::domain::{Node, NodeIndex, NodeKey, ProductionEdge, Slot, StorageEdge, TransportEdge};

pub use builder::NetworkBuilder;
pub use capacity::CarryOver;
pub use inputs::{read_facilities, read_routes, CapabilityCells, FacilityRow, RouteRow};

#[derive(Debug, Clone, Default, Serialize)]
pub struct Network {
    pub nodes: Vec<Node>,
    pub transport: Vec<TransportEdge>,
    pub production: Vec<ProductionEdge>,
    pub storage: Vec<StorageEdge>,
    #[serde(skip)]
    index: HashMap<NodeKey, NodeIndex>,
}

impl Network {
    pub fn node(&self, index: NodeIndex) -> &Node {
        &self.nodes[index]
    }

    pub fn find(&self, location: &str, slot: Slot) -> Option<NodeIndex> {
        self.index.get(&NodeKey::new(location, slot)).copied()
    }

    /// Adds a node and returns its index, or `None` if the key is already taken
    fn insert_node(&mut self, node: Node) -> Option<NodeIndex> {
        if self.index.contains_key(&node.key) {
            return None;
        }
        let index = self.nodes.len();
        self.index.insert(node.key.clone(), index);
        self.nodes.push(node);
        Some(index)
    }

    pub fn edge_count(&self) -> usize {
        self.transport.len() + self.production.len() + self.storage.len()
    }
}
