//! Logistics optimizer
//!
//! - `recipes`: bill-of-materials table per capability
//! - `flows`: decision variables, one per usable (edge, product, side)
//! - `constraints`: conversion, vessel coupling and mass balance
//! - `cost`: vessel pricing and the objective
//! - `milp`: the planner tying it together

pub mod constraints;
pub mod cost;
pub mod flows;
pub mod milp;
pub mod recipes;

pub use cost::{vessel_route_cost, VesselClass};
pub use flows::{EdgeQuantities, FlowQuantities, FlowVariables};
pub use milp::Planner;
pub use recipes::{recipe, Recipe};
