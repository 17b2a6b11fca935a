//! Offshore wind supply-chain planner
//!
//! Expands facility and route tables into a twelve-month time-expanded network,
//! formulates the multi-commodity flow as an integer program and reads the optimal
//! plan back as per-edge records.

pub mod config;
pub mod domain;
pub mod error;
pub mod network;
pub mod optimizer;
pub mod report;
pub mod telemetry;

pub use config::Config;
pub use error::{PlannerError, Result};
pub use optimizer::Planner;
pub use report::{PlanReport, SolvedNetwork};
