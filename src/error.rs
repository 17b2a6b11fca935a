use thiserror::Error;

use crate::domain::Slot;

/// Errors that can be returned while building or solving a plan
#[derive(Debug, Error)]
pub enum PlannerError {
    #[error("Failed to read input table: {0}")]
    Table(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unknown location '{location}' ({slot}) referenced by route table")]
    UnknownLocation { location: String, slot: Slot },

    #[error("Configuration error: {0}")]
    Config(#[from] Box<figment::Error>),

    #[error("Invalid configuration: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Plan is infeasible: {0}")]
    Infeasible(String),

    #[error("Plan is unbounded")]
    Unbounded,

    #[error("Solver error: {0}")]
    Solver(String),
}

impl PlannerError {
    /// True when the solver finished but did not reach an optimal plan
    pub fn is_not_optimal(&self) -> bool {
        matches!(
            self,
            PlannerError::Infeasible(_) | PlannerError::Unbounded | PlannerError::Solver(_)
        )
    }
}

impl From<figment::Error> for PlannerError {
    fn from(error: figment::Error) -> Self {
        PlannerError::Config(Box::new(error))
    }
}

impl From<good_lp::ResolutionError> for PlannerError {
    fn from(error: good_lp::ResolutionError) -> Self {
        match error {
            good_lp::ResolutionError::Infeasible => {
                PlannerError::Infeasible("no plan satisfies every constraint".to_string())
            }
            good_lp::ResolutionError::Unbounded => PlannerError::Unbounded,
            other => PlannerError::Solver(other.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, PlannerError>;
