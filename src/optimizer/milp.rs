//! MILP planner
//!
//! Builds the time-expanded network from the input tables, registers one integer
//! variable per usable (edge, product, side), adds the bill-of-materials, vessel and
//! mass-balance constraints, and minimises total cost with the bundled solver.

use std::io::Read;

use good_lp::{default_solver, ProblemVariables, SolverModel};
use tracing::{info, warn};

use super::{constraints, cost, FlowVariables};
use crate::config::Config;
use crate::error::{PlannerError, Result};
use crate::network::{read_facilities, read_routes, FacilityRow, Network, NetworkBuilder, RouteRow};
use crate::report::SolvedNetwork;

/// One-shot planner; every call builds and solves an independent model
#[derive(Debug, Clone, Default)]
pub struct Planner {
    config: Config,
}

impl Planner {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Reads both CSV tables and solves the resulting network
    pub fn plan_from_readers<F: Read, R: Read>(
        &self,
        facilities: F,
        routes: R,
    ) -> Result<SolvedNetwork> {
        let facilities = read_facilities(facilities)?;
        let routes = read_routes(routes)?;
        self.plan_tables(&facilities, &routes)
    }

    pub fn plan_tables(
        &self,
        facilities: &[FacilityRow],
        routes: &[RouteRow],
    ) -> Result<SolvedNetwork> {
        let network = NetworkBuilder::new(&self.config).build(facilities, routes)?;
        self.solve(network)
    }

    /// Solves a built network. A non-optimal outcome is returned as an error and
    /// no flows are reported.
    pub fn solve(&self, network: Network) -> Result<SolvedNetwork> {
        let mut vars = ProblemVariables::new();
        let flows = FlowVariables::register(&network, &mut vars);
        let objective = cost::objective(&network, &flows);
        let constraints = constraints::generate(&network, &flows)?;

        info!(
            edges = network.edge_count(),
            variables = flows.len(),
            constraints = constraints.len(),
            "solving logistics model"
        );

        let mut problem = vars.minimise(objective).using(default_solver);
        for constraint in constraints {
            problem = problem.with(constraint);
        }

        let solution = problem.solve().map_err(|e| {
            let error = PlannerError::from(e);
            warn!(%error, "solver did not reach an optimal plan");
            error
        })?;

        let quantities = flows.evaluate(&solution);
        let solved = SolvedNetwork::new(network, quantities);
        info!(total_cost = solved.total_cost(), "plan solved");
        Ok(solved)
    }
}
