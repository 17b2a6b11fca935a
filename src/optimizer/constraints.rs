//! Linear constraint generation
//!
//! Capacity bounds are carried by the variable bounds set in [`FlowVariables::register`].
//! This module adds the rest: bill-of-materials equalities on production edges, vessel
//! coupling on transport edges and mass balance at every node.

use good_lp::{Constraint, Expression, Variable};
use tracing::{debug, warn};

use super::flows::{shipped_products, FlowVariables};
use super::recipes::{recipe, Term};
use crate::domain::{PerProduct, Product, Side};
use crate::error::{PlannerError, Result};
use crate::network::Network;

pub fn generate(network: &Network, flows: &FlowVariables) -> Result<Vec<Constraint>> {
    let mut constraints = Vec::new();

    let conversions = conversion_balances(network, flows, &mut constraints);
    let couplings = vessel_coupling(flows, &mut constraints);
    let balances = mass_balance(network, flows, &mut constraints)?;

    debug!(conversions, couplings, balances, "constraints generated");
    Ok(constraints)
}

/// Recipe equalities for every production edge with any capacity
fn conversion_balances(
    network: &Network,
    flows: &FlowVariables,
    out: &mut Vec<Constraint>,
) -> usize {
    let before = out.len();
    for (edge, vars) in network.production.iter().zip(&flows.production) {
        for balance in recipe(edge.capability).balances {
            let sum = |terms: &[Term]| -> Option<Expression> {
                let mut expr: Option<Expression> = None;
                for term in terms {
                    if let Some(var) = vars.get(term.side, term.product) {
                        expr.get_or_insert_with(Expression::default)
                            .add_mul(term.coefficient, var);
                    }
                }
                expr
            };
            match (sum(balance.lhs), sum(balance.rhs)) {
                (None, None) => {}
                (lhs, rhs) => {
                    let lhs = lhs.unwrap_or_default();
                    let rhs = rhs.unwrap_or_default();
                    out.push((lhs - rhs).eq(0.0));
                }
            }
        }
    }
    out.len() - before
}

/// Vessel uses on a transport edge must cover the vessel share of everything shipped.
/// An edge without a vessel variable (zero vessel capacity, or an exempt collection
/// route) keeps the coupling against zero, so it can only carry zero-share products.
fn vessel_coupling(flows: &FlowVariables, out: &mut Vec<Constraint>) -> usize {
    let before = out.len();
    for vars in &flows.transport {
        let mut load = Expression::default();
        let mut any = false;
        for product in shipped_products() {
            if let Some(var) = vars.produced(product) {
                load.add_mul(product.vessel_share(), var);
                any = true;
            }
        }
        if !any {
            continue;
        }
        match vars.produced(Product::Vessel) {
            Some(vessel) => out.push((load - vessel).leq(0.0)),
            None => out.push(load.leq(0.0)),
        }
    }
    out.len() - before
}

/// For every node and physical product: outflow minus inflow is bounded by the node's
/// exogenous supply (negative for demand)
fn mass_balance(
    network: &Network,
    flows: &FlowVariables,
    out: &mut Vec<Constraint>,
) -> Result<usize> {
    let mut net: Vec<PerProduct<Option<Expression>>> =
        network.nodes.iter().map(|_| PerProduct::default()).collect();

    let mut push = |node: usize, product: Product, coefficient: f64, var: Variable| {
        net[node][product]
            .get_or_insert_with(Expression::default)
            .add_mul(coefficient, var);
    };

    for (edge, vars) in network.transport.iter().zip(&flows.transport) {
        for product in Product::physical() {
            if let Some(var) = vars.consumed(product) {
                push(edge.source, product, 1.0, var);
            }
            if let Some(var) = vars.produced(product) {
                push(edge.target, product, -1.0, var);
            }
        }
    }
    for (edge, vars) in network.storage.iter().zip(&flows.storage) {
        for product in Product::physical() {
            if let Some(var) = vars.consumed(product) {
                push(edge.source, product, 1.0, var);
            }
            if let Some(var) = vars.produced(product) {
                push(edge.target, product, -1.0, var);
            }
        }
    }
    for (edge, vars) in network.production.iter().zip(&flows.production) {
        for product in Product::physical() {
            if let Some(var) = vars.get(Side::Consumed, product) {
                push(edge.node, product, 1.0, var);
            }
            if let Some(var) = vars.get(Side::Produced, product) {
                push(edge.node, product, -1.0, var);
            }
        }
    }

    let before = out.len();
    for (node, products) in network.nodes.iter().zip(net) {
        for product in Product::physical() {
            let supply = node.supply(product);
            match &products[product] {
                Some(expr) => out.push(expr.clone().leq(supply)),
                None if supply < 0.0 => {
                    warn!(node = %node.key, %product, demand = -supply, "demand with no inbound edge");
                    return Err(PlannerError::Infeasible(format!(
                        "{} needs {} {} but nothing can reach it",
                        node.key, -supply, product
                    )));
                }
                None => {}
            }
        }
    }
    Ok(out.len() - before)
}
