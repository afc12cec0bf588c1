//! Roll-up of leaf amounts into branch totals

use tracing::{instrument, trace};

use crate::domain::node::CostNode;

/// Value a node contributes to its parent.
///
/// A leaf contributes its own amount, a branch the sum of its children's
/// effective values. Stored totals are not consulted.
pub fn effective_value(node: &CostNode) -> f64 {
    if node.children.is_empty() {
        node.amount
    } else {
        node.children.iter().map(effective_value).sum()
    }
}

/// Bottom-up pass writing each branch's aggregate into `total`.
///
/// A total is only written when the fresh aggregate differs from the stored
/// one. Returns the number of totals written, so a second pass over an
/// unchanged tree returns 0.
#[instrument(level = "trace", skip(node), fields(id = %node.id))]
pub fn recompute(node: &mut CostNode) -> usize {
    if node.children.is_empty() {
        return 0;
    }

    let mut written = 0;
    let mut aggregate = 0.0;
    for child in node.children.iter_mut() {
        written += recompute(child);
        aggregate += if child.children.is_empty() {
            child.amount
        } else {
            child.total
        };
    }

    if node.total != aggregate {
        trace!("total {} -> {}", node.total, aggregate);
        node.total = aggregate;
        written += 1;
    }
    written
}

pub fn recompute_forest(nodes: &mut [CostNode]) -> usize {
    nodes.iter_mut().map(recompute).sum()
}

/// True when every branch's stored total equals its children's effective values.
pub fn is_consistent(node: &CostNode) -> bool {
    if node.children.is_empty() {
        return true;
    }
    let aggregate: f64 = node.children.iter().map(effective_value).sum();
    node.total == aggregate && node.children.iter().all(is_consistent)
}
