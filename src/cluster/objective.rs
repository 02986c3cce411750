//! Resolution-parameterized correlation clustering objective
//!
//! For node weights `w`, total volume `V = Σ w_i` and resolution `lam`:
//!
//! ```text
//! obj = (lam·V² − lam·Σ w_i²) / 2 + Σ_c ½ · (cut(c) − lam · volW(c) · (V − volW(c)))
//!     = lam · Σ_{i<j, same cluster} w_i·w_j + Σ_{cut edges} A_ij
//! ```
//!
//! Lower is better. Moving node `i` from cluster `A` to cluster `B` changes
//! it by `lam·w_i·(volW(B) − volW(A) + w_i) + A(i, A∖i) − A(i, B)`, which is
//! the delta the local search evaluates.

use crate::error::{ClusterError, Result};
use crate::graph::WeightedGraph;

/// Objective value of `labels` on the original graph.
///
/// Labels need not be contiguous; any `usize` id groups nodes.
pub fn objective(
    graph: &WeightedGraph,
    node_weights: &[f64],
    labels: &[usize],
    resolution: f64,
) -> Result<f64> {
    let n = graph.node_count();
    if node_weights.len() != n {
        return Err(ClusterError::DimensionMismatch {
            expected: n,
            found: node_weights.len(),
        });
    }
    if labels.len() != n {
        return Err(ClusterError::DimensionMismatch {
            expected: n,
            found: labels.len(),
        });
    }
    if !(resolution.is_finite() && resolution > 0.0) {
        return Err(ClusterError::InvalidResolution(resolution));
    }
    Ok(evaluate(graph, node_weights, labels, resolution))
}

/// Objective without input checks; callers guarantee matching dimensions
pub(crate) fn evaluate(
    graph: &WeightedGraph,
    node_weights: &[f64],
    labels: &[usize],
    resolution: f64,
) -> f64 {
    let k = labels.iter().copied().max().map_or(0, |max| max + 1);

    let mut volumes = vec![0.0; k];
    let mut cuts = vec![0.0; k];
    for (node, &label) in labels.iter().enumerate() {
        volumes[label] += node_weights[node];
        for (target, w) in graph.edges(node) {
            if target != node && labels[target] != label {
                cuts[label] += w;
            }
        }
    }

    let total: f64 = node_weights.iter().sum();
    let squares: f64 = node_weights.iter().map(|w| w * w).sum();
    let constant = (resolution * total * total - resolution * squares) / 2.0;

    let per_cluster: f64 = cuts
        .iter()
        .zip(&volumes)
        .map(|(&cut, &vol)| 0.5 * (cut - resolution * vol * (total - vol)))
        .sum();

    constant + per_cluster
}
