//! Graph transforms used between clustering levels

use crate::error::{ClusterError, Result};
use crate::graph::WeightedGraph;

/// Collapse each cluster of `labels` into a supernode.
///
/// Labels must be dense in `0..cluster_count`. The weight between supernodes
/// `p != q` is the summed weight of all edges joining a member of `p` to a
/// member of `q`; intra-cluster edges are dropped and no diagonal entry is
/// created. Only supernode pairs adjacent in `graph` get an entry. Each
/// supernode's node weight is the sum of its members' weights.
pub fn coarsen(
    graph: &WeightedGraph,
    node_weights: &[f64],
    labels: &[usize],
    cluster_count: usize,
) -> Result<(WeightedGraph, Vec<f64>)> {
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

    // Group members per supernode and aggregate node weights
    let mut members: Vec<Vec<usize>> = vec![Vec::new(); cluster_count];
    let mut super_weights = vec![0.0; cluster_count];
    for (node, &label) in labels.iter().enumerate() {
        if label >= cluster_count {
            return Err(ClusterError::NodeOutOfRange {
                node: label,
                node_count: cluster_count,
            });
        }
        members[label].push(node);
        super_weights[label] += node_weights[node];
    }

    let mut coarse = WeightedGraph::with_capacity(cluster_count, graph.stored_entries());

    // Scratch accumulator indexed by supernode, reset after each row
    let mut acc = vec![0.0; cluster_count];
    let mut seen = vec![false; cluster_count];
    let mut touched: Vec<u32> = Vec::new();
    let mut row_weights: Vec<f64> = Vec::new();

    for (p, group) in members.iter().enumerate() {
        for &u in group {
            for (v, w) in graph.edges(u) {
                let q = labels[v];
                if q == p || w == 0.0 {
                    continue;
                }
                if !seen[q] {
                    seen[q] = true;
                    touched.push(q as u32);
                }
                acc[q] += w;
            }
        }

        touched.sort_unstable();
        row_weights.clear();
        for &q in &touched {
            let q = q as usize;
            row_weights.push(acc[q]);
            acc[q] = 0.0;
            seen[q] = false;
        }
        coarse.push_row(&touched, &row_weights);
        touched.clear();
    }

    log::debug!(
        "Coarsened {} nodes into {} supernodes with {} stored entries",
        n,
        cluster_count,
        coarse.stored_entries()
    );

    Ok((coarse, super_weights))
}

/// Expand a supernode-level labelling to the nodes of the finer level.
///
/// `membership[i]` is the supernode containing fine node `i`.
pub fn expand_labels(membership: &[usize], super_labels: &[usize]) -> Vec<usize> {
    membership.iter().map(|&s| super_labels[s]).collect()
}
