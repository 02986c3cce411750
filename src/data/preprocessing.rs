//! Node weight derivation

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::graph::{AdjacencyView, WeightedGraph};

/// How node weights are derived from the graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
pub enum NodeWeighting {
    /// Weighted degree
    Degree,
    /// Number of neighbors
    EdgeCount,
    /// Every node weighs 1
    Uniform,
}

pub fn node_weights(graph: &WeightedGraph, scheme: NodeWeighting) -> Vec<f64> {
    match scheme {
        NodeWeighting::Degree => graph.weighted_degrees(),
        NodeWeighting::EdgeCount => AdjacencyView::new(graph)
            .degrees()
            .into_iter()
            .map(|d| d as f64)
            .collect(),
        NodeWeighting::Uniform => vec![1.0; graph.node_count()],
    }
}

/// Resolution `1 / Σ weighted degree` under which the objective with degree
/// node weights ranks partitions exactly as standard modularity does.
///
/// Returns `None` for a graph without edge weight.
pub fn modularity_resolution(graph: &WeightedGraph) -> Option<f64> {
    let volume: f64 = graph.weighted_degrees().iter().sum();
    (volume > 0.0).then(|| 1.0 / volume)
}
