//! Cluster statistics for reporting

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::graph::WeightedGraph;

/// Number of most-connected members reported per cluster
const CENTRAL_NODES: usize = 5;

/// Reporting view of one cluster of a final partition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterSummary {
    /// Dense cluster id
    pub id: usize,

    /// Members of this cluster (node indices)
    pub members: Vec<usize>,

    /// Size of the cluster
    pub size: usize,

    /// Summed node weight
    pub volume: f64,

    /// Summed weight of edges with both endpoints inside
    pub internal_weight: f64,

    /// Summed weight of edges leaving the cluster
    pub cut: f64,

    /// Density: internal edges / potential undirected edges
    pub density: f64,

    /// Members with the highest internal weighted degree
    pub central_nodes: Vec<usize>,
}

/// Summarize every cluster of a dense labelling, in id order
pub fn summarize_clusters(
    graph: &WeightedGraph,
    node_weights: &[f64],
    labels: &[usize],
) -> Vec<ClusterSummary> {
    let k = labels.iter().copied().max().map_or(0, |max| max + 1);
    let mut members: Vec<Vec<usize>> = vec![Vec::new(); k];
    for (node, &label) in labels.iter().enumerate() {
        members[label].push(node);
    }

    members
        .into_iter()
        .enumerate()
        .filter(|(_, group)| !group.is_empty())
        .map(|(id, group)| summarize(graph, node_weights, labels, id, group))
        .collect()
}

fn summarize(
    graph: &WeightedGraph,
    node_weights: &[f64],
    labels: &[usize],
    id: usize,
    members: Vec<usize>,
) -> ClusterSummary {
    let mut internal_weight = 0.0;
    let mut internal_edges = 0usize;
    let mut cut = 0.0;
    let mut inner_degree = Vec::with_capacity(members.len());

    for &node in &members {
        let mut degree = 0.0;
        for (target, w) in graph.edges(node) {
            if target == node || w == 0.0 {
                continue;
            }
            if labels[target] == id {
                degree += w;
                // Count each undirected edge once
                if node < target {
                    internal_weight += w;
                    internal_edges += 1;
                }
            } else {
                cut += w;
            }
        }
        inner_degree.push((node, degree));
    }

    let n = members.len();
    let density = if n <= 1 {
        1.0 // By convention, singleton clusters have density 1
    } else {
        internal_edges as f64 / (n * (n - 1) / 2) as f64
    };

    let central_nodes = inner_degree
        .into_iter()
        .sorted_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)))
        .take(CENTRAL_NODES)
        .map(|(node, _)| node)
        .collect();

    ClusterSummary {
        id,
        size: n,
        volume: members.iter().map(|&node| node_weights[node]).sum(),
        members,
        internal_weight,
        cut,
        density,
        central_nodes,
    }
}
