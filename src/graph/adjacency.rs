//! Neighbor lists used by the local search

use crate::graph::WeightedGraph;

/// Per-node sorted neighbor lists with their weights and unweighted degree.
///
/// Entries with zero weight and diagonal entries are dropped, so
/// `degree(i)` counts distinct nodes `j != i` with `weight(i, j) != 0`.
/// Rebuilt once per level; it never changes during a pass.
#[derive(Debug, Clone)]
pub struct AdjacencyView {
    offsets: Vec<usize>,
    neighbors: Vec<u32>,
    weights: Vec<f64>,
}

impl AdjacencyView {
    pub fn new(graph: &WeightedGraph) -> Self {
        let n = graph.node_count();
        let mut offsets = Vec::with_capacity(n + 1);
        let mut neighbors = Vec::with_capacity(graph.stored_entries());
        let mut weights = Vec::with_capacity(graph.stored_entries());

        offsets.push(0);
        for node in 0..n {
            // Rows are already sorted by target
            for (target, w) in graph.edges(node) {
                if target != node && w != 0.0 {
                    neighbors.push(target as u32);
                    weights.push(w);
                }
            }
            offsets.push(neighbors.len());
        }

        Self {
            offsets,
            neighbors,
            weights,
        }
    }

    pub fn node_count(&self) -> usize {
        self.offsets.len() - 1
    }

    pub fn neighbors(&self, node: usize) -> &[u32] {
        &self.neighbors[self.offsets[node]..self.offsets[node + 1]]
    }

    pub fn weights(&self, node: usize) -> &[f64] {
        &self.weights[self.offsets[node]..self.offsets[node + 1]]
    }

    /// Unweighted degree (neighbor count)
    pub fn degree(&self, node: usize) -> usize {
        self.offsets[node + 1] - self.offsets[node]
    }

    pub fn degrees(&self) -> Vec<usize> {
        (0..self.node_count()).map(|node| self.degree(node)).collect()
    }

    /// Iterate `(neighbor, weight)` pairs of a node
    pub fn edges(&self, node: usize) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.neighbors(node)
            .iter()
            .zip(self.weights(node))
            .map(|(&j, &w)| (j as usize, w))
    }
}
