//! Compressed sparse row representation of a symmetric weighted graph

use serde::{Deserialize, Serialize};

use crate::error::{ClusterError, Result};

/// Relative tolerance used when comparing mirrored edge weights
const SYMMETRY_TOLERANCE: f64 = 1e-9;

/// Weighted graph stored as compressed rows.
///
/// Each row holds the stored entries of one node sorted by target, without
/// duplicate targets. Stored entries may carry a zero weight; those are
/// treated as absent by every algorithm in the crate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightedGraph {
    /// Number of nodes in the graph
    pub(crate) node_count: usize,

    /// offsets[i] to offsets[i+1] defines the entry range for node i
    pub(crate) offsets: Vec<usize>,

    /// Concatenated row targets
    pub(crate) targets: Vec<u32>,

    /// Weights parallel to `targets`
    pub(crate) weights: Vec<f64>,

    /// Optional mapping from internal node indices to external string ids
    pub(crate) node_ids: Option<Vec<String>>,
}

impl WeightedGraph {
    /// Create an empty graph with pre-allocated capacity
    pub(crate) fn with_capacity(node_count: usize, entry_count: usize) -> Self {
        let mut offsets = Vec::with_capacity(node_count + 1);
        offsets.push(0);
        Self {
            node_count,
            offsets,
            targets: Vec::with_capacity(entry_count),
            weights: Vec::with_capacity(entry_count),
            node_ids: None,
        }
    }

    /// Build an undirected graph over `node_count` nodes from `(i, j, w)` triples.
    ///
    /// Every triple contributes to both directions; repeated pairs are summed.
    pub fn from_edges<I>(node_count: usize, edges: I) -> Result<Self>
    where
        I: IntoIterator<Item = (usize, usize, f64)>,
    {
        let mut builder = crate::graph::GraphBuilder::new(node_count);
        for (i, j, w) in edges {
            builder.add_edge(i, j, w)?;
        }
        Ok(builder.build())
    }

    /// Number of nodes
    pub fn node_count(&self) -> usize {
        self.node_count
    }

    /// Number of stored row entries (each undirected edge is stored twice)
    pub fn stored_entries(&self) -> usize {
        self.targets.len()
    }

    /// External string ids, when the graph was loaded from labelled data
    pub fn node_ids(&self) -> Option<&[String]> {
        self.node_ids.as_deref()
    }

    pub fn set_node_ids(&mut self, node_ids: Vec<String>) -> Result<()> {
        if node_ids.len() != self.node_count {
            return Err(ClusterError::DimensionMismatch {
                expected: self.node_count,
                found: node_ids.len(),
            });
        }
        self.node_ids = Some(node_ids);
        Ok(())
    }

    /// Targets stored in the row of `node`
    pub fn row_targets(&self, node: usize) -> &[u32] {
        &self.targets[self.offsets[node]..self.offsets[node + 1]]
    }

    /// Weights stored in the row of `node`
    pub fn row_weights(&self, node: usize) -> &[f64] {
        &self.weights[self.offsets[node]..self.offsets[node + 1]]
    }

    /// Iterate the stored `(target, weight)` entries of a row
    pub fn edges(&self, node: usize) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.row_targets(node)
            .iter()
            .zip(self.row_weights(node))
            .map(|(&t, &w)| (t as usize, w))
    }

    /// Weight of the stored entry (src, dst), zero when absent
    pub fn edge_weight(&self, src: usize, dst: usize) -> f64 {
        match self.row_targets(src).binary_search(&(dst as u32)) {
            Ok(pos) => self.row_weights(src)[pos],
            Err(_) => 0.0,
        }
    }

    /// Sum of entry weights per row, excluding any diagonal entry
    pub fn weighted_degrees(&self) -> Vec<f64> {
        (0..self.node_count)
            .map(|node| {
                self.edges(node)
                    .filter(|&(t, _)| t != node)
                    .map(|(_, w)| w)
                    .sum()
            })
            .collect()
    }

    /// Total undirected edge weight (each symmetric pair counted once)
    pub fn total_edge_weight(&self) -> f64 {
        self.weighted_degrees().iter().sum::<f64>() / 2.0
    }

    /// Check the structural preconditions of the clustering engine:
    /// finite nonnegative weights, zero diagonal and symmetry.
    pub fn validate(&self) -> Result<()> {
        for node in 0..self.node_count {
            for (target, w) in self.edges(node) {
                if !(w.is_finite() && w >= 0.0) {
                    return Err(ClusterError::InvalidEdgeWeight {
                        node,
                        neighbor: target,
                        weight: w,
                    });
                }
                if w == 0.0 {
                    continue;
                }
                if target == node {
                    return Err(ClusterError::SelfLoop { node, weight: w });
                }
                let mirrored = self.edge_weight(target, node);
                let scale = w.abs().max(mirrored.abs());
                if (w - mirrored).abs() > SYMMETRY_TOLERANCE * scale {
                    return Err(ClusterError::Asymmetric {
                        node,
                        neighbor: target,
                        forward: w,
                        backward: mirrored,
                    });
                }
            }
        }
        Ok(())
    }

    /// Append a finished row; targets must be sorted and distinct
    pub(crate) fn push_row(&mut self, targets: &[u32], weights: &[f64]) {
        debug_assert_eq!(targets.len(), weights.len());
        debug_assert!(targets.windows(2).all(|w| w[0] < w[1]));
        self.targets.extend_from_slice(targets);
        self.weights.extend_from_slice(weights);
        self.offsets.push(self.targets.len());
    }
}
