//! Graph construction module

use std::collections::HashMap;

use crate::error::{ClusterError, Result};
use crate::graph::WeightedGraph;

/// Builder for incrementally constructing a WeightedGraph
pub struct GraphBuilder {
    /// Number of nodes
    node_count: usize,

    /// Mapping from string IDs to node indices
    id_to_index: HashMap<String, u32>,

    /// Node string IDs, filled only when nodes are created by name
    node_ids: Vec<String>,

    /// Unsorted stored entries for each node
    rows: Vec<Vec<(u32, f64)>>,
}

impl GraphBuilder {
    /// Create a builder over a fixed set of `node_count` anonymous nodes
    pub fn new(node_count: usize) -> Self {
        Self {
            node_count,
            id_to_index: HashMap::new(),
            node_ids: Vec::new(),
            rows: vec![Vec::new(); node_count],
        }
    }

    /// Create an empty builder whose nodes are created by name
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            node_count: 0,
            id_to_index: HashMap::with_capacity(capacity),
            node_ids: Vec::with_capacity(capacity),
            rows: Vec::with_capacity(capacity),
        }
    }

    pub fn node_count(&self) -> usize {
        self.node_count
    }

    /// Get or create a node index for the given string ID
    pub fn get_or_create_node(&mut self, id: &str) -> u32 {
        if let Some(&idx) = self.id_to_index.get(id) {
            return idx;
        }

        let idx = self.node_count as u32;
        self.id_to_index.insert(id.to_string(), idx);
        self.node_ids.push(id.to_string());
        self.rows.push(Vec::new());
        self.node_count += 1;

        idx
    }

    /// Add an undirected edge; the weight is recorded in both rows
    pub fn add_edge(&mut self, i: usize, j: usize, weight: f64) -> Result<()> {
        self.check_node(i)?;
        self.check_node(j)?;
        self.rows[i].push((j as u32, weight));
        if i != j {
            self.rows[j].push((i as u32, weight));
        }
        Ok(())
    }

    /// Add a single stored entry (i, j) without its mirror
    pub fn add_entry(&mut self, i: usize, j: usize, weight: f64) -> Result<()> {
        self.check_node(i)?;
        self.check_node(j)?;
        self.rows[i].push((j as u32, weight));
        Ok(())
    }

    /// Add an undirected edge between two named nodes, creating them as needed
    pub fn add_named_edge(&mut self, src_id: &str, dst_id: &str, weight: f64) -> Result<()> {
        let src = self.get_or_create_node(src_id) as usize;
        let dst = self.get_or_create_node(dst_id) as usize;
        self.add_edge(src, dst, weight)
    }

    fn check_node(&self, node: usize) -> Result<()> {
        if node >= self.node_count {
            return Err(ClusterError::NodeOutOfRange {
                node,
                node_count: self.node_count,
            });
        }
        Ok(())
    }

    /// Build the compressed graph, summing repeated entries
    pub fn build(self) -> WeightedGraph {
        let entry_count: usize = self.rows.iter().map(|row| row.len()).sum();
        let mut graph = WeightedGraph::with_capacity(self.node_count, entry_count);

        let mut targets = Vec::new();
        let mut weights = Vec::new();
        for mut row in self.rows {
            // Stable sort keeps insertion order within a target, so both
            // directions of an edge accumulate in the same order.
            row.sort_by_key(|&(t, _)| t);

            targets.clear();
            weights.clear();
            for (t, w) in row {
                if targets.last() == Some(&t) {
                    if let Some(last) = weights.last_mut() {
                        *last += w;
                    }
                } else {
                    targets.push(t);
                    weights.push(w);
                }
            }
            graph.push_row(&targets, &weights);
        }

        if !self.node_ids.is_empty() && self.node_ids.len() == self.node_count {
            graph.node_ids = Some(self.node_ids);
        }

        graph
    }
}
