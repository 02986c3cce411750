//! Multilevel greedy clustering engine
//!
//! Nodes start as singletons and are greedily moved to the neighboring
//! cluster with the most negative objective change. Each improving level
//! is collapsed into a graph of supernodes and the search repeats there,
//! until a level makes no move.

pub mod bookkeeping;
pub mod local_search;
pub mod metrics;
pub mod multilevel;
pub mod objective;

use serde::{Deserialize, Serialize};

pub use bookkeeping::{ClusterBook, Renumbered};
pub use local_search::{LocalSearch, LocalSearchOutcome};
pub use metrics::{summarize_clusters, ClusterSummary};
pub use multilevel::{cluster, cluster_best, cluster_best_with, cluster_with, Hierarchy, Multilevel};
pub use objective::objective;

/// Result of one multilevel run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Clustering {
    /// Final partition: node -> cluster id in `0..cluster_count`
    pub labels: Vec<usize>,

    /// Objective value of `labels` (lower is better)
    pub objective: f64,

    /// Number of clusters in `labels`
    pub cluster_count: usize,

    /// Resolution the run used
    pub resolution: f64,

    /// Node-level labels after each improving level; the last one is `labels`
    pub levels: Vec<Vec<usize>>,

    /// Objective of each entry in `levels`
    pub level_objectives: Vec<f64>,
}

/// Result of a best-of-many run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BestClustering {
    /// Restart with the lowest objective
    pub best: Clustering,

    /// Index of that restart
    pub restart: usize,

    /// Final objective of every restart, in restart order
    pub objectives: Vec<f64>,
}
