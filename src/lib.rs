//! Multilevel greedy clustering of weighted graphs under a
//! resolution-parameterized correlation clustering objective.

pub mod cluster;
pub mod config;
pub mod data;
pub mod error;
pub mod graph;
pub mod storage;

pub use cluster::{
    cluster, cluster_best, cluster_best_with, cluster_with, objective, BestClustering, Clustering,
};
pub use config::ClusterConfig;
pub use error::{ClusterError, Result};
pub use graph::{GraphBuilder, WeightedGraph};
