//! Input adapters: edge-list loading and node weighting

pub mod parquet;
pub mod preprocessing;

pub use preprocessing::{modularity_resolution, node_weights, NodeWeighting};
