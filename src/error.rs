//! Error types for the clustering engine

use thiserror::Error;

/// Result alias used by the engine.
pub type Result<T> = std::result::Result<T, ClusterError>;

/// Invalid input detected before any clustering work starts.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ClusterError {
    #[error("graph has no nodes")]
    EmptyGraph,

    #[error("dimension mismatch: expected {expected}, found {found}")]
    DimensionMismatch { expected: usize, found: usize },

    #[error("node {node} has a self-loop of weight {weight}")]
    SelfLoop { node: usize, weight: f64 },

    #[error(
        "graph is not symmetric: weight({node}, {neighbor}) = {forward} but \
         weight({neighbor}, {node}) = {backward}"
    )]
    Asymmetric {
        node: usize,
        neighbor: usize,
        forward: f64,
        backward: f64,
    },

    #[error("edge ({node}, {neighbor}) has invalid weight {weight}")]
    InvalidEdgeWeight {
        node: usize,
        neighbor: usize,
        weight: f64,
    },

    #[error("node {node} has invalid weight {weight}")]
    InvalidNodeWeight { node: usize, weight: f64 },

    #[error("resolution must be a positive finite number, got {0}")]
    InvalidResolution(f64),

    #[error("invalid parameter '{name}': {message}")]
    InvalidParameter {
        name: &'static str,
        message: &'static str,
    },

    #[error("node {node} is out of range for a graph with {node_count} nodes")]
    NodeOutOfRange { node: usize, node_count: usize },
}
