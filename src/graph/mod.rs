//! Graph representation and transforms module

pub mod adjacency;
pub mod algorithms;
pub mod builder;
pub mod compressed;

pub use adjacency::AdjacencyView;
pub use algorithms::{coarsen, expand_labels};
pub use builder::GraphBuilder;
pub use compressed::WeightedGraph;
