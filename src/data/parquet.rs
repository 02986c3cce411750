//! Parquet edge-list loading

use std::path::Path;

use anyhow::{anyhow, Context, Result};
use polars::prelude::*;

use crate::graph::{GraphBuilder, WeightedGraph};

/// Column layout of an edge-list file
#[derive(Debug, Clone)]
pub struct EdgeColumns<'a> {
    pub source: &'a str,
    pub target: &'a str,
    /// Edge weight column; every edge weighs 1.0 when absent
    pub weight: Option<&'a str>,
}

impl Default for EdgeColumns<'_> {
    fn default() -> Self {
        Self {
            source: "Source",
            target: "Target",
            weight: None,
        }
    }
}

/// Load an undirected weighted graph from a parquet edge list.
///
/// Node ids are read as strings. Repeated rows (in either direction) are
/// summed, self-loop rows are skipped, and rows with a missing endpoint or
/// weight are dropped.
pub fn load_weighted_edges(path: &str, columns: &EdgeColumns<'_>) -> Result<WeightedGraph> {
    log::info!("Reading parquet file: {}", path);

    if !Path::new(path).exists() {
        return Err(anyhow!("File not found: {}", path));
    }

    let df = LazyFrame::scan_parquet(path, Default::default())?
        .collect()
        .with_context(|| format!("failed to read {}", path))?;

    log::debug!("File schema: {:?}", df.schema());
    log::info!("Loaded {} edge rows", df.height());

    let sources = df.column(columns.source)?.cast(&DataType::String)?;
    let targets = df.column(columns.target)?.cast(&DataType::String)?;
    let sources = sources.str()?;
    let targets = targets.str()?;

    let weights = match columns.weight {
        Some(name) => Some(df.column(name)?.cast(&DataType::Float64)?),
        None => None,
    };
    let weights = weights.as_ref().map(|column| column.f64()).transpose()?;

    let mut builder = GraphBuilder::with_capacity(df.height());
    let mut self_loops = 0usize;
    let mut dropped = 0usize;

    for i in 0..df.height() {
        let (Some(src), Some(dst)) = (sources.get(i), targets.get(i)) else {
            dropped += 1;
            continue;
        };
        let weight = match weights {
            Some(values) => match values.get(i) {
                Some(w) => w,
                None => {
                    dropped += 1;
                    continue;
                }
            },
            None => 1.0,
        };

        if src == dst {
            // Keep the node, drop the diagonal entry
            builder.get_or_create_node(src);
            self_loops += 1;
            continue;
        }
        builder.add_named_edge(src, dst, weight)?;
    }

    if self_loops > 0 {
        log::warn!("Skipped {} self-loop rows", self_loops);
    }
    if dropped > 0 {
        log::warn!("Dropped {} rows with missing values", dropped);
    }

    let graph = builder.build();
    log::info!(
        "Built graph with {} nodes and {} stored entries",
        graph.node_count(),
        graph.stored_entries()
    );

    Ok(graph)
}
