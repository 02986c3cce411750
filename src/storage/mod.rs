//! Results persistence module

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use anyhow::Result;
use serde_json::{json, to_string_pretty, Value};

use crate::cluster::{summarize_clusters, ClusterSummary, Clustering};
use crate::graph::WeightedGraph;

/// Save a clustering result to the specified directory
pub fn save_results(
    result: &Clustering,
    graph: &WeightedGraph,
    node_weights: &[f64],
    output_dir: &str,
) -> Result<()> {
    log::info!(
        "Saving {} clusters to {}",
        result.cluster_count,
        output_dir
    );

    fs::create_dir_all(output_dir)?;

    let mut summaries = summarize_clusters(graph, node_weights, &result.labels);
    // Largest first
    summaries.sort_by(|a, b| b.size.cmp(&a.size).then(a.id.cmp(&b.id)));

    save_summary(result, graph, &summaries, output_dir)?;
    save_labels(result, graph, output_dir)?;
    save_levels(result, output_dir)?;
    save_clusters(&summaries, graph, output_dir)?;

    log::info!("Results saved successfully");

    Ok(())
}

fn write_json(path: &Path, value: &Value) -> Result<()> {
    let mut file = File::create(path)?;
    file.write_all(to_string_pretty(value)?.as_bytes())?;
    Ok(())
}

fn node_name(graph: &WeightedGraph, node: usize) -> String {
    match graph.node_ids() {
        Some(ids) => ids[node].clone(),
        None => node.to_string(),
    }
}

/// Save summary information
fn save_summary(
    result: &Clustering,
    graph: &WeightedGraph,
    summaries: &[ClusterSummary],
    output_dir: &str,
) -> Result<()> {
    let sizes: Vec<usize> = summaries.iter().map(|c| c.size).collect();
    let cluster_count = sizes.len().max(1) as f64;

    let summary = json!({
        "graph_stats": {
            "node_count": graph.node_count(),
            "edge_count": graph.stored_entries() / 2,
            "total_edge_weight": graph.total_edge_weight(),
        },
        "cluster_stats": {
            "resolution": result.resolution,
            "objective": result.objective,
            "cluster_count": result.cluster_count,
            "level_count": result.levels.len(),
            "level_objectives": result.level_objectives,
            "largest_cluster_size": sizes.first().copied().unwrap_or(0),
            "smallest_cluster_size": sizes.last().copied().unwrap_or(0),
            "singleton_count": sizes.iter().filter(|&&s| s == 1).count(),
            "avg_cluster_size": sizes.iter().sum::<usize>() as f64 / cluster_count,
            "avg_density": summaries.iter().map(|c| c.density).sum::<f64>() / cluster_count,
        }
    });

    write_json(&Path::new(output_dir).join("summary.json"), &summary)
}

/// Save the final node -> cluster assignment
fn save_labels(result: &Clustering, graph: &WeightedGraph, output_dir: &str) -> Result<()> {
    let labels: serde_json::Map<String, Value> = result
        .labels
        .iter()
        .enumerate()
        .map(|(node, &label)| (node_name(graph, node), json!(label)))
        .collect();

    write_json(&Path::new(output_dir).join("labels.json"), &Value::Object(labels))
}

/// Save the per-level label vectors
fn save_levels(result: &Clustering, output_dir: &str) -> Result<()> {
    let levels = json!({
        "levels": result.levels.iter().zip(&result.level_objectives).map(|(labels, objective)| {
            json!({
                "objective": objective,
                "cluster_count": labels.iter().copied().max().map_or(0, |max| max + 1),
                "labels": labels,
            })
        }).collect::<Vec<_>>()
    });

    write_json(&Path::new(output_dir).join("levels.json"), &levels)
}

/// Save per-cluster summaries
fn save_clusters(
    summaries: &[ClusterSummary],
    graph: &WeightedGraph,
    output_dir: &str,
) -> Result<()> {
    let clusters = json!({
        "clusters": summaries.iter().map(|c| {
            json!({
                "id": c.id,
                "size": c.size,
                "volume": c.volume,
                "internal_weight": c.internal_weight,
                "cut": c.cut,
                "density": c.density,
                "central_nodes": c.central_nodes.iter().map(|&n| node_name(graph, n)).collect::<Vec<_>>(),
                "members": c.members.iter().map(|&n| node_name(graph, n)).collect::<Vec<_>>(),
            })
        }).collect::<Vec<_>>()
    });

    write_json(&Path::new(output_dir).join("clusters.json"), &clusters)
}
