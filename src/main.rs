use anyhow::{anyhow, Result};
use clap::Parser;

use lambda_louvain::data::parquet::{load_weighted_edges, EdgeColumns};
use lambda_louvain::data::{modularity_resolution, node_weights, NodeWeighting};
use lambda_louvain::{cluster_best_with, cluster_with, storage, ClusterConfig};

#[derive(Parser, Debug)]
#[clap(
    name = "lambda-louvain",
    about = "Multilevel greedy clustering of a weighted edge list"
)]
struct Cli {
    /// Path to input Parquet edge list
    #[clap(long)]
    input: String,

    /// Output directory for results
    #[clap(long, default_value = "cluster_results")]
    output_dir: String,

    /// Column holding edge sources
    #[clap(long, default_value = "Source")]
    source_column: String,

    /// Column holding edge targets
    #[clap(long, default_value = "Target")]
    target_column: String,

    /// Column holding edge weights (unit weights when omitted)
    #[clap(long)]
    weight_column: Option<String>,

    /// How node weights are derived from the graph
    #[clap(long, value_enum, default_value = "degree")]
    node_weights: NodeWeighting,

    /// Resolution parameter (defaults to the modularity-equivalent 1 / total degree)
    #[clap(long)]
    lam: Option<f64>,

    /// Number of randomized restarts; the best objective is kept
    #[clap(long, default_value = "1")]
    restarts: usize,

    /// Maximum sweeps per local search pass
    #[clap(long, default_value = "100")]
    max_iterations: usize,

    /// Penalty rewarding each disbanded singleton cluster
    #[clap(long, default_value = "0.0")]
    cluster_penalty: f64,

    /// Visit nodes in random order (single run only; restarts always randomize)
    #[clap(long)]
    randomize: bool,

    /// Seed for the visit-order generator
    #[clap(long)]
    seed: Option<u64>,

    /// Number of worker threads (0 = use all available cores)
    #[clap(long, default_value = "0")]
    threads: usize,

    /// Verbose logging
    #[clap(long, short)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Cli::parse();

    let log_level = if args.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    env_logger::Builder::new()
        .filter_level(log_level)
        .format_timestamp_millis()
        .init();

    let num_threads = if args.threads > 0 {
        args.threads
    } else {
        num_cpus::get()
    };

    log::info!("Using {} worker threads", num_threads);
    rayon::ThreadPoolBuilder::new()
        .num_threads(num_threads)
        .build_global()?;

    log::info!("Input: {}", args.input);
    log::info!("Output: {}", args.output_dir);

    // 1. Load data
    let columns = EdgeColumns {
        source: &args.source_column,
        target: &args.target_column,
        weight: args.weight_column.as_deref(),
    };
    let graph = load_weighted_edges(&args.input, &columns)?;
    let weights = node_weights(&graph, args.node_weights);

    // 2. Resolve parameters
    let resolution = match args.lam {
        Some(lam) => lam,
        None => modularity_resolution(&graph)
            .ok_or_else(|| anyhow!("graph has no edge weight; pass --lam explicitly"))?,
    };
    log::info!("Resolution: {}", resolution);

    let mut config = ClusterConfig::new(resolution)
        .with_max_iterations(args.max_iterations)
        .with_cluster_penalty(args.cluster_penalty)
        .with_randomize(args.randomize)
        .with_restarts(args.restarts);
    if let Some(seed) = args.seed {
        config = config.with_seed(seed);
    }

    // 3. Cluster
    let result = if config.restarts > 1 {
        cluster_best_with(&graph, &weights, &config)?.best
    } else {
        cluster_with(&graph, &weights, &config)?
    };

    log::info!(
        "Found {} clusters with objective {:.6}",
        result.cluster_count,
        result.objective
    );

    // 4. Save results
    storage::save_results(&result, &graph, &weights, &args.output_dir)?;

    log::info!("Analysis complete. Results saved to {}", args.output_dir);

    Ok(())
}
