//! Multilevel driver and public entry points

use std::borrow::Cow;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::cluster::local_search::{LocalSearch, LocalSearchOutcome};
use crate::cluster::objective::evaluate;
use crate::cluster::{BestClustering, Clustering};
use crate::config::ClusterConfig;
use crate::error::{ClusterError, Result};
use crate::graph::{coarsen, expand_labels, AdjacencyView, WeightedGraph};

/// Node-level label vectors, one per improving level, in level order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Hierarchy {
    levels: Vec<Vec<usize>>,
}

impl Hierarchy {
    pub fn push(&mut self, labels: Vec<usize>) {
        self.levels.push(labels);
    }

    pub fn levels(&self) -> &[Vec<usize>] {
        &self.levels
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Labels of the last level, the final partition
    pub fn final_labels(&self) -> &[usize] {
        self.levels.last().map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn into_levels(self) -> Vec<Vec<usize>> {
        self.levels
    }
}

/// Driver states
enum Phase {
    /// Run local search on the current level graph
    LocalSearch,
    /// Collapse the improving partition into the next level graph
    Coarsen(LocalSearchOutcome),
    Converged,
}

/// Alternates local search and coarsening until a level stops improving
pub struct Multilevel<'a> {
    graph: &'a WeightedGraph,
    node_weights: &'a [f64],
    config: &'a ClusterConfig,
}

impl<'a> Multilevel<'a> {
    /// Inputs are assumed validated; use [`cluster_with`] for checked entry
    pub fn new(graph: &'a WeightedGraph, node_weights: &'a [f64], config: &'a ClusterConfig) -> Self {
        Self {
            graph,
            node_weights,
            config,
        }
    }

    pub fn run<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Hierarchy> {
        let n = self.graph.node_count();
        let mut hierarchy = Hierarchy::default();

        let mut level_graph: Cow<'_, WeightedGraph> = Cow::Borrowed(self.graph);
        let mut level_weights: Cow<'_, [f64]> = Cow::Borrowed(self.node_weights);
        // original node -> node of the current level graph
        let mut membership: Vec<usize> = (0..n).collect();

        let mut phase = Phase::LocalSearch;
        loop {
            phase = match phase {
                Phase::LocalSearch => {
                    let view = AdjacencyView::new(&level_graph);
                    let outcome = LocalSearch::new(
                        &view,
                        &level_weights,
                        self.config.resolution,
                        self.config.cluster_penalty,
                        self.config.max_iterations,
                    )
                    .run(self.config.randomize, &mut *rng);

                    if outcome.improved {
                        log::debug!(
                            "Level {}: {} nodes grouped into {} clusters",
                            hierarchy.len(),
                            level_graph.node_count(),
                            outcome.cluster_count()
                        );
                        hierarchy.push(expand_labels(&membership, &outcome.labels));
                        Phase::Coarsen(outcome)
                    } else {
                        if hierarchy.is_empty() {
                            // Nothing improved at all: every node stays a singleton
                            hierarchy.push(outcome.labels);
                        }
                        Phase::Converged
                    }
                }
                Phase::Coarsen(outcome) => {
                    // A move always lands in a non-empty cluster, so an
                    // improving pass leaves fewer clusters than nodes
                    debug_assert!(outcome.cluster_count() < level_graph.node_count());
                    let (coarse, coarse_weights) = coarsen(
                        &level_graph,
                        &level_weights,
                        &outcome.labels,
                        outcome.cluster_count(),
                    )?;
                    membership = hierarchy.final_labels().to_vec();
                    level_graph = Cow::Owned(coarse);
                    level_weights = Cow::Owned(coarse_weights);
                    Phase::LocalSearch
                }
                Phase::Converged => break,
            };
        }

        Ok(hierarchy)
    }
}

/// Reject malformed input before any computation starts
fn validate_input(graph: &WeightedGraph, node_weights: &[f64], config: &ClusterConfig) -> Result<()> {
    config.validate()?;

    let n = graph.node_count();
    if n == 0 {
        return Err(ClusterError::EmptyGraph);
    }
    if node_weights.len() != n {
        return Err(ClusterError::DimensionMismatch {
            expected: n,
            found: node_weights.len(),
        });
    }
    if let Some((node, &weight)) = node_weights
        .iter()
        .enumerate()
        .find(|(_, w)| !(w.is_finite() && **w >= 0.0))
    {
        return Err(ClusterError::InvalidNodeWeight { node, weight });
    }

    graph.validate()
}

fn run_once<R: Rng + ?Sized>(
    graph: &WeightedGraph,
    node_weights: &[f64],
    config: &ClusterConfig,
    rng: &mut R,
) -> Result<Clustering> {
    let hierarchy = Multilevel::new(graph, node_weights, config).run(rng)?;

    let level_objectives: Vec<f64> = hierarchy
        .levels()
        .iter()
        .map(|labels| evaluate(graph, node_weights, labels, config.resolution))
        .collect();
    let levels = hierarchy.into_levels();
    let labels = levels.last().cloned().unwrap_or_default();
    let cluster_count = labels.iter().copied().max().map_or(0, |max| max + 1);

    Ok(Clustering {
        objective: level_objectives.last().copied().unwrap_or_default(),
        labels,
        cluster_count,
        resolution: config.resolution,
        levels,
        level_objectives,
    })
}

/// Single multilevel run.
///
/// Returns the final node-level partition and its objective together with
/// the per-level label vectors.
pub fn cluster(
    graph: &WeightedGraph,
    node_weights: &[f64],
    resolution: f64,
    randomize: bool,
    max_iterations: usize,
    cluster_penalty: f64,
) -> Result<Clustering> {
    let config = ClusterConfig::new(resolution)
        .with_randomize(randomize)
        .with_max_iterations(max_iterations)
        .with_cluster_penalty(cluster_penalty);
    cluster_with(graph, node_weights, &config)
}

/// Single multilevel run driven by a [`ClusterConfig`]; `restarts` is ignored
pub fn cluster_with(
    graph: &WeightedGraph,
    node_weights: &[f64],
    config: &ClusterConfig,
) -> Result<Clustering> {
    validate_input(graph, node_weights, config)?;

    let mut rng = match config.seed {
        Some(seed) => ChaCha20Rng::seed_from_u64(seed),
        None => ChaCha20Rng::from_entropy(),
    };
    let result = run_once(graph, node_weights, config, &mut rng)?;

    log::info!(
        "Clustered {} nodes into {} clusters over {} levels (objective {:.6})",
        graph.node_count(),
        result.cluster_count,
        result.levels.len(),
        result.objective
    );
    Ok(result)
}

/// Best of `restarts` independent randomized multilevel runs
pub fn cluster_best(
    graph: &WeightedGraph,
    node_weights: &[f64],
    resolution: f64,
    restarts: usize,
    max_iterations: usize,
) -> Result<BestClustering> {
    let config = ClusterConfig::new(resolution)
        .with_restarts(restarts)
        .with_max_iterations(max_iterations);
    cluster_best_with(graph, node_weights, &config)
}

/// Best-of-many driven by a [`ClusterConfig`].
///
/// Restarts always use randomized visit order and run on the rayon pool.
/// Restart `r` is seeded with `seed + r`, so a seeded call gives the same
/// result for any thread count. Ties go to the earliest restart.
pub fn cluster_best_with(
    graph: &WeightedGraph,
    node_weights: &[f64],
    config: &ClusterConfig,
) -> Result<BestClustering> {
    validate_input(graph, node_weights, config)?;

    let restart_config = ClusterConfig {
        randomize: true,
        ..config.clone()
    };
    let base_seed = config.seed.unwrap_or_else(|| rand::thread_rng().gen());

    log::info!(
        "Running {} restarts on {} threads",
        config.restarts,
        rayon::current_num_threads()
    );

    let mut runs: Vec<Clustering> = (0..config.restarts)
        .into_par_iter()
        .map(|restart| {
            let mut rng = ChaCha20Rng::seed_from_u64(base_seed.wrapping_add(restart as u64));
            run_once(graph, node_weights, &restart_config, &mut rng)
        })
        .collect::<Result<Vec<_>>>()?;

    let objectives: Vec<f64> = runs.iter().map(|run| run.objective).collect();
    let restart = objectives
        .iter()
        .enumerate()
        .min_by(|a, b| a.1.total_cmp(b.1))
        .map(|(restart, _)| restart)
        .ok_or(ClusterError::InvalidParameter {
            name: "restarts",
            message: "must be at least 1",
        })?;
    let best = runs.swap_remove(restart);

    log::info!(
        "Best of {} restarts: restart {} with {} clusters (objective {:.6})",
        objectives.len(),
        restart,
        best.cluster_count,
        best.objective
    );

    Ok(BestClustering {
        best,
        restart,
        objectives,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Two triangles joined by one weak edge
    fn barbell() -> WeightedGraph {
        WeightedGraph::from_edges(
            6,
            [
                (0, 1, 1.0),
                (1, 2, 1.0),
                (0, 2, 1.0),
                (3, 4, 1.0),
                (4, 5, 1.0),
                (3, 5, 1.0),
                (2, 3, 0.1),
            ],
        )
        .unwrap()
    }

    #[test]
    fn hierarchy_is_append_only() {
        let mut hierarchy = Hierarchy::default();
        assert!(hierarchy.final_labels().is_empty());
        hierarchy.push(vec![0, 1]);
        hierarchy.push(vec![0, 0]);
        assert_eq!(hierarchy.len(), 2);
        assert_eq!(hierarchy.final_labels(), &[0, 0]);
        assert_eq!(hierarchy.levels()[0], vec![0, 1]);
    }

    #[test]
    fn driver_builds_levels_until_converged() {
        // A chain of four triangles with weak links: level 0 finds the
        // triangles, level 1 pairs them up
        let mut edges = Vec::new();
        for t in 0..4 {
            let b = 3 * t;
            edges.extend([(b, b + 1, 1.0), (b + 1, b + 2, 1.0), (b, b + 2, 1.0)]);
        }
        edges.extend([(2, 3, 0.9), (5, 6, 0.05), (8, 9, 0.9)]);
        let graph = WeightedGraph::from_edges(12, edges).unwrap();
        let weights = vec![1.0; 12];
        let config = ClusterConfig::new(0.09);

        let mut rng = ChaCha20Rng::seed_from_u64(0);
        let hierarchy = Multilevel::new(&graph, &weights, &config).run(&mut rng).unwrap();

        assert_eq!(hierarchy.len(), 2);
        assert_eq!(
            hierarchy.levels()[0],
            vec![0, 0, 0, 1, 1, 1, 2, 2, 2, 3, 3, 3]
        );
        assert_eq!(
            hierarchy.final_labels(),
            &[0, 0, 0, 0, 0, 0, 1, 1, 1, 1, 1, 1]
        );
    }

    #[test]
    fn every_level_strictly_reduces_the_cluster_count() {
        let mut edges = Vec::new();
        for t in 0..6 {
            let b = 3 * t;
            edges.extend([(b, b + 1, 1.0), (b + 1, b + 2, 1.0), (b, b + 2, 1.0)]);
            edges.push((b + 2, (b + 3) % 18, 0.5));
        }
        let graph = WeightedGraph::from_edges(18, edges).unwrap();
        let weights = graph.weighted_degrees();
        let lam = 1.0 / weights.iter().sum::<f64>();

        for seed in 0..20 {
            let config = ClusterConfig::new(lam).with_randomize(true);
            let mut rng = ChaCha20Rng::seed_from_u64(seed);
            let hierarchy = Multilevel::new(&graph, &weights, &config).run(&mut rng).unwrap();

            let counts: Vec<usize> = hierarchy
                .levels()
                .iter()
                .map(|labels| labels.iter().max().unwrap() + 1)
                .collect();
            assert!(counts[0] < 18, "{counts:?}");
            for pair in counts.windows(2) {
                assert!(pair[1] < pair[0], "{counts:?}");
            }
        }
    }

    #[test]
    fn single_run_reports_objective_of_final_level() {
        let graph = barbell();
        let weights = vec![1.0; 6];
        let result = cluster(&graph, &weights, 0.1, false, 100, 0.0).unwrap();

        assert_eq!(result.cluster_count, 2);
        assert_eq!(result.labels, vec![0, 0, 0, 1, 1, 1]);
        let expected = evaluate(&graph, &weights, &result.labels, 0.1);
        assert_eq!(result.objective, expected);
        assert_eq!(result.level_objectives.len(), result.levels.len());
    }

    #[test]
    fn invalid_input_fails_before_clustering() {
        let graph = barbell();
        assert_eq!(
            cluster(&graph, &[1.0; 5], 0.1, false, 100, 0.0),
            Err(ClusterError::DimensionMismatch { expected: 6, found: 5 })
        );
        assert_eq!(
            cluster(&graph, &[1.0; 6], 0.0, false, 100, 0.0),
            Err(ClusterError::InvalidResolution(0.0))
        );
        let mut weights = vec![1.0; 6];
        weights[4] = -2.0;
        assert_eq!(
            cluster(&graph, &weights, 0.1, false, 100, 0.0),
            Err(ClusterError::InvalidNodeWeight { node: 4, weight: -2.0 })
        );
        let empty = WeightedGraph::from_edges(0, []).unwrap();
        assert_eq!(
            cluster(&empty, &[], 0.1, false, 100, 0.0),
            Err(ClusterError::EmptyGraph)
        );
    }

    #[test]
    fn seeded_best_of_many_is_reproducible() {
        let graph = barbell();
        let weights = graph.weighted_degrees();
        let config = ClusterConfig::new(0.05).with_restarts(6).with_seed(11);

        let a = cluster_best_with(&graph, &weights, &config).unwrap();
        let b = cluster_best_with(&graph, &weights, &config).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.objectives.len(), 6);
        assert_eq!(a.objectives[a.restart], a.best.objective);
    }
}
