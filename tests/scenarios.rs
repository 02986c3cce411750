use lambda_louvain::cluster::objective;
use lambda_louvain::graph::{coarsen, expand_labels};
use lambda_louvain::{cluster, cluster_best, ClusterConfig, ClusterError, GraphBuilder, WeightedGraph};

fn triangle_edges(base: usize) -> [(usize, usize, f64); 3] {
    [
        (base, base + 1, 1.0),
        (base + 1, base + 2, 1.0),
        (base, base + 2, 1.0),
    ]
}

fn complete_graph(n: usize) -> WeightedGraph {
    let edges: Vec<_> = (0..n)
        .flat_map(|i| ((i + 1)..n).map(move |j| (i, j, 1.0)))
        .collect();
    WeightedGraph::from_edges(n, edges).unwrap()
}

/// Ring of `cliques` cliques of size `size`, neighbors joined by one edge
fn ring_of_cliques(cliques: usize, size: usize) -> WeightedGraph {
    let n = cliques * size;
    let mut edges = Vec::new();
    for c in 0..cliques {
        let base = c * size;
        for i in 0..size {
            for j in (i + 1)..size {
                edges.push((base + i, base + j, 1.0));
            }
        }
        let next = ((c + 1) % cliques) * size;
        edges.push((base + size - 1, next, 1.0));
    }
    WeightedGraph::from_edges(n, edges).unwrap()
}

fn assert_valid_partition(labels: &[usize], n: usize) {
    assert_eq!(labels.len(), n);
    let k = labels.iter().copied().max().map_or(0, |max| max + 1);
    assert!(k >= 1);
    let mut used = vec![false; k];
    for &label in labels {
        used[label] = true;
    }
    assert!(used.iter().all(|&u| u), "labels are not contiguous: {labels:?}");
}

#[test]
fn two_disjoint_triangles_form_two_clusters() {
    let edges: Vec<_> = triangle_edges(0).into_iter().chain(triangle_edges(3)).collect();
    let graph = WeightedGraph::from_edges(6, edges).unwrap();

    let result = cluster(&graph, &[1.0; 6], 0.2, false, 100, 0.0).unwrap();

    assert_eq!(result.cluster_count, 2);
    assert_eq!(result.labels[0], result.labels[1]);
    assert_eq!(result.labels[1], result.labels[2]);
    assert_eq!(result.labels[3], result.labels[4]);
    assert_eq!(result.labels[4], result.labels[5]);
    assert_ne!(result.labels[0], result.labels[3]);
    // lam * 3 pairs per triangle, no cut edges
    assert!((result.objective - 0.2 * 6.0).abs() < 1e-12);
}

#[test]
fn isolated_node_stays_alone() {
    let graph = WeightedGraph::from_edges(1, []).unwrap();
    for lam in [1e-6, 0.5, 1.0, 1e6] {
        let result = cluster(&graph, &[1.0], lam, false, 100, 0.0).unwrap();
        assert_eq!(result.labels, vec![0]);
        assert_eq!(result.cluster_count, 1);
        assert_eq!(result.levels.len(), 1);
    }
}

#[test]
fn complete_graph_with_large_resolution_stays_singletons() {
    let graph = complete_graph(7);
    let result = cluster(&graph, &[1.0; 7], 5.0, false, 100, 0.0).unwrap();

    assert_eq!(result.cluster_count, 7);
    assert_eq!(result.labels, (0..7).collect::<Vec<_>>());
    assert_eq!(result.levels.len(), 1);
    assert!((result.objective - graph.total_edge_weight()).abs() < 1e-12);
}

#[test]
fn complete_graph_with_small_resolution_merges() {
    let graph = complete_graph(7);
    let result = cluster(&graph, &[1.0; 7], 0.1, false, 100, 0.0).unwrap();
    assert_eq!(result.cluster_count, 1);
}

#[test]
fn edgeless_graph_keeps_every_node_singleton() {
    let graph = GraphBuilder::new(10).build();
    for lam in [0.001, 1.0, 50.0] {
        let result = cluster(&graph, &[2.0; 10], lam, true, 100, 0.0).unwrap();
        assert_eq!(result.cluster_count, 10);
        assert_valid_partition(&result.labels, 10);
    }
}

#[test]
fn ring_of_cliques_recovers_each_clique() {
    let graph = ring_of_cliques(6, 5);
    let weights = graph.weighted_degrees();
    let lam = 1.0 / weights.iter().sum::<f64>();

    let result = cluster(&graph, &weights, lam, false, 100, 0.0).unwrap();

    assert_eq!(result.cluster_count, 6);
    for c in 0..6 {
        let label = result.labels[c * 5];
        assert!(result.labels[c * 5..(c + 1) * 5].iter().all(|&l| l == label));
    }
}

#[test]
fn natural_order_is_deterministic() {
    let graph = ring_of_cliques(5, 4);
    let weights = graph.weighted_degrees();
    let first = cluster(&graph, &weights, 0.02, false, 100, 0.0).unwrap();
    for _ in 0..5 {
        let again = cluster(&graph, &weights, 0.02, false, 100, 0.0).unwrap();
        assert_eq!(again.labels, first.labels);
        assert_eq!(again.objective, first.objective);
    }
}

#[test]
fn level_objectives_never_increase() {
    let graph = ring_of_cliques(8, 4);
    let weights = graph.weighted_degrees();
    let lam = 1.0 / weights.iter().sum::<f64>();
    let result = cluster(&graph, &weights, lam, false, 100, 0.0).unwrap();

    assert!(result.levels.len() >= 1);
    for pair in result.level_objectives.windows(2) {
        assert!(pair[1] <= pair[0] + 1e-12, "{:?}", result.level_objectives);
    }
    for (labels, &reported) in result.levels.iter().zip(&result.level_objectives) {
        assert_valid_partition(labels, graph.node_count());
        let recomputed = objective(&graph, &weights, labels, lam).unwrap();
        assert!((recomputed - reported).abs() < 1e-9);
    }
    assert_eq!(result.levels.last().unwrap(), &result.labels);
}

#[test]
fn best_of_many_is_a_lower_bound() {
    let graph = ring_of_cliques(6, 4);
    let weights = graph.weighted_degrees();
    let lam = 1.0 / weights.iter().sum::<f64>();

    let best = cluster_best(&graph, &weights, lam, 8, 100).unwrap();

    assert_eq!(best.objectives.len(), 8);
    for &obj in &best.objectives {
        assert!(best.best.objective <= obj);
    }
    assert_eq!(best.best.objective, best.objectives[best.restart]);
    assert_valid_partition(&best.best.labels, graph.node_count());
}

#[test]
fn best_of_many_restarts_match_single_seeded_runs() {
    let graph = ring_of_cliques(5, 3);
    let weights = graph.weighted_degrees();
    let config = ClusterConfig::new(0.03).with_restarts(4).with_seed(100);

    let best = lambda_louvain::cluster_best_with(&graph, &weights, &config).unwrap();

    for restart in 0..4u64 {
        let single = ClusterConfig::new(0.03)
            .with_randomize(true)
            .with_seed(100 + restart);
        let run = lambda_louvain::cluster_with(&graph, &weights, &single).unwrap();
        assert_eq!(run.objective, best.objectives[restart as usize]);
    }
}

#[test]
fn re_coarsening_the_expanded_partition_matches_the_coarse_graph() {
    let graph = ring_of_cliques(6, 3);
    let weights = graph.weighted_degrees();

    // Level 0: one supernode per clique
    let fine: Vec<usize> = (0..18).map(|node| node / 3).collect();
    let (level1, level1_weights) = coarsen(&graph, &weights, &fine, 6).unwrap();

    // Level 1: pair up neighboring cliques
    let coarse = vec![0, 0, 1, 1, 2, 2];
    let (level2, level2_weights) = coarsen(&level1, &level1_weights, &coarse, 3).unwrap();

    // Expanding to nodes and coarsening directly yields the same graph
    let expanded = expand_labels(&fine, &coarse);
    let (direct, direct_weights) = coarsen(&graph, &weights, &expanded, 3).unwrap();

    assert_eq!(direct, level2);
    assert_eq!(direct_weights, level2_weights);

    // Re-coarsening with the level-0 partition itself is stable too
    let (again, again_weights) = coarsen(&graph, &weights, &fine, 6).unwrap();
    assert_eq!(again, level1);
    assert_eq!(again_weights, level1_weights);
}

#[test]
fn malformed_graphs_are_rejected() {
    let mut builder = GraphBuilder::new(3);
    builder.add_entry(0, 1, 1.0).unwrap();
    builder.add_entry(1, 0, 2.0).unwrap();
    let asymmetric = builder.build();
    assert!(matches!(
        cluster(&asymmetric, &[1.0; 3], 0.5, false, 100, 0.0),
        Err(ClusterError::Asymmetric { .. })
    ));

    let mut builder = GraphBuilder::new(2);
    builder.add_edge(0, 1, 1.0).unwrap();
    builder.add_edge(1, 1, 1.0).unwrap();
    let looped = builder.build();
    assert!(matches!(
        cluster(&looped, &[1.0; 2], 0.5, false, 100, 0.0),
        Err(ClusterError::SelfLoop { node: 1, .. })
    ));

    let graph = complete_graph(3);
    assert!(matches!(
        cluster(&graph, &[1.0; 3], -1.0, false, 100, 0.0),
        Err(ClusterError::InvalidResolution(_))
    ));
    assert!(matches!(
        cluster_best(&graph, &[1.0; 3], 0.5, 0, 100),
        Err(ClusterError::InvalidParameter { name: "restarts", .. })
    ));
}

#[test]
fn iteration_cap_still_returns_a_valid_partition() {
    let graph = ring_of_cliques(4, 5);
    let weights = vec![1.0; 20];
    let result = cluster(&graph, &weights, 0.05, false, 1, 0.0).unwrap();
    assert_valid_partition(&result.labels, 20);
}
