//! Greedy single-level node moving

use rand::seq::SliceRandom;
use rand::Rng;

use crate::cluster::bookkeeping::ClusterBook;
use crate::graph::AdjacencyView;

/// Result of one local search pass
#[derive(Debug, Clone)]
pub struct LocalSearchOutcome {
    /// node -> dense cluster id in `0..K`
    pub labels: Vec<usize>,

    /// cluster id -> member nodes
    pub members: Vec<Vec<usize>>,

    /// At least one node changed cluster
    pub improved: bool,

    /// Total accepted moves
    pub moves: usize,

    /// Full sweeps performed
    pub sweeps: usize,

    /// The sweep cap was reached while nodes were still moving
    pub capped: bool,
}

impl LocalSearchOutcome {
    pub fn cluster_count(&self) -> usize {
        self.members.len()
    }
}

/// Mutable state owned by one pass: bookkeeping, counters and scratch space
struct PassContext {
    book: ClusterBook,
    improved: bool,
    moves: usize,
    sweeps: usize,

    /// cluster slot -> edge mass from the visited node, zero between visits
    edge_to: Vec<f64>,
    seen: Vec<bool>,

    /// Neighbor clusters of the visited node, in discovery order
    candidates: Vec<usize>,
}

impl PassContext {
    fn new(node_weights: &[f64]) -> Self {
        let n = node_weights.len();
        Self {
            book: ClusterBook::singletons(node_weights),
            improved: false,
            moves: 0,
            sweeps: 0,
            edge_to: vec![0.0; n],
            seen: vec![false; n],
            candidates: Vec::new(),
        }
    }
}

/// One greedy node-moving pass over a fixed graph level
pub struct LocalSearch<'a> {
    adjacency: &'a AdjacencyView,
    node_weights: &'a [f64],
    resolution: f64,
    cluster_penalty: f64,
    max_sweeps: usize,
}

impl<'a> LocalSearch<'a> {
    pub fn new(
        adjacency: &'a AdjacencyView,
        node_weights: &'a [f64],
        resolution: f64,
        cluster_penalty: f64,
        max_sweeps: usize,
    ) -> Self {
        debug_assert_eq!(adjacency.node_count(), node_weights.len());
        Self {
            adjacency,
            node_weights,
            resolution,
            cluster_penalty,
            max_sweeps,
        }
    }

    /// Start from singletons and sweep until a sweep makes no move or the
    /// cap is reached. With `randomize`, a single permutation is drawn from
    /// `rng` and used for every sweep of the pass.
    pub fn run<R: Rng + ?Sized>(&self, randomize: bool, rng: &mut R) -> LocalSearchOutcome {
        let n = self.adjacency.node_count();
        let mut order: Vec<usize> = (0..n).collect();
        if randomize {
            order.shuffle(rng);
        }

        let mut ctx = PassContext::new(self.node_weights);
        let mut sweep_moves = 0;
        while ctx.sweeps < self.max_sweeps {
            ctx.sweeps += 1;
            sweep_moves = 0;
            for &node in &order {
                if self.visit(&mut ctx, node) {
                    sweep_moves += 1;
                }
            }
            if sweep_moves == 0 {
                break;
            }
        }

        let capped = sweep_moves > 0;
        if capped {
            log::debug!(
                "Local search stopped at the cap of {} sweeps with {} moves in the last sweep",
                self.max_sweeps,
                sweep_moves
            );
        }

        let PassContext {
            book,
            improved,
            moves,
            sweeps,
            ..
        } = ctx;
        let dense = book.renumber();

        log::debug!(
            "Local search over {} nodes: {} moves in {} sweeps, {} clusters",
            n,
            moves,
            sweeps,
            dense.cluster_count()
        );

        LocalSearchOutcome {
            labels: dense.labels,
            members: dense.members,
            improved,
            moves,
            sweeps,
            capped,
        }
    }

    /// Evaluate every neighboring cluster for `node` and apply the best
    /// strictly improving move. Returns whether the node moved.
    fn visit(&self, ctx: &mut PassContext, node: usize) -> bool {
        let home = ctx.book.cluster_of(node);
        let wi = self.node_weights[node];

        for (neighbor, w) in self.adjacency.edges(node) {
            let c = ctx.book.cluster_of(neighbor);
            if !ctx.seen[c] {
                ctx.seen[c] = true;
                ctx.candidates.push(c);
            }
            ctx.edge_to[c] += w;
        }

        // Cost of staying: edges kept inside home minus the mass penalty
        // against the rest of home
        let pos_inner = ctx.edge_to[home];
        let neg_inner = self.resolution * wi * (ctx.book.volume(home) - wi);
        let total_inner = pos_inner - neg_inner;

        // Only a departing singleton changes the cluster count
        let cluster_delta = if self.cluster_penalty > 0.0 && ctx.book.is_singleton(node) {
            let k = ctx.book.cluster_count() as f64;
            self.cluster_penalty * ((k - 1.0).ln() - k.ln())
        } else {
            0.0
        };

        let mut best: Option<usize> = None;
        let mut best_change = 0.0;
        for &c in &ctx.candidates {
            if c == home {
                continue;
            }
            let pos_outer = ctx.edge_to[c];
            let neg_outer = self.resolution * wi * ctx.book.volume(c);
            let change = (neg_outer - pos_outer) + total_inner + cluster_delta;
            if change < best_change {
                best_change = change;
                best = Some(c);
            }
        }

        for &c in &ctx.candidates {
            ctx.edge_to[c] = 0.0;
            ctx.seen[c] = false;
        }
        ctx.candidates.clear();

        match best {
            Some(target) => {
                ctx.book.move_node(node, wi, home, target);
                ctx.moves += 1;
                ctx.improved = true;
                true
            }
            None => false,
        }
    }
}
