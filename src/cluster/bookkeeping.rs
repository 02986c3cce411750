//! Partition bookkeeping for a single local search pass

/// Current partition kept both as a label vector and as member lists.
///
/// Cluster ids are slots `0..n`; a slot may be empty while the pass runs.
/// `members[c]` is always the exact pre-image of `c` under `labels`.
#[derive(Debug, Clone)]
pub struct ClusterBook {
    /// node -> cluster slot
    labels: Vec<usize>,

    /// cluster slot -> member nodes
    members: Vec<Vec<usize>>,

    /// node -> position inside `members[labels[node]]`
    slots: Vec<usize>,

    /// cluster slot -> summed node weight of its members
    volumes: Vec<f64>,

    /// Number of non-empty clusters
    live: usize,
}

/// Dense partition produced by [`ClusterBook::renumber`]
#[derive(Debug, Clone, PartialEq)]
pub struct Renumbered {
    /// node -> cluster id in `0..K`
    pub labels: Vec<usize>,

    /// cluster id -> member nodes
    pub members: Vec<Vec<usize>>,
}

impl Renumbered {
    pub fn cluster_count(&self) -> usize {
        self.members.len()
    }
}

impl ClusterBook {
    /// Every node in its own cluster, with slot id equal to the node id
    pub fn singletons(node_weights: &[f64]) -> Self {
        let n = node_weights.len();
        Self {
            labels: (0..n).collect(),
            members: (0..n).map(|i| vec![i]).collect(),
            slots: vec![0; n],
            volumes: node_weights.to_vec(),
            live: n,
        }
    }

    pub fn node_count(&self) -> usize {
        self.labels.len()
    }

    /// Number of non-empty clusters (K)
    pub fn cluster_count(&self) -> usize {
        self.live
    }

    pub fn cluster_of(&self, node: usize) -> usize {
        self.labels[node]
    }

    pub fn members(&self, cluster: usize) -> &[usize] {
        &self.members[cluster]
    }

    /// Summed node weight of a cluster
    pub fn volume(&self, cluster: usize) -> f64 {
        self.volumes[cluster]
    }

    pub fn is_singleton(&self, node: usize) -> bool {
        self.members[self.labels[node]].len() == 1
    }

    /// Move `node` from `from` to `to`, keeping labels, members and volumes in step
    pub fn move_node(&mut self, node: usize, weight: f64, from: usize, to: usize) {
        debug_assert_eq!(self.labels[node], from);
        if from == to {
            return;
        }

        let slot = self.slots[node];
        self.members[from].swap_remove(slot);
        if let Some(&shifted) = self.members[from].get(slot) {
            self.slots[shifted] = slot;
        }

        if self.members[from].is_empty() {
            // An empty cluster has exactly zero volume, not accumulated drift
            self.volumes[from] = 0.0;
            self.live -= 1;
        } else {
            self.volumes[from] -= weight;
        }

        if self.members[to].is_empty() {
            self.live += 1;
        }
        self.slots[node] = self.members[to].len();
        self.members[to].push(node);
        self.volumes[to] += weight;
        self.labels[node] = to;
    }

    /// Reassign dense ids `0..K`, walking slots in increasing order and
    /// keeping only clusters with at least one member
    pub fn renumber(self) -> Renumbered {
        let mut dense = vec![usize::MAX; self.members.len()];
        let mut members = Vec::with_capacity(self.live);
        for (slot, group) in self.members.into_iter().enumerate() {
            if !group.is_empty() {
                dense[slot] = members.len();
                members.push(group);
            }
        }

        let labels = self.labels.iter().map(|&slot| dense[slot]).collect();

        Renumbered { labels, members }
    }
}
