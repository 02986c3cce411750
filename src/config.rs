//! Configuration for a clustering run

use serde::{Deserialize, Serialize};

use crate::error::{ClusterError, Result};

/// Parameters shared by single runs and best-of-many restarts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterConfig {
    /// Resolution parameter (lam); larger values favor more, smaller clusters
    pub resolution: f64,

    /// Maximum number of full sweeps per local search pass
    pub max_iterations: usize,

    /// Added to the move delta whenever a singleton cluster disbands
    pub cluster_penalty: f64,

    /// Visit nodes in a random permutation instead of natural order
    pub randomize: bool,

    /// Number of independent multilevel runs for best-of-many selection
    pub restarts: usize,

    /// Base seed for the visit-order generator; drawn from entropy when unset
    pub seed: Option<u64>,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            resolution: 1.0,
            max_iterations: 100,
            cluster_penalty: 0.0,
            randomize: false,
            restarts: 1,
            seed: None,
        }
    }
}

impl ClusterConfig {
    /// Create a configuration for a single run with the given resolution
    pub fn new(resolution: f64) -> Self {
        Self {
            resolution,
            ..Self::default()
        }
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn with_cluster_penalty(mut self, cluster_penalty: f64) -> Self {
        self.cluster_penalty = cluster_penalty;
        self
    }

    pub fn with_randomize(mut self, randomize: bool) -> Self {
        self.randomize = randomize;
        self
    }

    pub fn with_restarts(mut self, restarts: usize) -> Self {
        self.restarts = restarts;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Reject parameter values the objective is undefined for
    pub fn validate(&self) -> Result<()> {
        if !(self.resolution.is_finite() && self.resolution > 0.0) {
            return Err(ClusterError::InvalidResolution(self.resolution));
        }
        if self.max_iterations == 0 {
            return Err(ClusterError::InvalidParameter {
                name: "max_iterations",
                message: "must be at least 1",
            });
        }
        if !(self.cluster_penalty.is_finite() && self.cluster_penalty >= 0.0) {
            return Err(ClusterError::InvalidParameter {
                name: "cluster_penalty",
                message: "must be a nonnegative finite number",
            });
        }
        if self.restarts == 0 {
            return Err(ClusterError::InvalidParameter {
                name: "restarts",
                message: "must be at least 1",
            });
        }
        Ok(())
    }
}
