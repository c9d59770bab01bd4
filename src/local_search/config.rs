//! Local search configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Configuration parameters for guided local search.
///
/// Passed explicitly into the engine so independent restarts never share
/// search settings.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use u_fleet::local_search::SearchConfig;
///
/// let config = SearchConfig::default()
///     .with_time_limit(Duration::from_secs(5))
///     .with_max_iterations(2_000)
///     .with_lambda_coefficient(0.2);
/// assert_eq!(config.max_iterations, Some(2_000));
/// assert_eq!(config.or_opt_max_segment, 3);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Wall-clock budget, checked at the start of every outer iteration.
    pub time_limit: Duration,
    /// Optional cap on outer iterations; reaching it ends the search.
    pub max_iterations: Option<usize>,
    /// GLS penalty factor: λ = coefficient × local-optimum variable cost / arcs.
    pub lambda_coefficient: f64,
    /// Longest segment moved by Or-opt (segments of 2..=this length).
    pub or_opt_max_segment: usize,
    /// Number of independent restarts; the cheapest result wins.
    pub restarts: usize,
    /// Random relocations applied to the starting point of restarts after the first.
    pub perturbation_moves: usize,
    /// Seed for restart perturbations.
    pub seed: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            time_limit: Duration::from_secs(30),
            max_iterations: None,
            lambda_coefficient: 0.1,
            or_opt_max_segment: 3,
            restarts: 1,
            perturbation_moves: 10,
            seed: 42,
        }
    }
}

impl SearchConfig {
    /// Sets the wall-clock budget.
    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = limit;
        self
    }

    /// Sets the outer iteration cap.
    pub fn with_max_iterations(mut self, n: usize) -> Self {
        self.max_iterations = Some(n);
        self
    }

    /// Sets the GLS penalty factor.
    pub fn with_lambda_coefficient(mut self, coefficient: f64) -> Self {
        self.lambda_coefficient = coefficient;
        self
    }

    /// Sets the longest Or-opt segment.
    pub fn with_or_opt_max_segment(mut self, len: usize) -> Self {
        self.or_opt_max_segment = len;
        self
    }

    /// Sets the number of independent restarts.
    pub fn with_restarts(mut self, n: usize) -> Self {
        self.restarts = n;
        self
    }

    /// Sets the number of random relocations applied to restart starting points.
    pub fn with_perturbation_moves(mut self, n: usize) -> Self {
        self.perturbation_moves = n;
        self
    }

    /// Sets the perturbation seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}
