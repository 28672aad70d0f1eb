//! Per-epoch run statistics.
//!
//! [`RunStats`] records one entry per executed epoch so callers can inspect
//! how the search converged after [`FireflyOptimizer::run`](crate::FireflyOptimizer::run)
//! returns.

use super::Swarm;

/// Time-series metrics captured during an optimization run.
///
/// # Examples
/// ```
/// use firefly::RunStats;
/// let stats = RunStats::new();
/// assert_eq!(stats.epochs(), 0);
/// ```
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunStats {
    /// Best-ever error after each epoch. Never increases.
    pub best_error: Vec<f64>,
    /// Mean error of the swarm after each epoch.
    pub mean_error: Vec<f64>,
    /// Positional spread of the swarm after each epoch.
    pub population_diversity: Vec<f64>,
}

impl RunStats {
    /// Creates an empty set of run statistics.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of epochs recorded.
    #[must_use]
    pub fn epochs(&self) -> usize {
        self.best_error.len()
    }

    pub(crate) fn record(&mut self, swarm: &Swarm, best_error: f64) {
        self.best_error.push(best_error);
        self.mean_error.push(swarm.mean_error());
        self.population_diversity.push(swarm.diversity());
    }
}
