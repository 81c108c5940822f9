//! Scheduler configuration.

use serde::{Deserialize, Serialize};

use crate::models::SlotGrid;

/// Settings of a [`super::TimetableScheduler`] run.
///
/// # Example
/// ```
/// use u_timetable::scheduler::SchedulerConfig;
///
/// let config = SchedulerConfig::default()
///     .with_seed(42)
///     .with_max_attempts(5);
/// assert_eq!(config.seed, Some(42));
/// assert_eq!(config.node_limit, Some(200_000));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Attempts before giving up. The first is strict, the rest relaxed.
    pub max_attempts: usize,
    /// RNG seed for slot shuffling. `None` draws from OS entropy.
    pub seed: Option<u64>,
    /// Search node budget per attempt. `None` = unbounded.
    pub node_limit: Option<u64>,
    /// Fraction of a group a room must seat under the relaxed model.
    pub relaxed_capacity_ratio: f64,
    /// Weekly slot grid.
    pub grid: SlotGrid,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            seed: None,
            node_limit: Some(200_000),
            relaxed_capacity_ratio: 0.5,
            grid: SlotGrid::default(),
        }
    }
}

impl SchedulerConfig {
    /// Sets the attempt budget (at least 1).
    pub fn with_max_attempts(mut self, attempts: usize) -> Self {
        self.max_attempts = attempts.max(1);
        self
    }

    /// Fixes the RNG seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Sets the per-attempt node budget.
    pub fn with_node_limit(mut self, limit: u64) -> Self {
        self.node_limit = Some(limit);
        self
    }

    /// Removes the per-attempt node budget.
    pub fn without_node_limit(mut self) -> Self {
        self.node_limit = None;
        self
    }

    /// Sets the relaxed capacity ratio.
    pub fn with_relaxed_capacity_ratio(mut self, ratio: f64) -> Self {
        self.relaxed_capacity_ratio = ratio;
        self
    }

    /// Sets the slot grid.
    pub fn with_grid(mut self, grid: SlotGrid) -> Self {
        self.grid = grid;
        self
    }
}
