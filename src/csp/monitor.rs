//! Search monitoring interface.
//!
//! A [`SearchMonitor`] observes the backtracking search without touching
//! its logic: callbacks fire on entry, on every assignment, on domain
//! pruning, on backtrack, on solution, and on exit. A monitor can also stop
//! the search through [`SearchMonitor::search_command`].
//!
//! All callbacks have empty defaults, so a monitor only implements what it
//! needs. Monitors are single-threaded and should stay cheap; they run on
//! the solver's hot path.

use std::fmt;

use super::{SolveStatus, SolverStatistics, VarId};

/// What the search should do next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchCommand {
    /// Keep searching.
    #[default]
    Continue,
    /// Stop now; the solve ends as [`SolveStatus::Aborted`].
    Terminate,
}

impl fmt::Display for SearchCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchCommand::Continue => write!(f, "Continue"),
            SearchCommand::Terminate => write!(f, "Terminate"),
        }
    }
}

/// Observer of the backtracking search.
pub trait SearchMonitor {
    /// Returns the name of the monitor.
    fn name(&self) -> &str;

    /// Called once before the first assignment.
    fn on_enter_search(&mut self, _variables: usize, _constraints: usize) {}

    /// Polled before each node; `Terminate` aborts the search.
    fn search_command(&mut self, _statistics: &SolverStatistics) -> SearchCommand {
        SearchCommand::Continue
    }

    /// Called after a tentative assignment at `depth`.
    fn on_assign(&mut self, _var: VarId, _depth: usize, _statistics: &SolverStatistics) {}

    /// Called when forward checking removes `removed` values from `var`.
    fn on_prune(&mut self, _var: VarId, _removed: usize, _statistics: &SolverStatistics) {}

    /// Called when `var` runs out of values and the search backs up.
    fn on_backtrack(&mut self, _var: VarId, _statistics: &SolverStatistics) {}

    /// Called when a complete assignment is found.
    fn on_solution(&mut self, _statistics: &SolverStatistics) {}

    /// Called once when the search ends.
    fn on_exit_search(&mut self, _status: SolveStatus, _statistics: &SolverStatistics) {}
}

/// A monitor that does nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpMonitor;

impl SearchMonitor for NoOpMonitor {
    fn name(&self) -> &str {
        "NoOpMonitor"
    }
}

/// A monitor that narrates the search through the `log` facade.
///
/// Progress lines go to `debug` every `interval` nodes; the final
/// summary goes to `info`.
#[derive(Debug, Clone)]
pub struct LogMonitor {
    label: String,
    interval: u64,
    next_report: u64,
}

impl LogMonitor {
    /// Creates a monitor reporting every `interval` nodes.
    pub fn new(label: impl Into<String>, interval: u64) -> Self {
        let interval = interval.max(1);
        Self {
            label: label.into(),
            interval,
            next_report: interval,
        }
    }
}

impl Default for LogMonitor {
    fn default() -> Self {
        Self::new("search", 10_000)
    }
}

impl SearchMonitor for LogMonitor {
    fn name(&self) -> &str {
        "LogMonitor"
    }

    fn on_enter_search(&mut self, variables: usize, constraints: usize) {
        self.next_report = self.interval;
        log::debug!(
            "{}: starting search over {} variables and {} constraints",
            self.label,
            variables,
            constraints
        );
    }

    fn on_assign(&mut self, _var: VarId, depth: usize, statistics: &SolverStatistics) {
        if statistics.nodes >= self.next_report {
            self.next_report = statistics.nodes + self.interval;
            log::debug!(
                "{}: {} nodes, depth {}, {} backtracks, {} values pruned",
                self.label,
                statistics.nodes,
                depth,
                statistics.backtracks,
                statistics.values_pruned
            );
        }
    }

    fn on_exit_search(&mut self, status: SolveStatus, statistics: &SolverStatistics) {
        log::info!("{}: {} ({})", self.label, status, statistics);
    }
}

/// Stops the search after a fixed number of nodes.
#[derive(Debug, Clone, Copy)]
pub struct NodeLimitMonitor {
    limit: u64,
}

impl NodeLimitMonitor {
    /// Creates a monitor that terminates once `limit` nodes were explored.
    pub fn new(limit: u64) -> Self {
        Self { limit }
    }
}

impl SearchMonitor for NodeLimitMonitor {
    fn name(&self) -> &str {
        "NodeLimitMonitor"
    }

    fn search_command(&mut self, statistics: &SolverStatistics) -> SearchCommand {
        if statistics.nodes >= self.limit {
            SearchCommand::Terminate
        } else {
            SearchCommand::Continue
        }
    }
}

/// Fans callbacks out to several monitors.
///
/// The search terminates as soon as any child asks it to.
#[derive(Default)]
pub struct CompositeMonitor<'a> {
    monitors: Vec<&'a mut dyn SearchMonitor>,
}

impl<'a> CompositeMonitor<'a> {
    /// Creates an empty composite.
    pub fn new() -> Self {
        Self {
            monitors: Vec::new(),
        }
    }

    /// Adds a monitor.
    pub fn with(mut self, monitor: &'a mut dyn SearchMonitor) -> Self {
        self.monitors.push(monitor);
        self
    }

    /// Number of child monitors.
    pub fn len(&self) -> usize {
        self.monitors.len()
    }

    /// Whether there are no child monitors.
    pub fn is_empty(&self) -> bool {
        self.monitors.is_empty()
    }
}

impl SearchMonitor for CompositeMonitor<'_> {
    fn name(&self) -> &str {
        "CompositeMonitor"
    }

    fn on_enter_search(&mut self, variables: usize, constraints: usize) {
        for m in &mut self.monitors {
            m.on_enter_search(variables, constraints);
        }
    }

    fn search_command(&mut self, statistics: &SolverStatistics) -> SearchCommand {
        for m in &mut self.monitors {
            if m.search_command(statistics) == SearchCommand::Terminate {
                return SearchCommand::Terminate;
            }
        }
        SearchCommand::Continue
    }

    fn on_assign(&mut self, var: VarId, depth: usize, statistics: &SolverStatistics) {
        for m in &mut self.monitors {
            m.on_assign(var, depth, statistics);
        }
    }

    fn on_prune(&mut self, var: VarId, removed: usize, statistics: &SolverStatistics) {
        for m in &mut self.monitors {
            m.on_prune(var, removed, statistics);
        }
    }

    fn on_backtrack(&mut self, var: VarId, statistics: &SolverStatistics) {
        for m in &mut self.monitors {
            m.on_backtrack(var, statistics);
        }
    }

    fn on_solution(&mut self, statistics: &SolverStatistics) {
        for m in &mut self.monitors {
            m.on_solution(statistics);
        }
    }

    fn on_exit_search(&mut self, status: SolveStatus, statistics: &SolverStatistics) {
        for m in &mut self.monitors {
            m.on_exit_search(status, statistics);
        }
    }
}
