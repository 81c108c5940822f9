//! Backtracking search with forward checking.
//!
//! # Algorithm
//!
//! 1. Node consistency: unary constraints filter domains before search.
//! 2. Variables are assigned in declaration order; values are tried in
//!    the order of the variable's current (pruned) domain.
//! 3. After each tentative assignment every constraint whose scope is now
//!    fully assigned is evaluated; a violation rejects the value.
//! 4. Forward checking: for every constraint with exactly one unassigned
//!    variable left, values of that variable that would violate it are
//!    removed. A wiped-out domain rejects the value immediately.
//! 5. Removed values are recorded on a trail and restored on backtrack.
//!
//! The search is deterministic for a fixed variable and domain order;
//! callers randomize those orders to get restart diversity.
//!
//! # Complexity
//! Worst case O(d^n) nodes for n variables with domain size d. Use
//! [`SolverConfig::node_limit`] to bound a single solve.
//!
//! # Reference
//! Haralick & Elliott (1980), "Increasing Tree Search Efficiency for
//! Constraint Satisfaction Problems"

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{Duration, Instant};

use super::{Assignment, Constraint, CspModel, NoOpMonitor, SearchCommand, SearchMonitor, VarId};

/// Solver settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolverConfig {
    /// Maximum number of search nodes (tentative assignments). `None` = unbounded.
    pub node_limit: Option<u64>,
}

impl SolverConfig {
    /// Sets the node limit.
    pub fn with_node_limit(mut self, limit: u64) -> Self {
        self.node_limit = Some(limit);
        self
    }
}

/// How a solve ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SolveStatus {
    /// A complete consistent assignment was found.
    Solved,
    /// The search space was exhausted without a solution.
    Infeasible,
    /// The node limit or a monitor stopped the search early.
    Aborted,
}

impl fmt::Display for SolveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolveStatus::Solved => write!(f, "solved"),
            SolveStatus::Infeasible => write!(f, "infeasible"),
            SolveStatus::Aborted => write!(f, "aborted"),
        }
    }
}

/// Search counters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolverStatistics {
    /// Tentative assignments made.
    pub nodes: u64,
    /// Variables whose domain was exhausted.
    pub backtracks: u64,
    /// Constraint evaluations.
    pub constraint_checks: u64,
    /// Values removed by forward checking.
    pub values_pruned: u64,
    /// Forward checks that emptied a domain.
    pub wipeouts: u64,
    /// Values removed by node consistency before search.
    pub unary_filtered: u64,
    /// Deepest level reached.
    pub max_depth: usize,
    /// Wall-clock time of the solve.
    pub elapsed: Duration,
}

impl fmt::Display for SolverStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "nodes={} backtracks={} checks={} pruned={} wipeouts={} depth={} elapsed={:?}",
            self.nodes,
            self.backtracks,
            self.constraint_checks,
            self.values_pruned,
            self.wipeouts,
            self.max_depth,
            self.elapsed
        )
    }
}

/// Result of a solve.
#[derive(Debug, Clone)]
pub struct SolveResult<V> {
    /// How the search ended.
    pub status: SolveStatus,
    /// The solution, present iff `status == Solved`.
    pub assignment: Option<Assignment<V>>,
    /// Search counters.
    pub statistics: SolverStatistics,
}

impl<V> SolveResult<V> {
    /// Whether a solution was found.
    pub fn is_solved(&self) -> bool {
        self.status == SolveStatus::Solved
    }
}

/// Depth-first backtracking solver with forward checking.
///
/// # Example
/// ```
/// use u_timetable::csp::{BacktrackingSolver, Constraint, CspModel, VarId};
///
/// struct Differ(VarId, VarId);
/// impl Constraint<u8> for Differ {
///     fn scope(&self) -> Vec<VarId> { vec![self.0, self.1] }
///     fn is_satisfied(&self, v: &[&u8]) -> bool { v[0] != v[1] }
/// }
///
/// let mut model = CspModel::new();
/// let a = model.add_variable("a", vec![1u8, 2]).unwrap();
/// let b = model.add_variable("b", vec![1u8, 2]).unwrap();
/// model.add_constraint(Differ(a, b)).unwrap();
///
/// let result = BacktrackingSolver::new().solve(&model);
/// let asg = result.assignment.unwrap();
/// assert_ne!(asg.get(a), asg.get(b));
/// ```
#[derive(Debug, Clone, Default)]
pub struct BacktrackingSolver {
    config: SolverConfig,
}

impl BacktrackingSolver {
    /// Creates a solver with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a solver with the given settings.
    pub fn with_config(config: SolverConfig) -> Self {
        Self { config }
    }

    /// Solver settings.
    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Finds the first consistent assignment.
    pub fn solve<V, C>(&self, model: &CspModel<V, C>) -> SolveResult<V>
    where
        V: Clone,
        C: Constraint<V>,
    {
        self.solve_with_monitor(model, &mut NoOpMonitor)
    }

    /// Finds the first consistent assignment, reporting to `monitor`.
    pub fn solve_with_monitor<V, C, M>(
        &self,
        model: &CspModel<V, C>,
        monitor: &mut M,
    ) -> SolveResult<V>
    where
        V: Clone,
        C: Constraint<V>,
        M: SearchMonitor + ?Sized,
    {
        let started = Instant::now();
        let mut search = Search::new(model, monitor, self.config.node_limit);
        search
            .monitor
            .on_enter_search(model.variable_count(), model.constraint_count());

        let status = if !search.enforce_node_consistency() {
            SolveStatus::Infeasible
        } else if search.descend(0) {
            SolveStatus::Solved
        } else if search.aborted {
            SolveStatus::Aborted
        } else {
            SolveStatus::Infeasible
        };

        search.stats.elapsed = started.elapsed();
        let assignment = (status == SolveStatus::Solved).then(|| search.extract());
        if assignment.is_some() {
            search.monitor.on_solution(&search.stats);
        }
        search.monitor.on_exit_search(status, &search.stats);

        SolveResult {
            status,
            assignment,
            statistics: search.stats,
        }
    }
}

/// Mutable search state for one solve.
struct Search<'a, V, C, M: ?Sized> {
    model: &'a CspModel<V, C>,
    monitor: &'a mut M,
    node_limit: Option<u64>,
    /// `live[var][i]`: whether domain value `i` of `var` is still a candidate.
    live: Vec<Vec<bool>>,
    /// Domain index assigned to each variable.
    assigned: Vec<Option<usize>>,
    /// Values removed by forward checking, restored on backtrack.
    trail: Vec<(usize, usize)>,
    stats: SolverStatistics,
    aborted: bool,
}

impl<'a, V, C, M> Search<'a, V, C, M>
where
    V: Clone,
    C: Constraint<V>,
    M: SearchMonitor + ?Sized,
{
    fn new(model: &'a CspModel<V, C>, monitor: &'a mut M, node_limit: Option<u64>) -> Self {
        let live = model
            .variables()
            .iter()
            .map(|v| vec![true; v.domain.len()])
            .collect();
        Self {
            model,
            monitor,
            node_limit,
            live,
            assigned: vec![None; model.variable_count()],
            trail: Vec::new(),
            stats: SolverStatistics::default(),
            aborted: false,
        }
    }

    /// Applies unary constraints to the initial domains.
    fn enforce_node_consistency(&mut self) -> bool {
        for ci in 0..self.model.constraint_count() {
            let scope = self.model.scope(ci);
            if scope.len() != 1 {
                continue;
            }
            let var = scope[0].index();
            for i in 0..self.live[var].len() {
                if self.live[var][i] && !self.holds(ci, Some((var, i))) {
                    self.live[var][i] = false;
                    self.stats.unary_filtered += 1;
                }
            }
            if !self.live[var].iter().any(|&l| l) {
                return false;
            }
        }
        true
    }

    fn descend(&mut self, depth: usize) -> bool {
        if depth == self.model.variable_count() {
            return true;
        }
        self.stats.max_depth = self.stats.max_depth.max(depth);

        // Variables are assigned in declaration order, so depth is the var index.
        let var = depth;
        let candidates: Vec<usize> = (0..self.live[var].len())
            .filter(|&i| self.live[var][i])
            .collect();

        for value in candidates {
            if self.should_stop() {
                self.aborted = true;
                return false;
            }

            self.stats.nodes += 1;
            self.assigned[var] = Some(value);
            self.monitor.on_assign(VarId(var), depth, &self.stats);

            let mark = self.trail.len();
            if self.check_assigned(var) && self.forward_check(var) && self.descend(depth + 1) {
                return true;
            }
            self.undo_to(mark);
            self.assigned[var] = None;

            if self.aborted {
                return false;
            }
        }

        self.stats.backtracks += 1;
        self.monitor.on_backtrack(VarId(var), &self.stats);
        false
    }

    fn should_stop(&mut self) -> bool {
        if self.node_limit.is_some_and(|limit| self.stats.nodes >= limit) {
            return true;
        }
        self.monitor.search_command(&self.stats) == SearchCommand::Terminate
    }

    /// Evaluates every fully assigned constraint on `var`.
    fn check_assigned(&mut self, var: usize) -> bool {
        let model = self.model;
        for &ci in model.constraints_on(VarId(var)) {
            if model.scope(ci).iter().all(|v| self.assigned[v.index()].is_some())
                && !self.holds(ci, None)
            {
                return false;
            }
        }
        true
    }

    /// Prunes the last free variable of each constraint on `var`.
    fn forward_check(&mut self, var: usize) -> bool {
        let model = self.model;
        for &ci in model.constraints_on(VarId(var)) {
            let mut free = model
                .scope(ci)
                .iter()
                .map(|v| v.index())
                .filter(|&v| self.assigned[v].is_none());
            let target = match (free.next(), free.next()) {
                (Some(target), None) => target,
                _ => continue,
            };

            let mut removed = 0;
            let mut remaining = 0;
            for i in 0..self.live[target].len() {
                if !self.live[target][i] {
                    continue;
                }
                if self.holds(ci, Some((target, i))) {
                    remaining += 1;
                } else {
                    self.live[target][i] = false;
                    self.trail.push((target, i));
                    removed += 1;
                }
            }

            if removed > 0 {
                self.stats.values_pruned += removed as u64;
                self.monitor.on_prune(VarId(target), removed, &self.stats);
            }
            if remaining == 0 {
                self.stats.wipeouts += 1;
                return false;
            }
        }
        true
    }

    fn undo_to(&mut self, mark: usize) {
        while self.trail.len() > mark {
            if let Some((var, i)) = self.trail.pop() {
                self.live[var][i] = true;
            }
        }
    }

    /// Evaluates constraint `ci` under the current assignment, with
    /// `probe = (var, value)` standing in for one unassigned variable.
    fn holds(&mut self, ci: usize, probe: Option<(usize, usize)>) -> bool {
        self.stats.constraint_checks += 1;
        let model = self.model;
        let values: Option<Vec<&V>> = model
            .scope(ci)
            .iter()
            .map(|v| {
                let var = v.index();
                let index = match probe {
                    Some((p, i)) if p == var => Some(i),
                    _ => self.assigned[var],
                };
                index.map(|i| &model.variables()[var].domain[i])
            })
            .collect();
        // Callers only evaluate fully determined scopes.
        values.is_some_and(|vals| model.constraints()[ci].is_satisfied(&vals))
    }

    fn extract(&self) -> Assignment<V> {
        let vars = self.model.variables();
        let names = vars.iter().map(|v| v.name.clone()).collect();
        let values = vars
            .iter()
            .zip(&self.assigned)
            .filter_map(|(v, a)| a.map(|i| v.domain[i].clone()))
            .collect();
        Assignment::new(names, values)
    }
}
