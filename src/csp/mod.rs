//! Generic finite-domain constraint solving.
//!
//! Domain-agnostic: variables hold values of any type `V`, constraints are
//! any type implementing [`Constraint<V>`]. The timetabling layer (`cp`)
//! instantiates it with slots and rooms, but nothing here knows about
//! either.
//!
//! - [`CspModel`]: variables with ordered domains plus constraints
//! - [`BacktrackingSolver`]: depth-first search with forward checking
//! - [`SearchMonitor`]: injectable observer for logging and early stopping
//!
//! # References
//! - Russell & Norvig (2020), "Artificial Intelligence: A Modern Approach", Ch. 6
//! - Dechter (2003), "Constraint Processing", Ch. 5

mod model;
mod monitor;
mod solver;

pub use model::{Assignment, Constraint, CspError, CspModel, VarId, Variable};
pub use monitor::{
    CompositeMonitor, LogMonitor, NoOpMonitor, NodeLimitMonitor, SearchCommand, SearchMonitor,
};
pub use solver::{BacktrackingSolver, SolveResult, SolveStatus, SolverConfig, SolverStatistics};
