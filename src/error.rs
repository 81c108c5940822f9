//! Crate error type.

use thiserror::Error;

use crate::csp::CspError;
use crate::validation::ValidationError;

/// Errors surfaced by the timetabling pipeline.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScheduleError {
    /// No rooms were supplied.
    #[error("configuration error: no rooms provided")]
    NoRooms,

    /// Input validation failed before any solve attempt.
    #[error("configuration error: {}", summarize(.0))]
    Configuration(Vec<ValidationError>),

    /// The constraint model could not be built.
    #[error("model error: {0}")]
    Model(#[from] CspError),

    /// Every attempt ended without a solution.
    #[error(
        "no feasible timetable after {attempts} attempt(s) \
         ({slots} slots, {rooms} rooms, {groups} groups)"
    )]
    SearchExhausted {
        /// Attempts made.
        attempts: usize,
        /// Slots in the universe.
        slots: usize,
        /// Rooms available.
        rooms: usize,
        /// Groups requiring a placement.
        groups: usize,
    },
}

impl ScheduleError {
    /// Whether this error was raised before search started.
    pub fn is_configuration(&self) -> bool {
        matches!(self, ScheduleError::NoRooms | ScheduleError::Configuration(_))
    }
}

fn summarize(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}
