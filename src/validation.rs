//! Input validation for timetabling problems.
//!
//! Checks structural integrity of section requests and rooms before any
//! model is built. Detects:
//! - An empty room set
//! - Duplicate section or room IDs
//! - Rooms without seats
//! - Sections without students
//! - Required room types that no room provides
//! - Sections without an instructor
//! - Split group IDs that collide with section IDs
//!
//! Every issue is collected; validation does not stop at the first one.

use crate::models::{Room, SectionRequest};
use crate::split::split_all;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValidationErrorKind {
    /// No rooms were supplied.
    NoRooms,
    /// Two entities share the same ID.
    DuplicateId,
    /// A room has zero capacity.
    InvalidCapacity,
    /// A section has no students.
    EmptySection,
    /// A section requires a room type that no room has.
    UnmatchedRoomType,
    /// A section has a blank instructor name.
    MissingInstructor,
}

impl ValidationError {
    /// Creates a validation error.
    pub fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates the input data for a timetabling problem.
///
/// Checks:
/// 1. At least one room exists
/// 2. No duplicate room IDs
/// 3. Every room has a positive capacity
/// 4. No duplicate section IDs
/// 5. Every section has at least one student
/// 6. Every required room type is provided by some room (case-insensitive)
/// 7. Every section names an instructor
/// 8. No split group ID (`{id}_G{n}`) equals a section ID
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_input(sections: &[SectionRequest], rooms: &[Room]) -> ValidationResult {
    let mut errors = Vec::new();

    if rooms.is_empty() {
        errors.push(ValidationError::new(
            ValidationErrorKind::NoRooms,
            "No rooms provided",
        ));
    }

    let mut room_ids = HashSet::new();
    let mut room_types = HashSet::new();
    for r in rooms {
        if !room_ids.insert(r.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate room ID: {}", r.id),
            ));
        }
        if r.capacity == 0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidCapacity,
                format!("Room '{}' has no seats", r.id),
            ));
        }
        room_types.insert(r.room_type.trim().to_lowercase());
    }

    let mut section_ids = HashSet::new();
    for s in sections {
        if !section_ids.insert(s.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate section ID: {}", s.id),
            ));
        }
        if s.instructor.trim().is_empty() {
            errors.push(ValidationError::new(
                ValidationErrorKind::MissingInstructor,
                format!("Section '{}' has no instructor", s.id),
            ));
        }
        if s.students == 0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::EmptySection,
                format!("Section '{}' has no students", s.id),
            ));
        }
        // An empty room set is already reported above.
        if s.requires_room_type()
            && !rooms.is_empty()
            && !room_types.contains(&s.room_type.trim().to_lowercase())
        {
            errors.push(ValidationError::new(
                ValidationErrorKind::UnmatchedRoomType,
                format!(
                    "Section '{}' requires room type '{}' but no room has it",
                    s.id, s.room_type
                ),
            ));
        }
    }

    // Split groups are named `{id}_G{n}` and must not collide with a section.
    if let Ok(groups) = split_all(sections, rooms) {
        for g in groups.iter().filter(|g| g.is_split()) {
            if section_ids.contains(g.id.as_str()) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::DuplicateId,
                    format!(
                        "Group ID {} of split section '{}' clashes with a section ID",
                        g.id,
                        g.section_id()
                    ),
                ));
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
