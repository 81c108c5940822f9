//! Timetabling domain models.
//!
//! Provides the core data types for describing a course timetabling
//! problem and its solution.
//!
//! # Domain Mappings
//!
//! | u-timetable | University | Training Center | Clinic |
//! |-------------|-----------|-----------------|--------|
//! | SectionRequest | Course Section | Workshop | Session Series |
//! | SectionGroup | Lecture Group | Cohort | Session |
//! | Room | Classroom/Lab | Training Room | Treatment Room |
//! | TimeSlot | Period | Block | Appointment Slot |
//! | Timetable | Term Timetable | Course Plan | Weekly Roster |

mod grid;
mod group;
mod room;
mod section;
mod slot;
mod timetable;

pub use grid::SlotGrid;
pub use group::SectionGroup;
pub use room::{max_capacity, Room};
pub use section::{normalize_name, SectionRequest, TimePreference};
pub use slot::{format_clock, parse_clock, SlotParseError, TimeSlot, Weekday};
pub use timetable::{Placement, Timetable, Violation, ViolationSeverity, ViolationType};
