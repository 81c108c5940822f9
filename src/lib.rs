//! Course-section timetabling for the U-Engine ecosystem.
//!
//! Assigns course sections to a weekly grid of time slots and rooms so
//! that no instructor, assistant, or room is double-booked and hard
//! preferences hold. Oversized sections are split into groups that fit
//! the largest room and are kept on one day.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `Room`, `SectionRequest`, `SectionGroup`,
//!   `TimeSlot`, `SlotGrid`, `Timetable`, `Violation`
//! - **`split`**: Section splitting by room capacity
//! - **`csp`**: Generic backtracking solver with forward checking
//! - **`cp`**: Timetabling model (domains, constraints) on top of `csp`
//! - **`scheduler`**: Strict-then-relaxed retries and KPIs
//! - **`audit`**: Post-hoc violation report
//! - **`validation`**: Input integrity checks (duplicate IDs, rooms, room types)
//!
//! # Example
//!
//! ```
//! use u_timetable::models::{Room, SectionRequest};
//! use u_timetable::scheduler::{SchedulerConfig, TimetableScheduler};
//!
//! let sections = vec![
//!     SectionRequest::new("CS101", 70, "Omar"),
//!     SectionRequest::new("CS102", 20, "Ali").with_room_type("lab"),
//! ];
//! let rooms = vec![Room::lab("A", 30), Room::lecture_hall("B", 20)];
//!
//! let outcome = TimetableScheduler::with_config(SchedulerConfig::default().with_seed(7))
//!     .schedule(&sections, &rooms)
//!     .unwrap();
//! assert_eq!(outcome.groups.len(), 4);
//! for (day, placements) in outcome.timetable.by_day() {
//!     for p in placements {
//!         println!("{day} {} {} {}", p.slot, p.room_id, p.group_id);
//!     }
//! }
//! ```
//!
//! # References
//!
//! - Schaerf (1999), "A Survey of Automated Timetabling"
//! - Russell & Norvig (2020), "Artificial Intelligence: A Modern Approach", Ch. 6

pub mod audit;
pub mod cp;
pub mod csp;
pub mod error;
pub mod models;
pub mod scheduler;
pub mod split;
pub mod validation;

pub use error::ScheduleError;
