//! Timetabling orchestration and KPI evaluation.
//!
//! # Algorithm
//!
//! `TimetableScheduler` validates the input, then runs up to
//! `max_attempts` searches: the strict model first, the relaxed model
//! after. Every attempt reshuffles the slot universe, so retries explore
//! different search paths. It is a bounded best-effort search, not a proof
//! of infeasibility.
//!
//! # KPI
//!
//! `TimetableKpi` summarizes a timetable: teaching hours, slot and room
//! usage, split sections, and audit results.
//!
//! # References
//!
//! - Schaerf (1999), "A Survey of Automated Timetabling"
//! - Burke & Petrovic (2002), "Recent Research Directions in Automated Timetabling"

mod config;
mod kpi;
mod timetabler;

pub use config::SchedulerConfig;
pub use kpi::TimetableKpi;
pub use timetabler::{ScheduleOutcome, TimetableScheduler};
