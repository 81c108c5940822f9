//! Strict-then-relaxed timetabling with randomized restarts.
//!
//! # Algorithm
//!
//! 1. Validate the input; any issue aborts before search.
//! 2. For each attempt up to `max_attempts`:
//!    - regenerate the slot universe in a fresh random order,
//!    - re-split the sections,
//!    - build the strict model on attempt 1 and the relaxed model after,
//!    - search with the per-attempt node budget.
//! 3. Audit the first solution found and return it with its groups.
//!
//! Reshuffling the slots changes every domain's enumeration order, so each
//! attempt explores a different path through the search space (a Las Vegas
//! restart). A fixed seed makes the whole run reproducible.
//!
//! # Reference
//! Gomes, Selman & Kautz (1998), "Boosting Combinatorial Search Through Randomization"

use log::{info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::audit::audit_timetable;
use crate::cp::{DomainDiagnostics, ModelMode, TimetableCpBuilder};
use crate::csp::{BacktrackingSolver, NoOpMonitor, SearchMonitor, SolverConfig, SolverStatistics};
use crate::error::ScheduleError;
use crate::models::{Room, SectionGroup, SectionRequest, TimeSlot, Timetable};
use crate::split::split_all;
use crate::validation::validate_input;

use super::{SchedulerConfig, TimetableKpi};

/// A successful scheduling run.
#[derive(Debug, Clone)]
pub struct ScheduleOutcome {
    /// The audited timetable.
    pub timetable: Timetable,
    /// The groups the timetable places.
    pub groups: Vec<SectionGroup>,
    /// 1-based attempt that succeeded.
    pub attempt: usize,
    /// Model used by that attempt.
    pub mode: ModelMode,
    /// Slot universe of that attempt, in enumeration order.
    pub slots: Vec<TimeSlot>,
    /// Domain fallbacks of that attempt, parallel to `groups`.
    pub diagnostics: Vec<DomainDiagnostics>,
    /// Search counters of that attempt.
    pub statistics: SolverStatistics,
}

impl ScheduleOutcome {
    /// Whether the relaxed model produced the timetable.
    pub fn is_relaxed(&self) -> bool {
        self.mode == ModelMode::Relaxed
    }

    /// Groups whose domains needed a fallback.
    pub fn fallbacks(&self) -> impl Iterator<Item = &DomainDiagnostics> {
        self.diagnostics.iter().filter(|d| d.has_fallback())
    }

    /// Computes timetable statistics.
    pub fn kpi(&self, rooms: &[Room]) -> TimetableKpi {
        TimetableKpi::calculate(&self.timetable, &self.groups, rooms, self.slots.len())
    }
}

/// Course-section timetabler.
///
/// # Example
///
/// ```
/// use u_timetable::models::{Room, SectionRequest};
/// use u_timetable::scheduler::{SchedulerConfig, TimetableScheduler};
///
/// let sections = vec![SectionRequest::new("CS101", 25, "Omar").with_room_type("lab")];
/// let rooms = vec![Room::lab("A", 30), Room::lecture_hall("B", 20)];
///
/// let scheduler = TimetableScheduler::with_config(SchedulerConfig::default().with_seed(1));
/// let outcome = scheduler.schedule(&sections, &rooms).unwrap();
/// assert_eq!(outcome.attempt, 1);
/// assert_eq!(outcome.timetable.placements[0].room_id, "A");
/// ```
#[derive(Debug, Clone, Default)]
pub struct TimetableScheduler {
    config: SchedulerConfig,
}

impl TimetableScheduler {
    /// Creates a scheduler with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a scheduler with the given settings.
    pub fn with_config(config: SchedulerConfig) -> Self {
        Self { config }
    }

    /// Scheduler settings.
    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// Schedules `sections` into `rooms`.
    ///
    /// # Errors
    /// - [`ScheduleError::Configuration`] if the input is invalid
    ///   (no rooms, duplicate ids, unmatched room type, ...)
    /// - [`ScheduleError::SearchExhausted`] if every attempt fails
    pub fn schedule(
        &self,
        sections: &[SectionRequest],
        rooms: &[Room],
    ) -> Result<ScheduleOutcome, ScheduleError> {
        self.schedule_with_monitor(sections, rooms, &mut NoOpMonitor)
    }

    /// Like [`TimetableScheduler::schedule`], reporting every search to `monitor`.
    pub fn schedule_with_monitor<M: SearchMonitor + ?Sized>(
        &self,
        sections: &[SectionRequest],
        rooms: &[Room],
        monitor: &mut M,
    ) -> Result<ScheduleOutcome, ScheduleError> {
        validate_input(sections, rooms).map_err(ScheduleError::Configuration)?;

        let mut rng = match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let solver = BacktrackingSolver::with_config(SolverConfig {
            node_limit: self.config.node_limit,
        });
        let attempts = self.config.max_attempts.max(1);
        let mut group_count = 0;

        for attempt in 1..=attempts {
            let mode = if attempt == 1 {
                ModelMode::Strict
            } else {
                ModelMode::Relaxed
            };
            let slots = self.config.grid.generate_shuffled(&mut rng);
            let groups = split_all(sections, rooms)?;
            group_count = groups.len();

            info!(
                "attempt {}/{}: {:?} model, {} groups, {} slots, {} rooms",
                attempt,
                attempts,
                mode,
                groups.len(),
                slots.len(),
                rooms.len()
            );

            let outcome = TimetableCpBuilder::new(&groups, rooms)
                .with_mode(mode)
                .with_relaxed_capacity_ratio(self.config.relaxed_capacity_ratio)
                .solve(&slots, &solver, monitor)?;

            let Some(mut timetable) = outcome.timetable else {
                info!("attempt {} {} ({})", attempt, outcome.status, outcome.statistics);
                continue;
            };

            timetable.violations = audit_timetable(&timetable.placements, &groups, rooms);
            for v in &timetable.violations {
                warn!("{:?}: {}", v.violation_type, v.message);
            }
            info!(
                "attempt {} solved: {} placements, {} violations",
                attempt,
                timetable.placement_count(),
                timetable.violations.len()
            );

            return Ok(ScheduleOutcome {
                timetable,
                groups,
                attempt,
                mode,
                slots,
                diagnostics: outcome.diagnostics,
                statistics: outcome.statistics,
            });
        }

        Err(ScheduleError::SearchExhausted {
            attempts,
            slots: self.config.grid.slot_count(),
            rooms: rooms.len(),
            groups: group_count,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::csp::SolveStatus;
    use crate::models::{SlotGrid, ViolationType, Weekday};
    use crate::validation::ValidationErrorKind;

    fn seeded() -> TimetableScheduler {
        TimetableScheduler::with_config(SchedulerConfig::default().with_seed(42))
    }

    fn sample_rooms() -> Vec<Room> {
        vec![Room::lab("A", 30), Room::lecture_hall("B", 20)]
    }

    #[test]
    fn test_single_lab_section() {
        let sections = vec![SectionRequest::new("CS101", 25, "Omar").with_room_type("lab")];
        let out = seeded().schedule(&sections, &sample_rooms()).unwrap();

        assert_eq!(out.attempt, 1);
        assert!(!out.is_relaxed());
        assert_eq!(out.groups.len(), 1);
        assert!(!out.groups[0].is_split());
        assert_eq!(out.timetable.placements[0].room_id, "A");
        assert!(out.timetable.is_valid());
        assert_eq!(out.slots.len(), 20);
    }

    #[test]
    fn test_oversized_section_split_same_day() {
        let sections = vec![SectionRequest::new("BIG", 70, "Ali")];
        let out = seeded().schedule(&sections, &sample_rooms()).unwrap();

        let sizes: Vec<u32> = out.groups.iter().map(|g| g.students).collect();
        assert_eq!(sizes, vec![24, 24, 22]);
        assert_eq!(out.attempt, 1);

        let day = out.timetable.placements[0].slot.day;
        assert!(out.timetable.placements.iter().all(|p| p.slot.day == day));
        assert!(out.timetable.placements.iter().all(|p| p.room_id == "A"));
        assert!(out.timetable.is_valid());
    }

    #[test]
    fn test_same_instructor_never_same_slot() {
        let sections = vec![
            SectionRequest::new("CS1", 15, "Omar"),
            SectionRequest::new("CS2", 15, "omar"),
        ];
        for seed in 0..10 {
            let scheduler =
                TimetableScheduler::with_config(SchedulerConfig::default().with_seed(seed));
            let out = scheduler.schedule(&sections, &sample_rooms()).unwrap();
            let p = &out.timetable.placements;
            assert_ne!(p[0].slot, p[1].slot, "seed {seed}");
        }
    }

    #[test]
    fn test_no_rooms_is_configuration_error() {
        let sections = vec![SectionRequest::new("CS1", 15, "Omar")];
        let err = seeded().schedule(&sections, &[]).unwrap_err();

        assert!(err.is_configuration());
        match err {
            ScheduleError::Configuration(errors) => {
                assert_eq!(errors[0].kind, ValidationErrorKind::NoRooms);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_unmatched_room_type_is_configuration_error() {
        let sections = vec![SectionRequest::new("CS1", 15, "Omar").with_room_type("studio")];
        let err = seeded().schedule(&sections, &sample_rooms()).unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_group_id_clash_is_configuration_error() {
        let sections = vec![
            SectionRequest::new("X", 50, "P"),
            SectionRequest::new("X_G1", 10, "Q"),
        ];
        let err = seeded()
            .schedule(&sections, &[Room::lab("A", 30)])
            .unwrap_err();
        assert!(err.is_configuration());
        assert!(matches!(
            err,
            ScheduleError::Configuration(ref errors)
                if errors[0].kind == ValidationErrorKind::DuplicateId
        ));
    }

    #[test]
    fn test_blank_instructor_is_configuration_error() {
        let sections = vec![
            SectionRequest::new("CS1", 10, ""),
            SectionRequest::new("CS2", 10, ""),
        ];
        let err = seeded().schedule(&sections, &sample_rooms()).unwrap_err();
        assert!(matches!(
            err,
            ScheduleError::Configuration(ref errors)
                if errors.iter().all(|e| e.kind == ValidationErrorKind::MissingInstructor)
        ));
    }

    #[test]
    fn test_seed_reproducible() {
        let sections = vec![
            SectionRequest::new("CS1", 15, "Omar").with_day_off(Weekday::Mon),
            SectionRequest::new("CS2", 45, "Ali"),
            SectionRequest::new("CS3", 20, "Omar").with_assistant("Sara"),
        ];
        let a = seeded().schedule(&sections, &sample_rooms()).unwrap();
        let b = seeded().schedule(&sections, &sample_rooms()).unwrap();
        assert_eq!(a.timetable.placements, b.timetable.placements);
        assert_eq!(a.slots, b.slots);
    }

    #[test]
    fn test_relaxed_fallback_reports_violations() {
        // Five sections of one instructor over four slots: strict is infeasible.
        let grid = SlotGrid::default().with_days(vec![Weekday::Mon]);
        let config = SchedulerConfig::default().with_seed(3).with_grid(grid);
        let sections: Vec<SectionRequest> = (1..=5)
            .map(|i| SectionRequest::new(format!("S{i}"), 10, "Omar"))
            .collect();

        let out = TimetableScheduler::with_config(config)
            .schedule(&sections, &sample_rooms())
            .unwrap();

        assert_eq!(out.attempt, 2);
        assert!(out.is_relaxed());
        assert_eq!(out.timetable.placement_count(), 5);
        assert!(!out.timetable.is_valid());
        assert!(!out
            .timetable
            .violations_of(&ViolationType::StaffDoubleBooked)
            .is_empty());
        assert!(out
            .timetable
            .violations_of(&ViolationType::RoomDoubleBooked)
            .is_empty());
    }

    #[test]
    fn test_search_exhausted() {
        let grid = SlotGrid::new(vec![Weekday::Mon], 9 * 60, 10 * 60 + 30, 90);
        let config = SchedulerConfig::default().with_seed(1).with_grid(grid);
        let sections = vec![
            SectionRequest::new("S1", 10, "P"),
            SectionRequest::new("S2", 10, "Q"),
            SectionRequest::new("S3", 10, "R"),
        ];
        let rooms = vec![Room::lab("A", 30)];

        let err = TimetableScheduler::with_config(config)
            .schedule(&sections, &rooms)
            .unwrap_err();
        assert_eq!(
            err,
            ScheduleError::SearchExhausted {
                attempts: 3,
                slots: 1,
                rooms: 1,
                groups: 3,
            }
        );
    }

    #[test]
    fn test_monitor_sees_every_attempt() {
        #[derive(Default)]
        struct Attempts {
            entered: usize,
            statuses: Vec<SolveStatus>,
        }
        impl SearchMonitor for Attempts {
            fn name(&self) -> &str {
                "Attempts"
            }
            fn on_enter_search(&mut self, _variables: usize, _constraints: usize) {
                self.entered += 1;
            }
            fn on_exit_search(&mut self, status: SolveStatus, _statistics: &SolverStatistics) {
                self.statuses.push(status);
            }
        }

        let grid = SlotGrid::default().with_days(vec![Weekday::Mon]);
        let config = SchedulerConfig::default().with_seed(5).with_grid(grid);
        let sections: Vec<SectionRequest> = (1..=5)
            .map(|i| SectionRequest::new(format!("S{i}"), 10, "Omar"))
            .collect();

        let mut monitor = Attempts::default();
        TimetableScheduler::with_config(config)
            .schedule_with_monitor(&sections, &sample_rooms(), &mut monitor)
            .unwrap();

        assert_eq!(monitor.entered, 2);
        assert_eq!(
            monitor.statuses,
            vec![SolveStatus::Infeasible, SolveStatus::Solved]
        );
    }

    #[test]
    fn test_node_limit_aborts_attempts() {
        let grid = SlotGrid::default().with_days(vec![Weekday::Mon]);
        let config = SchedulerConfig::default()
            .with_seed(9)
            .with_grid(grid)
            .with_node_limit(1);
        let sections: Vec<SectionRequest> = (1..=3)
            .map(|i| SectionRequest::new(format!("S{i}"), 10, "Omar"))
            .collect();

        let err = TimetableScheduler::with_config(config)
            .schedule(&sections, &sample_rooms())
            .unwrap_err();
        assert!(matches!(
            err,
            ScheduleError::SearchExhausted { attempts: 3, groups: 3, .. }
        ));
    }

    #[test]
    fn test_outcome_kpi() {
        let sections = vec![SectionRequest::new("BIG", 50, "Ali")];
        let rooms = sample_rooms();
        let out = seeded().schedule(&sections, &rooms).unwrap();
        let kpi = out.kpi(&rooms);

        assert_eq!(kpi.groups_scheduled, 2);
        assert_eq!(kpi.split_sections, 1);
        assert!((kpi.total_hours - 3.0).abs() < 1e-10);
        assert_eq!(out.fallbacks().count(), 0);
    }
}
