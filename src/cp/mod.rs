//! CSP formulation of course-section timetabling.
//!
//! Bridges the timetabling models to the generic [`crate::csp`] solver.
//! Each group gets a time variable and a room variable; preferences shrink
//! their domains ([`domain`]) and hard rules become constraints
//! ([`constraint`]). A solved assignment is decoded back into a
//! [`Timetable`].
//!
//! # Reference
//! - Schaerf (1999), "A Survey of Automated Timetabling"
//! - Russell & Norvig (2020), "Artificial Intelligence: A Modern Approach", Ch. 6

pub mod constraint;
pub mod domain;

pub use constraint::{
    compile_constraints, ConstraintKind, GroupVars, ModelMode, ScheduleConstraint, ScheduleValue,
};
pub use domain::{closest_room, relaxed_domain, strict_domain, DomainDiagnostics, GroupDomain};

use crate::csp::{
    Assignment, BacktrackingSolver, CspError, CspModel, SearchMonitor, SolveStatus,
    SolverStatistics,
};
use crate::models::{Placement, Room, SectionGroup, TimeSlot, Timetable};

/// The CSP instantiated for timetabling.
pub type TimetableCsp = CspModel<ScheduleValue, ScheduleConstraint>;

/// A built timetabling model.
#[derive(Debug, Clone)]
pub struct TimetableModel {
    /// The underlying CSP.
    pub csp: TimetableCsp,
    /// Variables of each group, parallel to the builder's groups.
    pub vars: Vec<GroupVars>,
    /// Domain fallbacks, parallel to the builder's groups.
    pub diagnostics: Vec<DomainDiagnostics>,
}

/// Result of building and solving one model.
#[derive(Debug, Clone)]
pub struct CpOutcome {
    /// How the search ended.
    pub status: SolveStatus,
    /// The decoded timetable, present iff solved.
    pub timetable: Option<Timetable>,
    /// Search counters.
    pub statistics: SolverStatistics,
    /// Domain fallbacks taken while building the model.
    pub diagnostics: Vec<DomainDiagnostics>,
}

/// Builds a timetabling CSP from groups and rooms.
///
/// # Example
/// ```
/// use u_timetable::cp::TimetableCpBuilder;
/// use u_timetable::csp::{BacktrackingSolver, NoOpMonitor};
/// use u_timetable::models::{Room, SectionGroup, SectionRequest, SlotGrid};
///
/// let rooms = vec![Room::lab("A", 30)];
/// let groups = vec![SectionGroup::whole(&SectionRequest::new("CS1", 25, "Omar"))];
/// let slots = SlotGrid::default().day_slots(SlotGrid::default().days[0]);
///
/// let outcome = TimetableCpBuilder::new(&groups, &rooms)
///     .solve(&slots, &BacktrackingSolver::new(), &mut NoOpMonitor)
///     .unwrap();
/// assert_eq!(outcome.timetable.unwrap().placement_count(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct TimetableCpBuilder<'a> {
    groups: &'a [SectionGroup],
    rooms: &'a [Room],
    mode: ModelMode,
    relaxed_capacity_ratio: f64,
}

impl<'a> TimetableCpBuilder<'a> {
    /// Creates a strict-mode builder.
    pub fn new(groups: &'a [SectionGroup], rooms: &'a [Room]) -> Self {
        Self {
            groups,
            rooms,
            mode: ModelMode::Strict,
            relaxed_capacity_ratio: 0.5,
        }
    }

    /// Sets the model mode.
    pub fn with_mode(mut self, mode: ModelMode) -> Self {
        self.mode = mode;
        self
    }

    /// Sets the fraction of a group a room must seat in relaxed mode.
    pub fn with_relaxed_capacity_ratio(mut self, ratio: f64) -> Self {
        self.relaxed_capacity_ratio = ratio;
        self
    }

    /// The model mode.
    pub fn mode(&self) -> ModelMode {
        self.mode
    }

    /// Builds the model over the slot universe `slots`.
    ///
    /// Variables are declared group by group, time before room, so the
    /// solver branches in that order.
    ///
    /// # Errors
    /// [`CspError::EmptyDomain`] when `slots` or the room list is empty.
    pub fn build(&self, slots: &[TimeSlot]) -> Result<TimetableModel, CspError> {
        let mut csp = TimetableCsp::new();
        let mut vars = Vec::with_capacity(self.groups.len());
        let mut diagnostics = Vec::with_capacity(self.groups.len());

        for group in self.groups {
            let domain = match self.mode {
                ModelMode::Strict => strict_domain(group, slots, self.rooms),
                ModelMode::Relaxed => {
                    relaxed_domain(group, slots, self.rooms, self.relaxed_capacity_ratio)
                }
            };

            let time = csp.add_variable(
                group.time_var_name(),
                domain.slots.into_iter().map(ScheduleValue::Slot).collect(),
            )?;
            let room = csp.add_variable(
                group.room_var_name(),
                domain.rooms.into_iter().map(ScheduleValue::Room).collect(),
            )?;
            vars.push(GroupVars { time, room });
            diagnostics.push(domain.diagnostics);
        }

        for c in compile_constraints(self.groups, &vars, self.mode) {
            csp.add_constraint(c)?;
        }

        Ok(TimetableModel {
            csp,
            vars,
            diagnostics,
        })
    }

    /// Builds and solves the model, decoding the solution.
    ///
    /// # Errors
    /// Propagates [`TimetableCpBuilder::build`] errors.
    pub fn solve<M: SearchMonitor + ?Sized>(
        &self,
        slots: &[TimeSlot],
        solver: &BacktrackingSolver,
        monitor: &mut M,
    ) -> Result<CpOutcome, CspError> {
        let model = self.build(slots)?;
        let result = solver.solve_with_monitor(&model.csp, monitor);
        let timetable = result
            .assignment
            .as_ref()
            .map(|asg| self.decode(&model, asg));

        Ok(CpOutcome {
            status: result.status,
            timetable,
            statistics: result.statistics,
            diagnostics: model.diagnostics,
        })
    }

    /// Decodes an assignment into a timetable, one placement per group.
    pub fn decode(&self, model: &TimetableModel, assignment: &Assignment<ScheduleValue>) -> Timetable {
        let mut timetable = Timetable::new();

        for (group, vars) in self.groups.iter().zip(&model.vars) {
            let slot = assignment.get(vars.time).and_then(ScheduleValue::as_slot);
            let room = assignment.get(vars.room).and_then(ScheduleValue::as_room);
            if let (Some(slot), Some(room)) = (slot, room) {
                timetable.add_placement(Placement::new(
                    &group.id,
                    group.section_id(),
                    *slot,
                    &room.id,
                ));
            }
        }

        timetable
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::csp::NoOpMonitor;
    use crate::models::{SectionRequest, SlotGrid, Weekday};
    use crate::split::split_all;

    fn universe() -> Vec<TimeSlot> {
        let grid = SlotGrid::default();
        grid.days.iter().flat_map(|d| grid.day_slots(*d)).collect()
    }

    fn solve(groups: &[SectionGroup], rooms: &[Room], mode: ModelMode) -> CpOutcome {
        TimetableCpBuilder::new(groups, rooms)
            .with_mode(mode)
            .solve(&universe(), &BacktrackingSolver::new(), &mut NoOpMonitor)
            .unwrap()
    }

    #[test]
    fn test_build_model() {
        let rooms = vec![Room::lab("A", 30), Room::lecture_hall("B", 20)];
        let sections = vec![
            SectionRequest::new("CS1", 25, "Omar").with_room_type("lab"),
            SectionRequest::new("CS2", 15, "Omar"),
        ];
        let groups = split_all(&sections, &rooms).unwrap();
        let model = TimetableCpBuilder::new(&groups, &rooms)
            .build(&universe())
            .unwrap();

        assert_eq!(model.csp.variable_count(), 4);
        assert_eq!(model.vars.len(), 2);
        // 1 distinct-time + 1 room clash + 1 room type
        assert_eq!(model.csp.constraint_count(), 3);
        assert_eq!(model.csp.var_id("CS1_time"), Some(model.vars[0].time));
        assert_eq!(model.csp.var_id("CS2_room"), Some(model.vars[1].room));
        assert_eq!(model.csp.domain_sizes(), vec![20, 1, 20, 2]);
    }

    #[test]
    fn test_build_without_rooms_fails() {
        let groups = vec![SectionGroup::whole(&SectionRequest::new("CS1", 10, "Omar"))];
        let err = TimetableCpBuilder::new(&groups, &[])
            .build(&universe())
            .unwrap_err();
        assert_eq!(err, CspError::EmptyDomain("CS1_room".into()));
    }

    #[test]
    fn test_solve_lab_section() {
        let rooms = vec![Room::lab("A", 30), Room::lecture_hall("B", 20)];
        let groups = vec![SectionGroup::whole(
            &SectionRequest::new("CS1", 25, "Omar").with_room_type("lab"),
        )];
        let outcome = solve(&groups, &rooms, ModelMode::Strict);

        assert_eq!(outcome.status, SolveStatus::Solved);
        let tt = outcome.timetable.unwrap();
        assert_eq!(tt.placement_count(), 1);
        assert_eq!(tt.placements[0].room_id, "A");
        assert_eq!(tt.placements[0].group_id, "CS1");
    }

    #[test]
    fn test_solve_split_same_day_consecutive() {
        let rooms = vec![Room::lab("A", 30)];
        let sections = vec![SectionRequest::new("BIG", 50, "Ali").with_day_off(Weekday::Sun)];
        let groups = split_all(&sections, &rooms).unwrap();
        let outcome = solve(&groups, &rooms, ModelMode::Strict);

        let tt = outcome.timetable.unwrap();
        let g1 = tt.placement_for_group("BIG_G1").unwrap();
        let g2 = tt.placement_for_group("BIG_G2").unwrap();
        assert!(g1.slot.same_day(&g2.slot));
        assert!(g1.slot.is_consecutive_with(&g2.slot));
        assert_ne!(g1.slot.day, Weekday::Sun);
    }

    #[test]
    fn test_solve_shared_staff_distinct_slots() {
        let rooms = vec![Room::lab("A", 30), Room::lab("B", 30)];
        let sections = vec![
            SectionRequest::new("S1", 10, "Omar"),
            SectionRequest::new("S2", 10, "Ali").with_assistant("OMAR"),
            SectionRequest::new("S3", 10, "omar"),
        ];
        let groups = split_all(&sections, &rooms).unwrap();
        let tt = solve(&groups, &rooms, ModelMode::Strict).timetable.unwrap();

        let slots: Vec<TimeSlot> = tt.placements.iter().map(|p| p.slot).collect();
        assert_ne!(slots[0], slots[1]);
        assert_ne!(slots[0], slots[2]);
        assert_ne!(slots[1], slots[2]);
    }

    #[test]
    fn test_solve_infeasible_strict_but_relaxed_succeeds() {
        // No lab exists; only the relaxed model ignores room types.
        let rooms = vec![Room::lecture_hall("H", 30)];
        let groups = vec![SectionGroup::whole(
            &SectionRequest::new("CS1", 10, "Omar").with_room_type("lab"),
        )];
        let strict = solve(&groups, &rooms, ModelMode::Strict);
        assert_eq!(strict.status, SolveStatus::Infeasible);
        assert!(strict.timetable.is_none());

        let relaxed = solve(&groups, &rooms, ModelMode::Relaxed);
        assert_eq!(relaxed.status, SolveStatus::Solved);
        assert_eq!(relaxed.timetable.unwrap().placements[0].room_id, "H");
    }

    #[test]
    fn test_solve_reports_diagnostics() {
        let rooms = vec![Room::lab("A", 30)];
        let groups = vec![SectionGroup::whole(&SectionRequest::new("X", 40, "P"))];
        let outcome = TimetableCpBuilder::new(&groups, &rooms)
            .with_mode(ModelMode::Relaxed)
            .with_relaxed_capacity_ratio(0.9)
            .solve(&universe(), &BacktrackingSolver::new(), &mut NoOpMonitor)
            .unwrap();

        assert_eq!(outcome.diagnostics.len(), 1);
        assert!(outcome.diagnostics[0].room_fallback);
        assert!(outcome.timetable.is_some());
    }

    #[test]
    fn test_decode_follows_group_order() {
        let rooms = vec![Room::lab("A", 30), Room::lab("B", 30)];
        let sections = vec![
            SectionRequest::new("S2", 10, "Q"),
            SectionRequest::new("S1", 10, "P"),
        ];
        let groups = split_all(&sections, &rooms).unwrap();
        let tt = solve(&groups, &rooms, ModelMode::Strict).timetable.unwrap();
        let ids: Vec<&str> = tt.placements.iter().map(|p| p.group_id.as_str()).collect();
        assert_eq!(ids, vec!["S2", "S1"]);
    }
}
