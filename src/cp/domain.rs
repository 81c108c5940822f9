//! Static domain construction.
//!
//! Preferences are enforced by shrinking domains before search rather than
//! by posting constraints:
//!
//! - **Rooms**: rooms seating the whole group. If none does, the single
//!   room with the closest capacity is admitted and the group is flagged
//!   as an infeasible candidate.
//! - **Slots**: the slot universe minus the instructor's day off and
//!   minus slots outside the time preference. If nothing survives, the
//!   unfiltered universe is used instead.
//!
//! The relaxed variant keeps every slot and admits rooms seating at least
//! a fraction of the group.

use log::warn;
use serde::{Deserialize, Serialize};

use crate::models::{Room, SectionGroup, TimeSlot};

/// Fallbacks taken while building one group's domains.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainDiagnostics {
    /// Group the diagnostics belong to.
    pub group_id: String,
    /// Day-off/preference filtering emptied the slot domain; all slots were used.
    pub time_fallback: bool,
    /// No room satisfied the capacity filter; a fallback room set was used.
    pub room_fallback: bool,
    /// The fallback room is smaller than the group.
    pub infeasible_room: bool,
}

impl DomainDiagnostics {
    /// Whether any fallback was taken.
    pub fn has_fallback(&self) -> bool {
        self.time_fallback || self.room_fallback
    }
}

/// Candidate slots and rooms for one group.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupDomain {
    /// Candidate slots, in universe order.
    pub slots: Vec<TimeSlot>,
    /// Candidate rooms, in input order.
    pub rooms: Vec<Room>,
    /// Fallbacks taken.
    pub diagnostics: DomainDiagnostics,
}

/// Builds the strict-model domains of a group.
pub fn strict_domain(group: &SectionGroup, universe: &[TimeSlot], rooms: &[Room]) -> GroupDomain {
    let mut diagnostics = DomainDiagnostics {
        group_id: group.id.clone(),
        ..Default::default()
    };

    let mut candidate_rooms: Vec<Room> = rooms
        .iter()
        .filter(|r| r.fits(group.students))
        .cloned()
        .collect();
    if candidate_rooms.is_empty() {
        if let Some(closest) = closest_room(rooms, group.students) {
            warn!(
                "no room seats {} students of {}; using closest match {} (capacity {})",
                group.students, group.id, closest.id, closest.capacity
            );
            diagnostics.room_fallback = true;
            diagnostics.infeasible_room = !closest.fits(group.students);
            candidate_rooms.push(closest.clone());
        }
    }

    let mut slots: Vec<TimeSlot> = universe
        .iter()
        .filter(|s| group.section.accepts_slot(s))
        .copied()
        .collect();
    if slots.is_empty() && !universe.is_empty() {
        warn!(
            "no slot satisfies the day off / {} preference of {}; using all slots",
            group.section.time_preference, group.id
        );
        diagnostics.time_fallback = true;
        slots = universe.to_vec();
    }

    GroupDomain {
        slots,
        rooms: candidate_rooms,
        diagnostics,
    }
}

/// Builds the relaxed-model domains of a group.
///
/// Rooms need only seat `capacity_ratio × students`; all rooms are used if
/// even that leaves none. Slots are not filtered.
pub fn relaxed_domain(
    group: &SectionGroup,
    universe: &[TimeSlot],
    rooms: &[Room],
    capacity_ratio: f64,
) -> GroupDomain {
    let mut diagnostics = DomainDiagnostics {
        group_id: group.id.clone(),
        ..Default::default()
    };

    let needed = capacity_ratio * f64::from(group.students);
    let mut candidate_rooms: Vec<Room> = rooms
        .iter()
        .filter(|r| f64::from(r.capacity) >= needed)
        .cloned()
        .collect();
    if candidate_rooms.is_empty() {
        diagnostics.room_fallback = true;
        diagnostics.infeasible_room = true;
        candidate_rooms = rooms.to_vec();
    }

    GroupDomain {
        slots: universe.to_vec(),
        rooms: candidate_rooms,
        diagnostics,
    }
}

/// The room whose capacity is numerically closest to `students`.
///
/// Ties go to the earlier room.
pub fn closest_room(rooms: &[Room], students: u32) -> Option<&Room> {
    rooms.iter().min_by_key(|r| r.capacity.abs_diff(students))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{SectionRequest, SlotGrid, TimePreference, Weekday};

    fn universe() -> Vec<TimeSlot> {
        let grid = SlotGrid::default();
        grid.days.iter().flat_map(|d| grid.day_slots(*d)).collect()
    }

    fn rooms() -> Vec<Room> {
        vec![Room::lab("A", 30), Room::lecture_hall("B", 20)]
    }

    #[test]
    fn test_room_domain_by_capacity() {
        let g = SectionGroup::whole(&SectionRequest::new("CS", 25, "Omar"));
        let d = strict_domain(&g, &universe(), &rooms());
        let ids: Vec<&str> = d.rooms.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["A"]);
        assert!(!d.diagnostics.has_fallback());
    }

    #[test]
    fn test_room_domain_closest_fallback() {
        let g = SectionGroup::whole(&SectionRequest::new("BIG", 40, "Omar"));
        let d = strict_domain(&g, &universe(), &rooms());
        assert_eq!(d.rooms.len(), 1);
        assert_eq!(d.rooms[0].id, "A");
        assert!(d.diagnostics.room_fallback);
        assert!(d.diagnostics.infeasible_room);
    }

    #[test]
    fn test_closest_room_tie_goes_first() {
        let rooms = vec![Room::lab("X", 10), Room::lab("Y", 30)];
        assert_eq!(closest_room(&rooms, 20).unwrap().id, "X");
        assert!(closest_room(&[], 20).is_none());
    }

    #[test]
    fn test_time_domain_day_off_and_preference() {
        let s = SectionRequest::new("CS", 10, "Omar")
            .with_day_off(Weekday::Mon)
            .with_time_preference(TimePreference::Morning);
        let d = strict_domain(&SectionGroup::whole(&s), &universe(), &rooms());

        // 4 days × 2 morning slots (9:00, 10:30).
        assert_eq!(d.slots.len(), 8);
        assert!(d.slots.iter().all(|s| s.day != Weekday::Mon && s.start < 720));
        assert!(!d.diagnostics.time_fallback);
    }

    #[test]
    fn test_time_domain_preference_counts() {
        let count = |p: TimePreference| {
            let s = SectionRequest::new("CS", 10, "Omar").with_time_preference(p);
            strict_domain(&SectionGroup::whole(&s), &universe(), &rooms())
                .slots
                .len()
        };
        assert_eq!(count(TimePreference::Any), 20);
        assert_eq!(count(TimePreference::Morning), 10);
        assert_eq!(count(TimePreference::Afternoon), 10);
        assert_eq!(count(TimePreference::Before11), 10);
        assert_eq!(count(TimePreference::After11), 10);
    }

    #[test]
    fn test_time_domain_fallback_when_emptied() {
        let s = SectionRequest::new("CS", 10, "Omar").with_day_off(Weekday::Sun);
        let only_sunday: Vec<TimeSlot> = SlotGrid::default().day_slots(Weekday::Sun);
        let d = strict_domain(&SectionGroup::whole(&s), &only_sunday, &rooms());
        assert_eq!(d.slots, only_sunday);
        assert!(d.diagnostics.time_fallback);
    }

    #[test]
    fn test_time_domain_keeps_universe_order() {
        let mut slots = universe();
        slots.reverse();
        let s = SectionRequest::new("CS", 10, "Omar").with_time_preference(TimePreference::Afternoon);
        let d = strict_domain(&SectionGroup::whole(&s), &slots, &rooms());
        let expected: Vec<TimeSlot> = slots.iter().copied().filter(|s| s.start >= 720).collect();
        assert_eq!(d.slots, expected);
    }

    #[test]
    fn test_relaxed_domain() {
        let s = SectionRequest::new("CS", 36, "Omar")
            .with_day_off(Weekday::Mon)
            .with_time_preference(TimePreference::Morning);
        let g = SectionGroup::whole(&s);
        let d = relaxed_domain(&g, &universe(), &rooms(), 0.5);

        // Half of 36 is 18: both rooms qualify; no slot filtering.
        assert_eq!(d.rooms.len(), 2);
        assert_eq!(d.slots.len(), 20);
        assert!(!d.diagnostics.has_fallback());

        let huge = SectionGroup::whole(&SectionRequest::new("HUGE", 200, "X"));
        let d = relaxed_domain(&huge, &universe(), &rooms(), 0.5);
        assert_eq!(d.rooms.len(), 2);
        assert!(d.diagnostics.room_fallback);
    }
}
