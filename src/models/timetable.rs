//! Timetable (solution) model.
//!
//! A timetable places every section group at one time slot in one room.
//! It may carry violations found by the post-hoc audit, e.g. when it was
//! produced by the relaxed fallback model.
//!
//! # Reference
//! Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems", Ch. 3

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};

use super::{TimeSlot, Weekday};

/// A complete timetable (solution to a timetabling problem).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Timetable {
    /// Group placements (group → slot × room).
    pub placements: Vec<Placement>,
    /// Violations detected by the audit.
    pub violations: Vec<Violation>,
}

/// A group-slot-room placement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    /// Placed group ID.
    pub group_id: String,
    /// Originating section ID (denormalized for query convenience).
    pub section_id: String,
    /// Assigned slot.
    pub slot: TimeSlot,
    /// Assigned room ID.
    pub room_id: String,
}

/// A constraint violation found in a timetable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Violation {
    /// Type of violation.
    pub violation_type: ViolationType,
    /// Related entity ID (group, section, room, or person).
    pub entity_id: String,
    /// Human-readable description.
    pub message: String,
    /// How serious the violation is.
    pub severity: ViolationSeverity,
}

/// Severity of a violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ViolationSeverity {
    /// Soft requirement missed; the timetable is still usable.
    Warning,
    /// Hard requirement broken.
    Error,
}

/// Classification of timetable violations.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ViolationType {
    /// Group placed on the instructor's day off.
    DayOff,
    /// Slot start outside the instructor's time preference.
    TimePreference,
    /// Groups of one split section on different days.
    SplitDifferentDays,
    /// Two-way split groups not in consecutive slots.
    SplitNotConsecutive,
    /// Room type differs from the requirement.
    RoomTypeMismatch,
    /// Room smaller than the group.
    CapacityExceeded,
    /// Two groups share a slot and a room.
    RoomDoubleBooked,
    /// An instructor or assistant teaches two groups at once.
    StaffDoubleBooked,
}

impl Placement {
    /// Creates a new placement.
    pub fn new(
        group_id: impl Into<String>,
        section_id: impl Into<String>,
        slot: TimeSlot,
        room_id: impl Into<String>,
    ) -> Self {
        Self {
            group_id: group_id.into(),
            section_id: section_id.into(),
            slot,
            room_id: room_id.into(),
        }
    }
}

impl Violation {
    /// Creates a hard violation.
    pub fn error(
        violation_type: ViolationType,
        entity_id: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            violation_type,
            entity_id: entity_id.into(),
            message: message.into(),
            severity: ViolationSeverity::Error,
        }
    }

    /// Creates a soft violation.
    pub fn warning(
        violation_type: ViolationType,
        entity_id: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            violation_type,
            entity_id: entity_id.into(),
            message: message.into(),
            severity: ViolationSeverity::Warning,
        }
    }
}

impl Timetable {
    /// Creates an empty timetable.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a placement.
    pub fn add_placement(&mut self, placement: Placement) {
        self.placements.push(placement);
    }

    /// Adds a violation.
    pub fn add_violation(&mut self, violation: Violation) {
        self.violations.push(violation);
    }

    /// Whether no hard violation was recorded.
    pub fn is_valid(&self) -> bool {
        self.violations
            .iter()
            .all(|v| v.severity < ViolationSeverity::Error)
    }

    /// Whether the timetable carries any violation at all.
    pub fn has_violations(&self) -> bool {
        !self.violations.is_empty()
    }

    /// Violations of a given type.
    pub fn violations_of(&self, violation_type: &ViolationType) -> Vec<&Violation> {
        self.violations
            .iter()
            .filter(|v| &v.violation_type == violation_type)
            .collect()
    }

    /// Finds the placement of a group.
    pub fn placement_for_group(&self, group_id: &str) -> Option<&Placement> {
        self.placements.iter().find(|p| p.group_id == group_id)
    }

    /// All placements belonging to a section.
    pub fn placements_for_section(&self, section_id: &str) -> Vec<&Placement> {
        self.placements
            .iter()
            .filter(|p| p.section_id == section_id)
            .collect()
    }

    /// All placements in a room.
    pub fn placements_for_room(&self, room_id: &str) -> Vec<&Placement> {
        self.placements
            .iter()
            .filter(|p| p.room_id == room_id)
            .collect()
    }

    /// Placements grouped by day, each day in chronological order.
    pub fn by_day(&self) -> BTreeMap<Weekday, Vec<&Placement>> {
        let mut days: BTreeMap<Weekday, Vec<&Placement>> = BTreeMap::new();
        for p in &self.placements {
            days.entry(p.slot.day).or_default().push(p);
        }
        for entries in days.values_mut() {
            entries.sort_by(|a, b| a.slot.cmp(&b.slot).then_with(|| a.room_id.cmp(&b.room_id)));
        }
        days
    }

    /// Solver-variable view: `{GROUP}_time` → slot, `{GROUP}_room` → room.
    pub fn variable_map(&self) -> BTreeMap<String, String> {
        let mut map = BTreeMap::new();
        for p in &self.placements {
            map.insert(format!("{}_time", p.group_id), p.slot.to_string());
            map.insert(format!("{}_room", p.group_id), p.room_id.clone());
        }
        map
    }

    /// Distinct slots used by at least one placement.
    pub fn slots_used(&self) -> usize {
        self.placements
            .iter()
            .map(|p| p.slot)
            .collect::<BTreeSet<_>>()
            .len()
    }

    /// Fraction of `slot_count` slots in which a room is occupied.
    ///
    /// Returns `None` if `slot_count` is zero.
    pub fn room_utilization(&self, room_id: &str, slot_count: usize) -> Option<f64> {
        if slot_count == 0 {
            return None;
        }
        Some(self.placements_for_room(room_id).len() as f64 / slot_count as f64)
    }

    /// Number of placements per room.
    pub fn room_loads(&self) -> HashMap<String, usize> {
        let mut loads: HashMap<String, usize> = HashMap::new();
        for p in &self.placements {
            *loads.entry(p.room_id.clone()).or_insert(0) += 1;
        }
        loads
    }

    /// Number of placements.
    pub fn placement_count(&self) -> usize {
        self.placements.len()
    }
}
