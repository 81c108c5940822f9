//! Timetable statistics (KPIs).
//!
//! Summarizes a completed timetable for reporting.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Instructional hours | Sum of placed slot durations |
//! | Groups scheduled | Placements in the timetable |
//! | Distinct slots | Slots used by at least one group |
//! | Room utilization | Occupied slots / available slots, per room |
//! | Split sections | Sections taught as more than one group |
//! | Violations | Audit errors and warnings |

use std::collections::{BTreeSet, HashMap};

use crate::models::{Room, SectionGroup, Timetable, ViolationSeverity};

/// Timetable performance indicators.
#[derive(Debug, Clone)]
pub struct TimetableKpi {
    /// Total teaching time across all placements, in hours.
    pub total_hours: f64,
    /// Number of placed groups.
    pub groups_scheduled: usize,
    /// Number of distinct slots in use.
    pub distinct_slots: usize,
    /// Average room utilization (0.0..1.0).
    pub avg_utilization: f64,
    /// Per-room utilization (0.0..1.0); rooms without placements map to 0.
    pub utilization_by_room: HashMap<String, f64>,
    /// Sections split into several groups.
    pub split_sections: usize,
    /// Audit violations with error severity.
    pub errors: usize,
    /// Audit violations with warning severity.
    pub warnings: usize,
}

impl TimetableKpi {
    /// Computes KPIs for a timetable.
    ///
    /// # Arguments
    /// * `timetable` - The audited timetable.
    /// * `groups` - The groups it places (for split counting).
    /// * `rooms` - The available rooms.
    /// * `slot_count` - Size of the slot universe.
    pub fn calculate(
        timetable: &Timetable,
        groups: &[SectionGroup],
        rooms: &[Room],
        slot_count: usize,
    ) -> Self {
        let minutes: u32 = timetable
            .placements
            .iter()
            .map(|p| u32::from(p.slot.duration_minutes()))
            .sum();

        let utilization_by_room: HashMap<String, f64> = rooms
            .iter()
            .map(|r| {
                let u = timetable.room_utilization(&r.id, slot_count).unwrap_or(0.0);
                (r.id.clone(), u)
            })
            .collect();
        let avg_utilization = if utilization_by_room.is_empty() {
            0.0
        } else {
            utilization_by_room.values().sum::<f64>() / utilization_by_room.len() as f64
        };

        let split_sections = groups
            .iter()
            .filter(|g| g.is_split())
            .map(|g| g.section_id())
            .collect::<BTreeSet<_>>()
            .len();

        let errors = timetable
            .violations
            .iter()
            .filter(|v| v.severity == ViolationSeverity::Error)
            .count();

        Self {
            total_hours: f64::from(minutes) / 60.0,
            groups_scheduled: timetable.placement_count(),
            distinct_slots: timetable.slots_used(),
            avg_utilization,
            utilization_by_room,
            split_sections,
            errors,
            warnings: timetable.violations.len() - errors,
        }
    }

    /// Whether the timetable has no error-level violations.
    pub fn is_clean(&self) -> bool {
        self.errors == 0
    }
}
