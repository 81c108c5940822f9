//! Post-hoc timetable audit.
//!
//! Re-checks a timetable against the original requirements, independently
//! of the model that produced it. The strict model already enforces every
//! check here, so violations normally come from the relaxed fallback or
//! from a domain fallback (closest room, ignored day off).
//!
//! | Check | Severity |
//! |-------|----------|
//! | Instructor day off | Error |
//! | Time preference | Error |
//! | Split groups on different days | Error |
//! | Two-way split not consecutive | Warning |
//! | Room type mismatch | Error |
//! | Room smaller than group | Error |
//! | Room double booked | Error |
//! | Instructor/assistant double booked | Error |
//!
//! The audit never changes placements; it only classifies them.

use std::collections::HashMap;

use crate::cp::constraint::split_families;
use crate::models::{Placement, Room, SectionGroup, Violation, ViolationType};

/// Audits `timetable` placements against `groups` and `rooms`.
///
/// Placements whose group or room is unknown are skipped by the checks
/// that need them.
pub fn audit_timetable(
    placements: &[Placement],
    groups: &[SectionGroup],
    rooms: &[Room],
) -> Vec<Violation> {
    let by_group: HashMap<&str, &Placement> = placements
        .iter()
        .map(|p| (p.group_id.as_str(), p))
        .collect();
    let room_of: HashMap<&str, &Room> = rooms.iter().map(|r| (r.id.as_str(), r)).collect();

    let mut violations = Vec::new();

    for group in groups {
        let Some(p) = by_group.get(group.id.as_str()) else {
            continue;
        };
        check_availability(group, p, &mut violations);
        if let Some(room) = room_of.get(p.room_id.as_str()) {
            check_room(group, room, &mut violations);
        }
    }

    check_splits(groups, &by_group, &mut violations);
    check_double_booking(placements, groups, &mut violations);

    violations
}

fn check_availability(group: &SectionGroup, p: &Placement, out: &mut Vec<Violation>) {
    let section = &group.section;
    if section.day_off == Some(p.slot.day) {
        out.push(Violation::error(
            ViolationType::DayOff,
            &group.id,
            format!(
                "{} is placed on {}, the day off of {}",
                group.id, p.slot.day, section.instructor
            ),
        ));
    }
    if !section.time_preference.accepts(&p.slot) {
        out.push(Violation::error(
            ViolationType::TimePreference,
            &group.id,
            format!(
                "{} starts at {}, outside the {} preference of {}",
                group.id, p.slot, section.time_preference, section.instructor
            ),
        ));
    }
}

fn check_room(group: &SectionGroup, room: &Room, out: &mut Vec<Violation>) {
    let section = &group.section;
    if section.requires_room_type() && !room.has_type(&section.room_type) {
        out.push(Violation::error(
            ViolationType::RoomTypeMismatch,
            &group.id,
            format!(
                "{} requires a {} room but got {} ({})",
                group.id, section.room_type, room.id, room.room_type
            ),
        ));
    }
    if !room.fits(group.students) {
        out.push(Violation::error(
            ViolationType::CapacityExceeded,
            &group.id,
            format!(
                "{} has {} students but {} seats {}",
                group.id, group.students, room.id, room.capacity
            ),
        ));
    }
}

fn check_splits(
    groups: &[SectionGroup],
    by_group: &HashMap<&str, &Placement>,
    out: &mut Vec<Violation>,
) {
    for ((_, section_id), members) in split_families(groups) {
        let placed: Vec<&Placement> = members
            .iter()
            .filter_map(|&i| by_group.get(groups[i].id.as_str()).copied())
            .collect();
        let Some(first) = placed.first() else {
            continue;
        };

        if placed.iter().any(|p| !p.slot.same_day(&first.slot)) {
            out.push(Violation::error(
                ViolationType::SplitDifferentDays,
                &section_id,
                format!("groups of {section_id} are spread over several days"),
            ));
            continue;
        }

        if let [a, b] = placed[..] {
            if members.len() == 2 && !a.slot.is_consecutive_with(&b.slot) {
                out.push(Violation::warning(
                    ViolationType::SplitNotConsecutive,
                    &section_id,
                    format!(
                        "groups of {section_id} are not back to back ({} and {})",
                        a.slot, b.slot
                    ),
                ));
            }
        }
    }
}

fn check_double_booking(
    placements: &[Placement],
    groups: &[SectionGroup],
    out: &mut Vec<Violation>,
) {
    let group_of: HashMap<&str, &SectionGroup> =
        groups.iter().map(|g| (g.id.as_str(), g)).collect();

    for (i, a) in placements.iter().enumerate() {
        for b in &placements[i + 1..] {
            if a.slot != b.slot {
                continue;
            }
            if a.room_id == b.room_id {
                out.push(Violation::error(
                    ViolationType::RoomDoubleBooked,
                    &a.room_id,
                    format!(
                        "{} hosts both {} and {} at {}",
                        a.room_id, a.group_id, b.group_id, a.slot
                    ),
                ));
            }

            let (Some(ga), Some(gb)) = (
                group_of.get(a.group_id.as_str()),
                group_of.get(b.group_id.as_str()),
            ) else {
                continue;
            };
            let theirs = gb.section.staff_keys();
            for person in ga.section.staff_keys() {
                if theirs.contains(&person) {
                    out.push(Violation::error(
                        ViolationType::StaffDoubleBooked,
                        &person,
                        format!(
                            "{person} teaches both {} and {} at {}",
                            a.group_id, b.group_id, a.slot
                        ),
                    ));
                }
            }
        }
    }
}
