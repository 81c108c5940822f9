//! Section splitting.
//!
//! When a section's enrollment exceeds the largest room, it is divided
//! into `k = ceil(students / max_capacity)` groups. Every group but the
//! last holds `ceil(students / k)` students; the last takes the remainder,
//! so group sizes always sum to the original enrollment.
//!
//! Splitting is pure: the same request and rooms always yield the same
//! groups.

use log::debug;

use crate::error::ScheduleError;
use crate::models::{max_capacity, Room, SectionGroup, SectionRequest};

/// Splits a section into room-sized groups.
///
/// Returns the section unchanged as one group when it fits the largest room.
///
/// # Errors
/// [`ScheduleError::NoRooms`] if `rooms` is empty.
///
/// # Example
/// ```
/// use u_timetable::models::{Room, SectionRequest};
/// use u_timetable::split::split_section;
///
/// let rooms = vec![Room::lecture_hall("H1", 30)];
/// let groups = split_section(&SectionRequest::new("MATH1", 70, "Ali"), &rooms).unwrap();
/// let sizes: Vec<u32> = groups.iter().map(|g| g.students).collect();
/// assert_eq!(sizes, vec![24, 24, 22]);
/// ```
pub fn split_section(
    section: &SectionRequest,
    rooms: &[Room],
) -> Result<Vec<SectionGroup>, ScheduleError> {
    let max_cap = max_capacity(rooms).ok_or(ScheduleError::NoRooms)?;

    if section.students <= max_cap {
        return Ok(vec![SectionGroup::whole(section)]);
    }

    let groups = section.students.div_ceil(max_cap.max(1));
    let per_group = section.students.div_ceil(groups);
    let last = section.students - per_group * (groups - 1);

    debug!(
        "splitting {} ({} students) into {} groups of ~{}",
        section.id, section.students, groups, per_group
    );

    let total = groups as usize;
    Ok((1..=total)
        .map(|n| {
            let students = if n < total { per_group } else { last };
            SectionGroup::part(section, n, total, students)
        })
        .collect())
}

/// Splits every section, preserving input order.
///
/// # Errors
/// [`ScheduleError::NoRooms`] if `rooms` is empty.
pub fn split_all(
    sections: &[SectionRequest],
    rooms: &[Room],
) -> Result<Vec<SectionGroup>, ScheduleError> {
    let mut groups = Vec::with_capacity(sections.len());
    for section in sections {
        groups.extend(split_section(section, rooms)?);
    }
    Ok(groups)
}
