//! Section group model.
//!
//! A section group is the unit that actually gets a time slot and a room.
//! It is the section itself when the enrollment fits a room, or one of the
//! groups produced by [`crate::split::split_section`] otherwise.

use serde::{Deserialize, Serialize};

use super::SectionRequest;

/// A schedulable group of students from one section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionGroup {
    /// Group identifier: the section id, suffixed `_G{n}` when split.
    pub id: String,
    /// Students in this group.
    pub students: u32,
    /// 1-based group number.
    pub group_number: usize,
    /// Number of groups the section was split into (1 = not split).
    pub total_groups: usize,
    /// The originating request.
    pub section: SectionRequest,
}

impl SectionGroup {
    /// Wraps an unsplit section as a single group.
    pub fn whole(section: &SectionRequest) -> Self {
        Self {
            id: section.id.clone(),
            students: section.students,
            group_number: 1,
            total_groups: 1,
            section: section.clone(),
        }
    }

    /// Creates group `group_number` of `total_groups` for a split section.
    pub fn part(
        section: &SectionRequest,
        group_number: usize,
        total_groups: usize,
        students: u32,
    ) -> Self {
        Self {
            id: format!("{}_G{}", section.id, group_number),
            students,
            group_number,
            total_groups,
            section: section.clone(),
        }
    }

    /// Identifier of the originating section.
    #[inline]
    pub fn section_id(&self) -> &str {
        &self.section.id
    }

    /// Whether this group came out of a split.
    #[inline]
    pub fn is_split(&self) -> bool {
        self.total_groups > 1
    }

    /// Whether two groups share an instructor or assistant (case-insensitive).
    pub fn shares_staff_with(&self, other: &Self) -> bool {
        let mine = self.section.staff_keys();
        other
            .section
            .staff_keys()
            .iter()
            .any(|k| mine.contains(k))
    }

    /// Name of the solver variable holding this group's slot.
    pub fn time_var_name(&self) -> String {
        format!("{}_time", self.id)
    }

    /// Name of the solver variable holding this group's room.
    pub fn room_var_name(&self) -> String {
        format!("{}_room", self.id)
    }
}
