//! Timetabling constraints and the constraint compiler.
//!
//! Constraints are plain data: a variant naming its scope and parameters.
//! [`ScheduleConstraint::is_satisfied`] is the single dispatcher that
//! evaluates them, so the compiler's output can be inspected and tested
//! without running a search.
//!
//! # Strict model
//! - `DistinctTime` for every pair of groups sharing an instructor or assistant
//! - `NoRoomClash` for every pair of groups
//! - `RoomType` for every group requiring a room type
//! - `SameDay` for every pair of groups split from one section
//! - `Consecutive` for the pair of a section split exactly in two
//!
//! # Relaxed model
//! Only `NoRoomClash`.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::csp::{Constraint, VarId};
use crate::models::{Room, SectionGroup, TimeSlot};

/// A value taken by a timetabling variable.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScheduleValue {
    /// Value of a time variable.
    Slot(TimeSlot),
    /// Value of a room variable.
    Room(Room),
}

impl ScheduleValue {
    /// The slot, if this is a time value.
    pub fn as_slot(&self) -> Option<&TimeSlot> {
        match self {
            ScheduleValue::Slot(s) => Some(s),
            ScheduleValue::Room(_) => None,
        }
    }

    /// The room, if this is a room value.
    pub fn as_room(&self) -> Option<&Room> {
        match self {
            ScheduleValue::Room(r) => Some(r),
            ScheduleValue::Slot(_) => None,
        }
    }
}

/// The pair of variables declared for one group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupVars {
    /// Slot variable.
    pub time: VarId,
    /// Room variable.
    pub room: VarId,
}

/// Which constraint set to compile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ModelMode {
    /// Full constraint set.
    #[default]
    Strict,
    /// Room double-booking only.
    Relaxed,
}

/// Constraint kind, without scope or parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ConstraintKind {
    DistinctTime,
    NoRoomClash,
    RoomType,
    SameDay,
    Consecutive,
}

/// A timetabling constraint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ScheduleConstraint {
    /// Two groups sharing staff take different slots.
    DistinctTime { a: VarId, b: VarId },
    /// Two groups never hold the same `(slot, room)` pair.
    NoRoomClash {
        time_a: VarId,
        time_b: VarId,
        room_a: VarId,
        room_b: VarId,
    },
    /// The assigned room has the required type (case-insensitive).
    RoomType { room: VarId, room_type: String },
    /// Two slots fall on the same day.
    SameDay { a: VarId, b: VarId },
    /// Two slots are immediately consecutive on the same day.
    Consecutive { a: VarId, b: VarId },
}

impl ScheduleConstraint {
    /// The constraint's kind.
    pub fn kind(&self) -> ConstraintKind {
        match self {
            ScheduleConstraint::DistinctTime { .. } => ConstraintKind::DistinctTime,
            ScheduleConstraint::NoRoomClash { .. } => ConstraintKind::NoRoomClash,
            ScheduleConstraint::RoomType { .. } => ConstraintKind::RoomType,
            ScheduleConstraint::SameDay { .. } => ConstraintKind::SameDay,
            ScheduleConstraint::Consecutive { .. } => ConstraintKind::Consecutive,
        }
    }

    /// Number of variables in scope (1, 2, or 4).
    pub fn arity(&self) -> usize {
        match self {
            ScheduleConstraint::RoomType { .. } => 1,
            ScheduleConstraint::NoRoomClash { .. } => 4,
            _ => 2,
        }
    }
}

impl Constraint<ScheduleValue> for ScheduleConstraint {
    fn scope(&self) -> Vec<VarId> {
        match self {
            ScheduleConstraint::DistinctTime { a, b }
            | ScheduleConstraint::SameDay { a, b }
            | ScheduleConstraint::Consecutive { a, b } => vec![*a, *b],
            ScheduleConstraint::NoRoomClash {
                time_a,
                time_b,
                room_a,
                room_b,
            } => vec![*time_a, *time_b, *room_a, *room_b],
            ScheduleConstraint::RoomType { room, .. } => vec![*room],
        }
    }

    fn is_satisfied(&self, values: &[&ScheduleValue]) -> bool {
        let slot = |i: usize| values.get(i).and_then(|v| v.as_slot());
        let room = |i: usize| values.get(i).and_then(|v| v.as_room());

        match self {
            ScheduleConstraint::DistinctTime { .. } => match (slot(0), slot(1)) {
                (Some(a), Some(b)) => a != b,
                _ => false,
            },
            ScheduleConstraint::NoRoomClash { .. } => {
                match (slot(0), slot(1), room(2), room(3)) {
                    (Some(ta), Some(tb), Some(ra), Some(rb)) => !(ta == tb && ra.id == rb.id),
                    _ => false,
                }
            }
            ScheduleConstraint::RoomType { room_type, .. } => {
                room(0).is_some_and(|r| r.has_type(room_type))
            }
            ScheduleConstraint::SameDay { .. } => match (slot(0), slot(1)) {
                (Some(a), Some(b)) => a.same_day(b),
                _ => false,
            },
            ScheduleConstraint::Consecutive { .. } => match (slot(0), slot(1)) {
                (Some(a), Some(b)) => a.is_consecutive_with(b),
                _ => false,
            },
        }
    }
}

/// Compiles the constraint set for `groups`, whose variables are `vars`
/// (`vars[i]` belongs to `groups[i]`).
///
/// The output depends only on the groups and variable ids, never on domain
/// or slot order.
pub fn compile_constraints(
    groups: &[SectionGroup],
    vars: &[GroupVars],
    mode: ModelMode,
) -> Vec<ScheduleConstraint> {
    debug_assert_eq!(groups.len(), vars.len());
    let n = groups.len().min(vars.len());
    let mut constraints = Vec::new();

    if mode == ModelMode::Strict {
        for i in 0..n {
            for j in (i + 1)..n {
                if groups[i].shares_staff_with(&groups[j]) {
                    constraints.push(ScheduleConstraint::DistinctTime {
                        a: vars[i].time,
                        b: vars[j].time,
                    });
                }
            }
        }
    }

    for i in 0..n {
        for j in (i + 1)..n {
            constraints.push(ScheduleConstraint::NoRoomClash {
                time_a: vars[i].time,
                time_b: vars[j].time,
                room_a: vars[i].room,
                room_b: vars[j].room,
            });
        }
    }

    if mode == ModelMode::Relaxed {
        return constraints;
    }

    for i in 0..n {
        if groups[i].section.requires_room_type() {
            constraints.push(ScheduleConstraint::RoomType {
                room: vars[i].room,
                room_type: groups[i].section.room_type.clone(),
            });
        }
    }

    for members in split_families(&groups[..n]).values() {
        for (x, &i) in members.iter().enumerate() {
            for &j in &members[x + 1..] {
                constraints.push(ScheduleConstraint::SameDay {
                    a: vars[i].time,
                    b: vars[j].time,
                });
            }
        }
        // Three-or-more-way splits only get same-day cohesion.
        if let [i, j] = members[..] {
            constraints.push(ScheduleConstraint::Consecutive {
                a: vars[i].time,
                b: vars[j].time,
            });
        }
    }

    constraints
}

/// Indices of split groups, keyed by originating section, in first-seen order.
pub(crate) fn split_families(groups: &[SectionGroup]) -> BTreeMap<(usize, String), Vec<usize>> {
    let mut first_seen: Vec<(String, usize)> = Vec::new();
    let mut families: BTreeMap<(usize, String), Vec<usize>> = BTreeMap::new();
    for (i, g) in groups.iter().enumerate() {
        if !g.is_split() {
            continue;
        }
        let order = match first_seen.iter().find(|(id, _)| id == g.section_id()) {
            Some((_, order)) => *order,
            None => {
                first_seen.push((g.section_id().to_string(), i));
                i
            }
        };
        families
            .entry((order, g.section_id().to_string()))
            .or_default()
            .push(i);
    }
    families
}
