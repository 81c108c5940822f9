//! Section request model.
//!
//! A section request is what an operator submits for one course section:
//! enrollment, teaching staff, the room type it needs, and the
//! instructor's availability (an optional day off and a time-of-day
//! preference). Requests are immutable once built.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::{TimeSlot, Weekday};

/// Instructor time-of-day preference, judged on a slot's start time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimePreference {
    /// Start before 12:00.
    Morning,
    /// Start at or after 12:00.
    Afternoon,
    /// Start before 11:00.
    Before11,
    /// Start at or after 11:00.
    After11,
    /// No filtering.
    #[default]
    Any,
}

const NOON: u16 = 12 * 60;
const ELEVEN: u16 = 11 * 60;

impl TimePreference {
    /// Whether a slot's start time satisfies this preference.
    pub fn accepts(self, slot: &TimeSlot) -> bool {
        match self {
            TimePreference::Morning => slot.start < NOON,
            TimePreference::Afternoon => slot.start >= NOON,
            TimePreference::Before11 => slot.start < ELEVEN,
            TimePreference::After11 => slot.start >= ELEVEN,
            TimePreference::Any => true,
        }
    }

    /// Stable identifier (`"before_11"`).
    pub fn as_str(self) -> &'static str {
        match self {
            TimePreference::Morning => "morning",
            TimePreference::Afternoon => "afternoon",
            TimePreference::Before11 => "before_11",
            TimePreference::After11 => "after_11",
            TimePreference::Any => "any",
        }
    }
}

impl fmt::Display for TimePreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimePreference {
    type Err = String;

    /// Unknown or empty input maps to `Any`, matching the operator menu default.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_lowercase().as_str() {
            "morning" => TimePreference::Morning,
            "afternoon" => TimePreference::Afternoon,
            "before_11" | "before11" => TimePreference::Before11,
            "after_11" | "after11" => TimePreference::After11,
            _ => TimePreference::Any,
        })
    }
}

/// A request to schedule one course section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionRequest {
    /// Section identifier (upper-case, e.g. `CS101`).
    pub id: String,
    /// Display name.
    pub name: String,
    /// Enrolled students.
    pub students: u32,
    /// Instructor name (title-case).
    pub instructor: String,
    /// Teaching assistant name (title-case), if any.
    pub assistant: Option<String>,
    /// Required room type (lower-case). Empty means any room.
    pub room_type: String,
    /// Instructor's day off.
    pub day_off: Option<Weekday>,
    /// Instructor's time-of-day preference.
    pub time_preference: TimePreference,
}

impl SectionRequest {
    /// Creates a request, normalizing the identifier and instructor name.
    pub fn new(id: impl AsRef<str>, students: u32, instructor: impl AsRef<str>) -> Self {
        Self {
            id: id.as_ref().trim().to_uppercase(),
            name: String::new(),
            students,
            instructor: normalize_name(instructor.as_ref()),
            assistant: None,
            room_type: String::new(),
            day_off: None,
            time_preference: TimePreference::Any,
        }
    }

    /// Sets the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the teaching assistant. Blank names are ignored.
    pub fn with_assistant(mut self, assistant: impl AsRef<str>) -> Self {
        let name = normalize_name(assistant.as_ref());
        self.assistant = (!name.is_empty()).then_some(name);
        self
    }

    /// Sets the required room type.
    pub fn with_room_type(mut self, room_type: impl AsRef<str>) -> Self {
        self.room_type = room_type.as_ref().trim().to_lowercase();
        self
    }

    /// Sets the instructor's day off.
    pub fn with_day_off(mut self, day: Weekday) -> Self {
        self.day_off = Some(day);
        self
    }

    /// Sets the time-of-day preference.
    pub fn with_time_preference(mut self, preference: TimePreference) -> Self {
        self.time_preference = preference;
        self
    }

    /// Whether a specific room type is required.
    pub fn requires_room_type(&self) -> bool {
        !self.room_type.is_empty()
    }

    /// Instructor and assistant names, lower-cased for comparison.
    pub fn staff_keys(&self) -> Vec<String> {
        let mut keys = vec![self.instructor.to_lowercase()];
        if let Some(ta) = &self.assistant {
            let ta = ta.to_lowercase();
            if !keys.contains(&ta) {
                keys.push(ta);
            }
        }
        keys
    }

    /// Whether the instructor is available at `slot` (day off and preference).
    pub fn accepts_slot(&self, slot: &TimeSlot) -> bool {
        self.day_off != Some(slot.day) && self.time_preference.accepts(slot)
    }
}

/// Normalizes a person name to title case with single spaces.
///
/// `"  omar   AL-sayed "` → `"Omar Al-sayed"`.
pub fn normalize_name(name: &str) -> String {
    name.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
