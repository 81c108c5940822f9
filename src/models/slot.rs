//! Weekdays and weekly time slots.
//!
//! A [`TimeSlot`] is a `(day, start, end)` triple on the weekly grid.
//! Times are minutes since midnight. The canonical text form is
//! `Day_H:MM-H:MM`, e.g. `Mon_10:30-12:00`, with no leading zero on
//! the hour.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Day of the week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Weekday {
    Sun,
    Mon,
    Tue,
    Wed,
    Thu,
    Fri,
    Sat,
}

impl Weekday {
    /// All seven days, Sunday first.
    pub const ALL: [Weekday; 7] = [
        Weekday::Sun,
        Weekday::Mon,
        Weekday::Tue,
        Weekday::Wed,
        Weekday::Thu,
        Weekday::Fri,
        Weekday::Sat,
    ];

    /// Three-letter name (`"Mon"`).
    pub fn short_name(self) -> &'static str {
        match self {
            Weekday::Sun => "Sun",
            Weekday::Mon => "Mon",
            Weekday::Tue => "Tue",
            Weekday::Wed => "Wed",
            Weekday::Thu => "Thu",
            Weekday::Fri => "Fri",
            Weekday::Sat => "Sat",
        }
    }

    fn long_name(self) -> &'static str {
        match self {
            Weekday::Sun => "sunday",
            Weekday::Mon => "monday",
            Weekday::Tue => "tuesday",
            Weekday::Wed => "wednesday",
            Weekday::Thu => "thursday",
            Weekday::Fri => "friday",
            Weekday::Sat => "saturday",
        }
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_name())
    }
}

impl FromStr for Weekday {
    type Err = SlotParseError;

    /// Parses short or long names, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_lowercase();
        Weekday::ALL
            .into_iter()
            .find(|d| d.short_name().to_lowercase() == needle || d.long_name() == needle)
            .ok_or_else(|| SlotParseError::UnknownDay(s.trim().to_string()))
    }
}

/// Errors from parsing days, clock times, or slots.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SlotParseError {
    #[error("unknown weekday '{0}'")]
    UnknownDay(String),
    #[error("invalid clock time '{0}', expected H:MM")]
    InvalidTime(String),
    #[error("invalid time slot '{0}', expected Day_H:MM-H:MM")]
    InvalidSlot(String),
}

/// A time slot on the weekly grid.
///
/// Ordering is chronological: by day, then start, then end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TimeSlot {
    /// Day of the week.
    pub day: Weekday,
    /// Start time (minutes since midnight, inclusive).
    pub start: u16,
    /// End time (minutes since midnight, exclusive).
    pub end: u16,
}

impl TimeSlot {
    /// Creates a new slot.
    pub fn new(day: Weekday, start: u16, end: u16) -> Self {
        Self { day, start, end }
    }

    /// Slot length in minutes.
    #[inline]
    pub fn duration_minutes(&self) -> u16 {
        self.end.saturating_sub(self.start)
    }

    /// Whether both slots fall on the same day.
    #[inline]
    pub fn same_day(&self, other: &Self) -> bool {
        self.day == other.day
    }

    /// Whether the two slots are immediately consecutive on the same day.
    ///
    /// On a contiguous grid this is exactly "day-local index differs by 1".
    /// Symmetric, and always `false` across days.
    pub fn is_consecutive_with(&self, other: &Self) -> bool {
        self.same_day(other) && (self.end == other.start || other.end == self.start)
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}_{}-{}",
            self.day,
            format_clock(self.start),
            format_clock(self.end)
        )
    }
}

impl FromStr for TimeSlot {
    type Err = SlotParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || SlotParseError::InvalidSlot(s.to_string());
        let (day, range) = s.trim().split_once('_').ok_or_else(invalid)?;
        let (start, end) = range.split_once('-').ok_or_else(invalid)?;
        let slot = TimeSlot::new(day.parse()?, parse_clock(start)?, parse_clock(end)?);
        if slot.end <= slot.start {
            return Err(invalid());
        }
        Ok(slot)
    }
}

/// Formats minutes since midnight as `H:MM`.
pub fn format_clock(minutes: u16) -> String {
    format!("{}:{:02}", minutes / 60, minutes % 60)
}

/// Parses `H:MM` (or a bare hour `H`) into minutes since midnight.
pub fn parse_clock(s: &str) -> Result<u16, SlotParseError> {
    let invalid = || SlotParseError::InvalidTime(s.to_string());
    let s = s.trim();
    let (h, m) = match s.split_once(':') {
        Some((h, m)) => (h, m),
        None => (s, "0"),
    };
    let hours: u16 = h.parse().map_err(|_| invalid())?;
    let minutes: u16 = m.parse().map_err(|_| invalid())?;
    if hours > 24 || minutes >= 60 || (hours == 24 && minutes > 0) {
        return Err(invalid());
    }
    Ok(hours * 60 + minutes)
}
