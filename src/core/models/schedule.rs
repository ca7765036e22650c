//! Weekly meeting times and overlap detection

use crate::core::errors::ScheduleError;
use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Day of the week a meeting occurs on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Day {
    /// Monday
    Monday,
    /// Tuesday
    Tuesday,
    /// Wednesday
    Wednesday,
    /// Thursday
    Thursday,
    /// Friday
    Friday,
    /// Saturday
    Saturday,
    /// Sunday
    Sunday,
}

impl Day {
    /// All days, Monday first
    pub const ALL: [Self; 7] = [
        Self::Monday,
        Self::Tuesday,
        Self::Wednesday,
        Self::Thursday,
        Self::Friday,
        Self::Saturday,
        Self::Sunday,
    ];

    /// Full English name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Monday => "Monday",
            Self::Tuesday => "Tuesday",
            Self::Wednesday => "Wednesday",
            Self::Thursday => "Thursday",
            Self::Friday => "Friday",
            Self::Saturday => "Saturday",
            Self::Sunday => "Sunday",
        }
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Day {
    type Err = String;

    /// Accepts full names and three-letter abbreviations, case-insensitive
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|day| {
                let name = day.as_str().to_ascii_lowercase();
                lower == name || (lower.len() == 3 && name.starts_with(&lower))
            })
            .ok_or_else(|| format!("Unknown day of week: '{s}'"))
    }
}

/// One weekly meeting: a half-open interval `[start, end)` on a given day
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    day: Day,
    start: NaiveTime,
    end: NaiveTime,
    location: String,
}

impl Schedule {
    /// Create a meeting time
    ///
    /// # Errors
    /// Returns [`ScheduleError::InvalidInterval`] unless `end` is strictly after `start`
    pub fn new(
        day: Day,
        start: NaiveTime,
        end: NaiveTime,
        location: impl Into<String>,
    ) -> Result<Self, ScheduleError> {
        if end <= start {
            return Err(ScheduleError::InvalidInterval { start, end });
        }
        Ok(Self {
            day,
            start,
            end,
            location: location.into(),
        })
    }

    /// Re-check the interval invariant on a value that bypassed [`Schedule::new`]
    /// (e.g. one decoded from a snapshot)
    ///
    /// # Errors
    /// Returns [`ScheduleError::InvalidInterval`] when `end <= start`
    pub fn validate(&self) -> Result<(), ScheduleError> {
        if self.end <= self.start {
            return Err(ScheduleError::InvalidInterval {
                start: self.start,
                end: self.end,
            });
        }
        Ok(())
    }

    /// Meeting day
    #[must_use]
    pub const fn day(&self) -> Day {
        self.day
    }

    /// Start time (inclusive)
    #[must_use]
    pub const fn start(&self) -> NaiveTime {
        self.start
    }

    /// End time (exclusive)
    #[must_use]
    pub const fn end(&self) -> NaiveTime {
        self.end
    }

    /// Room or location
    #[must_use]
    pub fn location(&self) -> &str {
        &self.location
    }

    /// Whether this meeting overlaps `other`; see [`conflicts`]
    #[must_use]
    pub fn conflicts_with(&self, other: &Self) -> bool {
        conflicts(self, other)
    }
}

impl fmt::Display for Schedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}-{} @ {}",
            self.day,
            self.start.format("%H:%M"),
            self.end.format("%H:%M"),
            self.location
        )
    }
}

/// Whether two meetings overlap.
///
/// Meetings on different days never conflict. Touching intervals
/// (`a.end == b.start`) do not conflict.
#[must_use]
pub fn conflicts(a: &Schedule, b: &Schedule) -> bool {
    if a.day != b.day {
        return false;
    }
    !(a.end <= b.start || a.start >= b.end)
}
