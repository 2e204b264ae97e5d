//! Event records and their storage keys.
//!
//! An `EventRecord` is a single timed block on one day. Records are never
//! edited in place: an "edit" is a delete followed by a fresh save.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveTime, Timelike};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{WeekGridError, WeekGridResult};

/// Prefix shared by every event entry in the key-value medium.
pub const EVENT_KEY_PREFIX: &str = "event-";

/// Events shorter than this are rejected at creation.
pub const MIN_EVENT_MINUTES: i64 = 15;

/// A 24-hour clock value with minute precision, written as `HH:MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeOfDay(NaiveTime);

impl TimeOfDay {
    pub fn new(hour: u32, minute: u32) -> Option<Self> {
        NaiveTime::from_hms_opt(hour, minute, 0).map(TimeOfDay)
    }

    pub fn parse(s: &str) -> WeekGridResult<Self> {
        let trimmed = s.trim();
        NaiveTime::parse_from_str(trimmed, "%H:%M")
            .map(TimeOfDay)
            .map_err(|_| WeekGridError::InvalidTime(s.to_string()))
    }

    pub fn hour(&self) -> u32 {
        self.0.hour()
    }

    pub fn minute(&self) -> u32 {
        self.0.minute()
    }

    pub fn minutes_since_midnight(&self) -> i32 {
        (self.hour() * 60 + self.minute()) as i32
    }

    pub fn as_naive(&self) -> NaiveTime {
        self.0
    }
}

impl From<NaiveTime> for TimeOfDay {
    /// Drops seconds and sub-second precision.
    fn from(time: NaiveTime) -> Self {
        TimeOfDay(NaiveTime::from_hms_opt(time.hour(), time.minute(), 0).unwrap_or(time))
    }
}

impl FromStr for TimeOfDay {
    type Err = WeekGridError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TimeOfDay::parse(s)
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

impl Serialize for TimeOfDay {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TimeOfDay {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        TimeOfDay::parse(&raw).map_err(serde::de::Error::custom)
    }
}

/// Storage key of an event: `event-<YYYY-MM-DD>-<HH:MM>`.
///
/// The key is derived only from the day and the start time, so there is at
/// most one stored event per (day, start) pair. Saving a second event into an
/// occupied slot replaces the first one.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EventKey(String);

impl EventKey {
    pub fn for_slot(day: NaiveDate, start: TimeOfDay) -> Self {
        EventKey(format!("{}{}-{}", EVENT_KEY_PREFIX, day.format("%Y-%m-%d"), start))
    }

    /// Parse a key in the canonical `event-<YYYY-MM-DD>-<HH:MM>` form.
    pub fn parse(s: &str) -> WeekGridResult<Self> {
        let invalid = || WeekGridError::InvalidKey(s.to_string());

        let rest = s.strip_prefix(EVENT_KEY_PREFIX).ok_or_else(invalid)?;
        // YYYY-MM-DD is 10 chars, then '-', then HH:MM
        if !rest.is_ascii() || rest.len() != 16 || &rest[10..11] != "-" {
            return Err(invalid());
        }

        let day = NaiveDate::parse_from_str(&rest[..10], "%Y-%m-%d").map_err(|_| invalid())?;
        let start = TimeOfDay::parse(&rest[11..]).map_err(|_| invalid())?;

        Ok(EventKey::for_slot(day, start))
    }

    /// Whether a raw medium key belongs to the event namespace.
    pub fn is_event_key(raw: &str) -> bool {
        raw.starts_with(EVENT_KEY_PREFIX)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EventKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for EventKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A user-created event on a single day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    pub title: String,
    pub day: NaiveDate,
    pub start: TimeOfDay,
    pub end: TimeOfDay,
    #[serde(rename = "type")]
    pub event_type: String,
}

impl EventRecord {
    /// Create a record, rejecting ranges that end before they start or last
    /// less than [`MIN_EVENT_MINUTES`].
    pub fn new(
        title: impl Into<String>,
        day: NaiveDate,
        start: TimeOfDay,
        end: TimeOfDay,
        event_type: impl Into<String>,
    ) -> WeekGridResult<Self> {
        validate_range(start, end)?;

        Ok(EventRecord {
            title: title.into(),
            day,
            start,
            end,
            event_type: event_type.into(),
        })
    }

    pub fn key(&self) -> EventKey {
        EventKey::for_slot(self.day, self.start)
    }

    pub fn duration_minutes(&self) -> i64 {
        i64::from(self.end.minutes_since_midnight() - self.start.minutes_since_midnight())
    }
}

impl fmt::Display for EventRecord {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}-{} {}", self.start, self.end, self.title)?;
        if !self.event_type.is_empty() {
            write!(f, " [{}]", self.event_type)?;
        }
        Ok(())
    }
}

fn validate_range(start: TimeOfDay, end: TimeOfDay) -> WeekGridResult<()> {
    if end <= start {
        return Err(WeekGridError::InvalidTimeRange {
            start: start.to_string(),
            end: end.to_string(),
        });
    }

    let minutes = i64::from(end.minutes_since_midnight() - start.minutes_since_midnight());
    if minutes < MIN_EVENT_MINUTES {
        return Err(WeekGridError::EventTooShort {
            minutes,
            minimum: MIN_EVENT_MINUTES,
        });
    }

    Ok(())
}

/// Parse YYYY-MM-DD
pub fn parse_day(s: &str) -> WeekGridResult<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|_| WeekGridError::InvalidDate(s.to_string()))
}

// =============================================================================
// Tests
// =============================================================================
