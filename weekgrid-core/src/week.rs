//! The visible week: a Monday-start, seven-day window.

use std::fmt;

use chrono::{Datelike, Days, Duration, NaiveDate, NaiveDateTime};

use crate::error::{WeekGridError, WeekGridResult};

pub const DAYS_PER_WEEK: usize = 7;

/// Seven consecutive days starting on a Monday.
///
/// Covers `[first_day, first_day + 7 days)`. The only way to build one is
/// through `for_date`/`for_datetime`, so `first_day` is always a Monday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WeekWindow {
    first_day: NaiveDate,
}

impl WeekWindow {
    /// Window containing `reference`. Sunday belongs to the week that began
    /// six days earlier.
    pub fn for_date(reference: NaiveDate) -> Self {
        // Monday = 1 .. Sunday = 7
        let weekday = i64::from(reference.weekday().number_from_monday());
        WeekWindow {
            first_day: reference - Duration::days(weekday - 1),
        }
    }

    /// Window containing `reference`; the time of day is dropped.
    pub fn for_datetime(reference: NaiveDateTime) -> Self {
        Self::for_date(reference.date())
    }

    /// Move by whole weeks (negative goes back in time). Fails when the
    /// resulting week does not fit in the calendar's date range.
    pub fn shift(&self, delta_weeks: i64) -> WeekGridResult<Self> {
        let first_day = delta_weeks
            .checked_mul(DAYS_PER_WEEK as i64)
            .and_then(Duration::try_days)
            .and_then(|delta| self.first_day.checked_add_signed(delta))
            .filter(|day| day.checked_add_days(Days::new(DAYS_PER_WEEK as u64)).is_some())
            .ok_or_else(|| {
                WeekGridError::DateOutOfRange(format!("{self} shifted by {delta_weeks} weeks"))
            })?;

        Ok(WeekWindow { first_day })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.first_day <= date && date < self.end_exclusive()
    }

    pub fn first_day(&self) -> NaiveDate {
        self.first_day
    }

    pub fn last_day(&self) -> NaiveDate {
        self.first_day + Duration::days(6)
    }

    pub fn end_exclusive(&self) -> NaiveDate {
        self.first_day + Duration::days(7)
    }

    /// Monday through Sunday.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        (0..DAYS_PER_WEEK as i64).map(|offset| self.first_day + Duration::days(offset))
    }

    /// Column position of `date` (Monday = 0), or None outside the window.
    pub fn day_index(&self, date: NaiveDate) -> Option<usize> {
        self.contains(date)
            .then(|| (date - self.first_day).num_days() as usize)
    }

    pub fn iso_week(&self) -> u32 {
        self.first_day.iso_week().week()
    }
}

impl fmt::Display for WeekWindow {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{} - {}",
            self.first_day.format("%Y-%m-%d"),
            self.last_day().format("%Y-%m-%d")
        )
    }
}

// =============================================================================
// Tests
// =============================================================================
