//! Calendar windows, date ranges, and cell date parsing.
//!
//! # Time Model
//! Schedule dates are civil dates ([`NaiveDate`]) with no timezone. Where an
//! instant is needed (time-off entries carrying a clock time, feast anchors),
//! a [`NaiveDateTime`] is used and dates are pinned to midday so that no
//! offset or daylight-saving arithmetic can move them across a day boundary.
//!
//! # Boundaries
//! [`MonthWindow`] is closed on both ends: it runs from the first instant of
//! the first day to the final millisecond (23:59:59.999) of the last day.
//! [`DateRange`] is an inclusive range of whole days.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Date-time formats accepted in store cells, tried in order.
const DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

/// Date-only formats accepted in store cells.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y"];

/// The calendar bounds of one month, inclusive of its final instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthWindow {
    /// Calendar year.
    pub year: i32,
    /// Month number (1..=12).
    pub month: u32,
    /// First instant of the first day (00:00:00.000).
    pub start: NaiveDateTime,
    /// Final instant of the last day (23:59:59.999).
    pub end: NaiveDateTime,
}

impl MonthWindow {
    /// Creates the window for `year`-`month`.
    ///
    /// # Errors
    /// [`Error::InvalidMonth`] for a month outside 1..=12, and
    /// [`Error::InvalidYear`] when the year is outside chrono's range.
    pub fn new(year: i32, month: u32) -> Result<Self> {
        if !(1..=12).contains(&month) {
            return Err(Error::InvalidMonth(month));
        }
        let first = NaiveDate::from_ymd_opt(year, month, 1).ok_or(Error::InvalidYear(year))?;
        let last = last_day_of_month(first).ok_or(Error::InvalidYear(year))?;
        let end = last
            .and_hms_milli_opt(23, 59, 59, 999)
            .ok_or(Error::InvalidYear(year))?;

        Ok(Self {
            year,
            month,
            start: first.and_time(NaiveTime::MIN),
            end,
        })
    }

    /// First calendar day of the month.
    pub fn first_day(&self) -> NaiveDate {
        self.start.date()
    }

    /// Last calendar day of the month.
    pub fn last_day(&self) -> NaiveDate {
        self.end.date()
    }

    /// Whether an instant falls within the window.
    ///
    /// The upper bound is the whole last day, so instants past
    /// [`end`](Self::end) with sub-millisecond precision still belong.
    #[inline]
    pub fn contains(&self, at: NaiveDateTime) -> bool {
        at >= self.start && at.date() <= self.last_day()
    }

    /// Whether a calendar day belongs to the month.
    #[inline]
    pub fn contains_date(&self, date: NaiveDate) -> bool {
        date >= self.first_day() && date <= self.last_day()
    }
}

/// An inclusive range of whole days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    /// First day (inclusive).
    pub start: NaiveDate,
    /// Last day (inclusive).
    pub end: NaiveDate,
}

impl DateRange {
    /// Creates a range. No reordering is done; see [`is_inverted`](Self::is_inverted).
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// A single-day range.
    pub fn day(date: NaiveDate) -> Self {
        Self::new(date, date)
    }

    /// Whether the end precedes the start.
    pub fn is_inverted(&self) -> bool {
        self.end < self.start
    }

    /// Number of days covered, counting both ends. Zero for inverted ranges.
    pub fn len_days(&self) -> i64 {
        if self.is_inverted() {
            0
        } else {
            (self.end - self.start).num_days() + 1
        }
    }

    /// Whether a day falls within the range.
    #[inline]
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    /// Whether two ranges share at least one day.
    ///
    /// Inclusive on both ends: ranges that touch on a single day overlap.
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start <= other.end && self.end >= other.start
    }
}

/// Pins a date to midday.
pub fn midday(date: NaiveDate) -> NaiveDateTime {
    date.and_hms_opt(12, 0, 0)
        .unwrap_or_else(|| date.and_time(NaiveTime::MIN))
}

/// Parses a loosely formatted date or date-time cell.
///
/// Accepts RFC 3339 (the offset is dropped, keeping the local wall time),
/// `YYYY-MM-DD` and `MM/DD/YYYY`, each optionally followed by a clock time.
/// Date-only input resolves to midnight. Blank or unrecognized input yields
/// `None`.
pub fn parse_date_time(cell: &str) -> Option<NaiveDateTime> {
    let cell = cell.trim();
    if cell.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(cell) {
        return Some(dt.naive_local());
    }

    DATE_TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(cell, fmt).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(cell, fmt).ok())
                .map(|d| d.and_time(NaiveTime::MIN))
        })
}

/// Parses a date cell, discarding any clock time.
pub fn parse_date(cell: &str) -> Option<NaiveDate> {
    parse_date_time(cell).map(|dt| dt.date())
}

fn last_day_of_month(first: NaiveDate) -> Option<NaiveDate> {
    let (year, month) = if first.month() == 12 {
        (first.year() + 1, 1)
    } else {
        (first.year(), first.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1)?.pred_opt()
}
