//! Time-off interval index.
//!
//! Flattens approved time-off requests into two per-volunteer lookups for
//! one target month:
//!
//! - **`unavailable`**: dates (and day-parts) the volunteer cannot serve.
//! - **`exclusively_available`**: the only dates the volunteer can serve.
//!
//! # Admission Rules
//! An entry is admitted when its calendar date lies inside the month
//! (the whole last day included, whatever the clock precision) or when its calendar date is in
//! the caller's spillover set: dates outside the month that still belong to
//! its generated schedule, such as a vigil on the last day of the previous
//! month or a midnight mass dated the 1st of the next.
//!
//! # Precedence
//! A volunteer may appear in both lookups. `unavailable` wins whenever both
//! speak to the same (date, day-part); see [`TimeOffIndex::permits`].

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use tracing::instrument;

use crate::error::Result;
use crate::models::{DayPart, MonthWindow, RequestKind, TimeOffRequest};

/// Day-parts recorded for one date.
pub type DayParts = BTreeSet<DayPart>;

/// Date → day-parts for one volunteer.
pub type VolunteerDates = BTreeMap<NaiveDate, DayParts>;

/// Per-volunteer date lookups for one month.
///
/// Volunteer keys are normalized (trimmed, lowercase); the query methods
/// normalize their input the same way.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeOffIndex {
    /// Volunteer → dates they cannot serve.
    pub unavailable: BTreeMap<String, VolunteerDates>,
    /// Volunteer → the only dates they can serve.
    pub exclusively_available: BTreeMap<String, VolunteerDates>,
}

/// Counters collected while building an index.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexStats {
    /// Approved requests seen.
    pub approved: usize,
    /// Pending or rejected requests skipped.
    pub not_approved: usize,
    /// Approved requests with no usable dates or no name.
    pub empty: usize,
    /// Approved requests with an unrecognized type.
    pub unknown_kind: usize,
    /// Entries admitted to the index.
    pub admitted: usize,
    /// Of those, entries admitted only through the spillover set.
    pub via_spillover: usize,
    /// Entries dropped as outside the month.
    pub outside_month: usize,
}

/// Index plus its build counters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeOffBuild {
    /// The lookups.
    pub index: TimeOffIndex,
    /// What was admitted and skipped.
    pub stats: IndexStats,
}

/// Builds the time-off index for `year`-`month`.
///
/// Never mutates its inputs and never fails on per-request problems: those
/// are counted in [`IndexStats`] and logged.
///
/// # Errors
/// Only for an invalid month or year.
#[instrument(level = "debug", skip(requests, spillover), fields(requests = requests.len()))]
pub fn build_time_off_index(
    requests: &[TimeOffRequest],
    year: i32,
    month: u32,
    spillover: &BTreeSet<NaiveDate>,
) -> Result<TimeOffBuild> {
    let window = MonthWindow::new(year, month)?;
    let mut build = TimeOffBuild::default();

    for request in requests {
        if !request.is_approved() {
            build.stats.not_approved += 1;
            continue;
        }
        build.stats.approved += 1;

        let name = normalize_key(&request.volunteer_name);
        if name.is_empty() || request.entries.is_empty() {
            tracing::debug!(request = %request.id, "approved request has no name or dates, skipped");
            build.stats.empty += 1;
            continue;
        }

        let target = match &request.kind {
            RequestKind::Unavailable => &mut build.index.unavailable,
            RequestKind::ExclusivelyAvailable => &mut build.index.exclusively_available,
            RequestKind::Unknown(tag) => {
                tracing::warn!(request = %request.id, kind = %tag, "unknown time-off type, skipped");
                build.stats.unknown_kind += 1;
                continue;
            }
        };

        for entry in &request.entries {
            let date = entry.date();
            let in_month = window.contains_date(date);
            if !in_month && !spillover.contains(&date) {
                build.stats.outside_month += 1;
                continue;
            }
            if !in_month {
                build.stats.via_spillover += 1;
            }
            target
                .entry(name.clone())
                .or_default()
                .entry(date)
                .or_default()
                .insert(entry.day_part);
            build.stats.admitted += 1;
        }
    }

    tracing::debug!(stats = ?build.stats, "time-off index built");
    Ok(build)
}

impl TimeOffIndex {
    /// Whether the volunteer declared this (date, day-part) unavailable.
    pub fn is_unavailable(&self, volunteer: &str, date: NaiveDate, part: DayPart) -> bool {
        lookup(&self.unavailable, volunteer, date, part)
    }

    /// Whether the volunteer restricted themselves to specific dates.
    pub fn has_exclusive(&self, volunteer: &str) -> bool {
        self.exclusively_available
            .get(&normalize_key(volunteer))
            .is_some_and(|dates| !dates.is_empty())
    }

    /// Whether this (date, day-part) is among the volunteer's exclusive dates.
    pub fn is_exclusively_available(&self, volunteer: &str, date: NaiveDate, part: DayPart) -> bool {
        lookup(&self.exclusively_available, volunteer, date, part)
    }

    /// Whether the exclusive-availability rule admits the volunteer.
    ///
    /// Volunteers with no exclusive entries are unrestricted.
    pub fn exclusive_permits(&self, volunteer: &str, date: NaiveDate, part: DayPart) -> bool {
        !self.has_exclusive(volunteer) || self.is_exclusively_available(volunteer, date, part)
    }

    /// Whether time-off allows the volunteer to serve.
    ///
    /// `unavailable` takes precedence over `exclusively_available`.
    pub fn permits(&self, volunteer: &str, date: NaiveDate, part: DayPart) -> bool {
        !self.is_unavailable(volunteer, date, part) && self.exclusive_permits(volunteer, date, part)
    }

    /// Whether the index holds no entries at all.
    pub fn is_empty(&self) -> bool {
        self.unavailable.is_empty() && self.exclusively_available.is_empty()
    }
}

fn lookup(
    map: &BTreeMap<String, VolunteerDates>,
    volunteer: &str,
    date: NaiveDate,
    part: DayPart,
) -> bool {
    map.get(&normalize_key(volunteer))
        .and_then(|dates| dates.get(&date))
        .is_some_and(|parts| parts.contains(&part))
}

fn normalize_key(name: &str) -> String {
    name.trim().to_lowercase()
}
