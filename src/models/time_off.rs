//! Time-off request model.
//!
//! A request declares either dates a volunteer cannot serve
//! ([`RequestKind::Unavailable`]) or the only dates they can
//! ([`RequestKind::ExclusivelyAvailable`]). Each date carries a
//! [`DayPart`], since a feast may have both a vigil and a daytime mass.
//!
//! # Lifecycle
//! Created `Pending` on submission, moved to `Approved` or `Rejected` by a
//! reviewer, never deleted. Only approved requests constrain assignment.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::DateRange;

/// Vigil (evening before) or daytime instance of a celebration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DayPart {
    /// Anticipated evening mass.
    Vigil,
    /// Any non-vigil mass on the day itself.
    NonVigil,
}

impl DayPart {
    /// Both day-parts, vigil first.
    pub const ALL: [DayPart; 2] = [DayPart::Vigil, DayPart::NonVigil];
}

impl fmt::Display for DayPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DayPart::Vigil => write!(f, "Vigil"),
            DayPart::NonVigil => write!(f, "NonVigil"),
        }
    }
}

impl FromStr for DayPart {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .trim()
            .chars()
            .filter(|c| c.is_alphanumeric())
            .collect::<String>()
            .to_lowercase();
        match key.as_str() {
            "vigil" | "v" | "true" | "yes" => Ok(DayPart::Vigil),
            "nonvigil" | "day" | "regular" | "false" | "no" => Ok(DayPart::NonVigil),
            _ => Err(format!("unrecognized day-part '{}'", s.trim())),
        }
    }
}

/// What a request declares about its dates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RequestKind {
    /// The volunteer cannot serve on the listed dates.
    Unavailable,
    /// The volunteer can serve only on the listed dates.
    ExclusivelyAvailable,
    /// A type tag this engine does not recognize (kept for counting).
    Unknown(String),
}

impl RequestKind {
    /// Parses a type cell ("Unavailable", "Only Available", ...).
    ///
    /// Anything unrecognized becomes [`RequestKind::Unknown`] rather than an
    /// error so that the caller can count it.
    pub fn parse(cell: &str) -> Self {
        let key: String = cell
            .trim()
            .chars()
            .filter(|c| c.is_alphanumeric())
            .collect::<String>()
            .to_lowercase();
        match key.as_str() {
            "unavailable" | "notavailable" | "timeoff" | "blackout" => RequestKind::Unavailable,
            "exclusivelyavailable" | "onlyavailable" | "availableonly" | "exclusive" => {
                RequestKind::ExclusivelyAvailable
            }
            _ => RequestKind::Unknown(cell.trim().to_string()),
        }
    }
}

/// Review status of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RequestStatus {
    /// Submitted, awaiting review.
    #[default]
    Pending,
    /// Accepted by a reviewer.
    Approved,
    /// Declined by a reviewer.
    Rejected,
}

impl RequestStatus {
    /// Parses a status cell. Blank or unrecognized → `Pending`.
    pub fn parse(cell: &str) -> Self {
        match cell.trim().to_lowercase().as_str() {
            "approved" | "accepted" => RequestStatus::Approved,
            "rejected" | "denied" | "declined" => RequestStatus::Rejected,
            _ => RequestStatus::Pending,
        }
    }
}

/// One (date, day-part) item in a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeOffEntry {
    /// When the entry falls. Date-only input is midnight.
    pub at: NaiveDateTime,
    /// Which instance of the day the entry covers.
    pub day_part: DayPart,
}

impl TimeOffEntry {
    /// Creates an entry.
    pub fn new(at: NaiveDateTime, day_part: DayPart) -> Self {
        Self { at, day_part }
    }

    /// Creates an entry at midnight of `date`.
    pub fn on(date: NaiveDate, day_part: DayPart) -> Self {
        Self::new(date.and_time(chrono::NaiveTime::MIN), day_part)
    }

    /// Calendar date of the entry.
    pub fn date(&self) -> NaiveDate {
        self.at.date()
    }
}

/// A time-off request as submitted by a volunteer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeOffRequest {
    /// Row reference or submission identifier.
    pub id: String,
    /// Name typed by the submitter.
    pub volunteer_name: String,
    /// Email typed by the submitter.
    pub email: String,
    /// What the dates mean.
    pub kind: RequestKind,
    /// Review status.
    pub status: RequestStatus,
    /// Submission instant.
    pub submitted_at: DateTime<Utc>,
    /// Declared first day of the range, if the form has one.
    pub start_date: Option<NaiveDate>,
    /// Declared last day of the range, if the form has one.
    pub end_date: Option<NaiveDate>,
    /// Individual (date, day-part) items.
    pub entries: Vec<TimeOffEntry>,
}

impl TimeOffRequest {
    /// Creates a pending request with no dates.
    pub fn new(
        id: impl Into<String>,
        volunteer_name: impl Into<String>,
        kind: RequestKind,
        submitted_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            volunteer_name: volunteer_name.into(),
            email: String::new(),
            kind,
            status: RequestStatus::Pending,
            submitted_at,
            start_date: None,
            end_date: None,
            entries: Vec::new(),
        }
    }

    /// Sets the email.
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = email.into();
        self
    }

    /// Sets the review status.
    pub fn with_status(mut self, status: RequestStatus) -> Self {
        self.status = status;
        self
    }

    /// Marks the request approved.
    pub fn approved(self) -> Self {
        self.with_status(RequestStatus::Approved)
    }

    /// Sets the declared range.
    pub fn with_range(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.start_date = Some(start);
        self.end_date = Some(end);
        self
    }

    /// Adds an entry.
    pub fn with_entry(mut self, entry: TimeOffEntry) -> Self {
        self.entries.push(entry);
        self
    }

    /// Adds an entry at midnight of `date`.
    pub fn with_date(self, date: NaiveDate, day_part: DayPart) -> Self {
        self.with_entry(TimeOffEntry::on(date, day_part))
    }

    /// Whether the request constrains assignment.
    pub fn is_approved(&self) -> bool {
        self.status == RequestStatus::Approved
    }

    /// Range covered by the request.
    ///
    /// The declared start/end when both are present (possibly inverted),
    /// otherwise the earliest and latest entry dates. `None` when the
    /// request has neither.
    pub fn span(&self) -> Option<DateRange> {
        if let (Some(start), Some(end)) = (self.start_date, self.end_date) {
            return Some(DateRange::new(start, end));
        }
        let first = self.entries.iter().map(TimeOffEntry::date).min()?;
        let last = self.entries.iter().map(TimeOffEntry::date).max()?;
        Some(DateRange::new(first, last))
    }
}
