//! Intake checks for time-off submissions.
//!
//! Flags probable duplicate submissions and suspicious ranges when requests
//! arrive. Every finding is advisory: it is attached to the request for a
//! reviewer and never blocks persistence. Detects:
//! - Recent overlapping submissions by the same person (name OR email)
//! - End date before start date
//! - Start date in the past
//! - Ranges longer than the configured ceiling
//! - Names missing from the volunteer roster

use chrono::{NaiveDate, TimeDelta};
use serde::{Deserialize, Serialize};

use crate::models::{same_person, TimeOffRequest, VolunteerPool};

/// Default look-back for duplicate detection (days).
pub const DEFAULT_OVERLAP_WINDOW_DAYS: i64 = 7;

/// Default longest acceptable request (days).
pub const DEFAULT_MAX_RANGE_DAYS: i64 = 60;

/// Intake thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntakeConfig {
    /// Two submissions this many days apart (or closer) are compared.
    pub overlap_window_days: i64,
    /// Requests spanning more days than this are flagged.
    pub max_range_days: i64,
}

impl Default for IntakeConfig {
    fn default() -> Self {
        Self {
            overlap_window_days: DEFAULT_OVERLAP_WINDOW_DAYS,
            max_range_days: DEFAULT_MAX_RANGE_DAYS,
        }
    }
}

/// An advisory finding on a submitted request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntakeWarning {
    /// The flagged request.
    pub request_id: String,
    /// Finding category.
    pub kind: WarningKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of intake findings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WarningKind {
    /// Overlaps a recent submission by the same person.
    ProbableDuplicate,
    /// Declared end precedes declared start.
    EndBeforeStart,
    /// Starts before today.
    StartInPast,
    /// Longer than the configured ceiling.
    RangeTooLong,
    /// Typed name is not on the roster.
    UnknownVolunteer,
}

impl IntakeWarning {
    fn new(request: &TimeOffRequest, kind: WarningKind, message: impl Into<String>) -> Self {
        Self {
            request_id: request.id.clone(),
            kind,
            message: message.into(),
        }
    }
}

/// Whether `new` overlaps a recent submission by the same person.
///
/// A prior request is recent when its submission time is within
/// `window_days` of the new request's submission time. Identity matches on
/// name or email. Date ranges overlap with inclusive bounds
/// (`new.start <= prior.end && new.end >= prior.start`). A history entry
/// with the same id as `new` is the request itself and is ignored.
pub fn has_recent_overlap(
    new: &TimeOffRequest,
    history: &[TimeOffRequest],
    window_days: i64,
) -> bool {
    find_recent_overlap(new, history.iter(), window_days).is_some()
}

fn find_recent_overlap<'a>(
    new: &TimeOffRequest,
    history: impl IntoIterator<Item = &'a TimeOffRequest>,
    window_days: i64,
) -> Option<&'a TimeOffRequest> {
    let span = new.span()?;
    let window = TimeDelta::days(window_days);

    history.into_iter().find(|prior| {
        prior.id != new.id
            && same_person(&prior.volunteer_name, &prior.email, &new.volunteer_name, &new.email)
            && (new.submitted_at - prior.submitted_at).abs() <= window
            && prior.span().is_some_and(|p| span.overlaps(&p))
    })
}

/// Checks a batch of new submissions.
///
/// Each request is compared against `history` and against the requests
/// before it in the batch. `today` is the current date with time dropped.
///
/// # Returns
/// All findings, grouped by request in input order.
pub fn validate_submissions(
    new_requests: &[TimeOffRequest],
    history: &[TimeOffRequest],
    roster: &VolunteerPool,
    today: NaiveDate,
    config: &IntakeConfig,
) -> Vec<IntakeWarning> {
    let mut warnings = Vec::new();

    for (i, request) in new_requests.iter().enumerate() {
        if let Some(span) = request.span() {
            if span.is_inverted() {
                warnings.push(IntakeWarning::new(
                    request,
                    WarningKind::EndBeforeStart,
                    format!("End date {} is before start date {}", span.end, span.start),
                ));
            } else if span.len_days() > config.max_range_days {
                warnings.push(IntakeWarning::new(
                    request,
                    WarningKind::RangeTooLong,
                    format!(
                        "Range covers {} days (limit {})",
                        span.len_days(),
                        config.max_range_days
                    ),
                ));
            }

            if span.start < today {
                warnings.push(IntakeWarning::new(
                    request,
                    WarningKind::StartInPast,
                    format!("Start date {} is in the past", span.start),
                ));
            }
        }

        if roster.by_name(&request.volunteer_name).is_none() {
            let hint = roster
                .by_email(&request.email)
                .map(|v| format!(" (email belongs to '{}')", v.name))
                .unwrap_or_default();
            warnings.push(IntakeWarning::new(
                request,
                WarningKind::UnknownVolunteer,
                format!(
                    "'{}' is not on the volunteer roster{hint}",
                    request.volunteer_name.trim()
                ),
            ));
        }

        let earlier = history.iter().chain(&new_requests[..i]);
        if let Some(prior) = find_recent_overlap(request, earlier, config.overlap_window_days) {
            warnings.push(IntakeWarning::new(
                request,
                WarningKind::ProbableDuplicate,
                format!(
                    "Overlaps request '{}' submitted {}",
                    prior.id,
                    prior.submitted_at.format("%Y-%m-%d")
                ),
            ));
        }
    }

    if !warnings.is_empty() {
        tracing::info!(
            requests = new_requests.len(),
            warnings = warnings.len(),
            "intake checks raised warnings"
        );
    }

    warnings
}
