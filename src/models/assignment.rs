//! Assignment result model.
//!
//! The resolver's output: one decision per input slot plus a summary of
//! filled and open slots. Decisions appear in slot input order so the
//! report is reproducible and can be persisted as one batch.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use super::{DayPart, SlotStatus, SlotVolunteer};

/// Outcome for a single slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotDecision {
    /// Slot row reference.
    pub slot_id: String,
    /// Slot date (denormalized for reporting).
    pub date: NaiveDate,
    /// Slot day-part.
    pub day_part: DayPart,
    /// Slot ministry.
    pub ministry: String,
    /// Slot role.
    pub role: String,
    /// What happened.
    pub outcome: SlotOutcome,
}

/// What the resolver did with a slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SlotOutcome {
    /// The resolver attached a volunteer.
    Assigned(SlotVolunteer),
    /// The slot arrived with a volunteer and was left alone.
    Preassigned(SlotVolunteer),
    /// No eligible volunteer was found.
    Unfilled(UnfilledReason),
}

/// Why a slot was left open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum UnfilledReason {
    /// No active volunteer with the skill was free for this mass.
    NoQualifiedVolunteer,
    /// Every qualified volunteer was excluded by approved time-off.
    AllUnavailable,
    /// The pool has no active volunteers at all.
    NoActiveVolunteers,
}

impl fmt::Display for UnfilledReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            UnfilledReason::NoQualifiedVolunteer => "NoQualifiedVolunteer",
            UnfilledReason::AllUnavailable => "AllUnavailable",
            UnfilledReason::NoActiveVolunteers => "NoActiveVolunteers",
        };
        f.write_str(s)
    }
}

/// Counts over a resolution run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolveSummary {
    /// Slots filled by this run.
    pub filled: usize,
    /// Slots that arrived already assigned.
    pub preassigned: usize,
    /// Slots left open.
    pub open: usize,
    /// Open slots grouped by reason.
    pub open_by_reason: BTreeMap<UnfilledReason, usize>,
}

/// Resolver output.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentResult {
    /// One decision per input slot, in input order.
    pub decisions: Vec<SlotDecision>,
    /// Aggregate counts.
    pub summary: ResolveSummary,
}

impl SlotOutcome {
    /// The volunteer attached after resolution, if any.
    pub fn volunteer(&self) -> Option<&SlotVolunteer> {
        match self {
            SlotOutcome::Assigned(v) | SlotOutcome::Preassigned(v) => Some(v),
            SlotOutcome::Unfilled(_) => None,
        }
    }

    /// Status to persist.
    pub fn status(&self) -> SlotStatus {
        match self {
            SlotOutcome::Assigned(_) | SlotOutcome::Preassigned(_) => SlotStatus::Assigned,
            SlotOutcome::Unfilled(_) => SlotStatus::Unassigned,
        }
    }
}

impl AssignmentResult {
    /// Creates an empty result.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a decision and updates the summary.
    pub fn record(&mut self, decision: SlotDecision) {
        match &decision.outcome {
            SlotOutcome::Assigned(_) => self.summary.filled += 1,
            SlotOutcome::Preassigned(_) => self.summary.preassigned += 1,
            SlotOutcome::Unfilled(reason) => {
                self.summary.open += 1;
                *self.summary.open_by_reason.entry(*reason).or_insert(0) += 1;
            }
        }
        self.decisions.push(decision);
    }

    /// Decision for a slot.
    pub fn decision_for(&self, slot_id: &str) -> Option<&SlotDecision> {
        self.decisions.iter().find(|d| d.slot_id == slot_id)
    }

    /// Decisions the resolver filled (excludes preassigned).
    pub fn newly_assigned(&self) -> impl Iterator<Item = &SlotDecision> {
        self.decisions
            .iter()
            .filter(|d| matches!(d.outcome, SlotOutcome::Assigned(_)))
    }

    /// Slots the resolver filled with a given volunteer.
    pub fn assignments_for_volunteer(&self, volunteer_id: &str) -> Vec<&SlotDecision> {
        self.newly_assigned()
            .filter(|d| d.outcome.volunteer().is_some_and(|v| v.id == volunteer_id))
            .collect()
    }

    /// Open slot count for a reason.
    pub fn open_count(&self, reason: UnfilledReason) -> usize {
        self.summary.open_by_reason.get(&reason).copied().unwrap_or(0)
    }
}
