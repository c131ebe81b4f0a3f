//! Built-in selection rules.
//!
//! # Score Convention
//! All rules return lower scores for preferred candidates.

use chrono::Datelike;

use super::{Candidate, CandidateRule, RuleScore, SelectionContext};

/// Fewest slots held this run.
///
/// Spreads the month's work across the roster.
#[derive(Debug, Clone, Copy)]
pub struct FewestAssignments;

impl CandidateRule for FewestAssignments {
    fn name(&self) -> &'static str {
        "FEWEST"
    }

    fn evaluate(&self, candidate: &Candidate<'_>, context: &SelectionContext) -> RuleScore {
        context.count(&candidate.volunteer.id) as f64
    }

    fn description(&self) -> &'static str {
        "Fewest Assignments This Run"
    }
}

/// Least recently assigned.
///
/// Volunteers with no slot yet score lowest; otherwise earlier last dates
/// are preferred.
#[derive(Debug, Clone, Copy)]
pub struct LeastRecentlyAssigned;

impl CandidateRule for LeastRecentlyAssigned {
    fn name(&self) -> &'static str {
        "LRA"
    }

    fn evaluate(&self, candidate: &Candidate<'_>, context: &SelectionContext) -> RuleScore {
        match context.last_date(&candidate.volunteer.id) {
            None => f64::MIN,
            Some(d) => f64::from(d.num_days_from_ce()),
        }
    }

    fn description(&self) -> &'static str {
        "Least Recently Assigned"
    }
}

/// Roster (input) order.
#[derive(Debug, Clone, Copy)]
pub struct RosterOrder;

impl CandidateRule for RosterOrder {
    fn name(&self) -> &'static str {
        "ROSTER"
    }

    fn evaluate(&self, candidate: &Candidate<'_>, _context: &SelectionContext) -> RuleScore {
        candidate.position as f64
    }

    fn description(&self) -> &'static str {
        "Roster Order"
    }
}
