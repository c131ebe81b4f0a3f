//! Candidate selection rules.
//!
//! Once the resolver has filtered a slot's candidates down to the eligible
//! ones, a [`RuleEngine`] orders them and the first wins. Rules compose
//! sequentially (primary rule, then tie-breakers) and the engine always ends
//! in a total tie-break, so the winner is a pure function of the inputs.
//!
//! # Usage
//!
//! ```
//! use ministry_schedule::dispatching::{RuleEngine, TieBreaker};
//! use ministry_schedule::dispatching::rules;
//!
//! let engine = RuleEngine::new()
//!     .with_rule(rules::FewestAssignments)
//!     .with_tie_breaker(rules::LeastRecentlyAssigned)
//!     .with_final_tie_breaker(TieBreaker::RosterOrder);
//! ```

mod context;
mod engine;
pub mod rules;

pub use context::SelectionContext;
pub use engine::{EvaluationMode, RuleEngine, SelectionPolicy, TieBreaker};

use crate::models::Volunteer;
use std::fmt::Debug;

/// Score returned by a selection rule.
///
/// Lower scores = preferred.
pub type RuleScore = f64;

/// An eligible volunteer under consideration for one slot.
#[derive(Debug, Clone, Copy)]
pub struct Candidate<'a> {
    /// Position in the roster (input order).
    pub position: usize,
    /// The volunteer.
    pub volunteer: &'a Volunteer,
}

/// A rule that ranks candidates.
///
/// # Score Convention
/// **Lower score = preferred.**
pub trait CandidateRule: Send + Sync + Debug {
    /// Rule name (e.g., "FEWEST").
    fn name(&self) -> &'static str;

    /// Scores a candidate given the run's assignment state.
    fn evaluate(&self, candidate: &Candidate<'_>, context: &SelectionContext) -> RuleScore;

    /// Rule description.
    fn description(&self) -> &'static str {
        self.name()
    }
}
