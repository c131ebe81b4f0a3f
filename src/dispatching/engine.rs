//! Rule engine for candidate selection.
//!
//! Composes selection rules with configurable evaluation modes and a final
//! total tie-break.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::sync::Arc;

use super::{rules, Candidate, CandidateRule, RuleScore, SelectionContext};

/// How multiple rules are combined.
#[derive(Debug, Clone, Default)]
pub enum EvaluationMode {
    /// Apply rules in sequence; use next rule only on ties.
    #[default]
    Sequential,
    /// Compute weighted sum of all rule scores.
    Weighted,
}

/// How ties are broken after all rules are exhausted.
///
/// Both variants are total orders, so selection is always deterministic.
#[derive(Debug, Clone, Default)]
pub enum TieBreaker {
    /// Earlier roster position first (default).
    #[default]
    RosterOrder,
    /// Volunteer id, lexicographic.
    ById,
}

/// Named selection policies exposed through configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionPolicy {
    /// Fewest slots this run, then least recently assigned, then roster order.
    #[default]
    FewestAssignments,
    /// Least recently assigned, then roster order.
    LeastRecentlyAssigned,
    /// Roster order only.
    RosterOrder,
}

impl SelectionPolicy {
    /// Builds the rule engine for this policy.
    pub fn engine(&self) -> RuleEngine {
        match self {
            SelectionPolicy::FewestAssignments => RuleEngine::new()
                .with_rule(rules::FewestAssignments)
                .with_tie_breaker(rules::LeastRecentlyAssigned),
            SelectionPolicy::LeastRecentlyAssigned => {
                RuleEngine::new().with_rule(rules::LeastRecentlyAssigned)
            }
            SelectionPolicy::RosterOrder => RuleEngine::new().with_rule(rules::RosterOrder),
        }
    }
}

#[derive(Clone)]
struct WeightedRule {
    rule: Arc<dyn CandidateRule>,
    weight: f64,
}

/// A composable rule engine for candidate ranking.
///
/// # Example
/// ```
/// use ministry_schedule::dispatching::RuleEngine;
/// use ministry_schedule::dispatching::rules;
///
/// let engine = RuleEngine::new()
///     .with_rule(rules::FewestAssignments)
///     .with_tie_breaker(rules::RosterOrder);
/// ```
#[derive(Clone)]
pub struct RuleEngine {
    rules: Vec<WeightedRule>,
    mode: EvaluationMode,
    tie_breaker: TieBreaker,
    epsilon: f64,
}

impl RuleEngine {
    /// Creates an empty rule engine (roster order only).
    pub fn new() -> Self {
        Self {
            rules: Vec::new(),
            mode: EvaluationMode::Sequential,
            tie_breaker: TieBreaker::RosterOrder,
            epsilon: 1e-9,
        }
    }

    /// Adds a primary rule (weight 1.0).
    pub fn with_rule<R: CandidateRule + 'static>(mut self, rule: R) -> Self {
        self.rules.push(WeightedRule {
            rule: Arc::new(rule),
            weight: 1.0,
        });
        self
    }

    /// Adds a weighted rule.
    pub fn with_weighted_rule<R: CandidateRule + 'static>(mut self, rule: R, weight: f64) -> Self {
        self.rules.push(WeightedRule {
            rule: Arc::new(rule),
            weight,
        });
        self
    }

    /// Adds a tie-breaking rule (weight 0.0, used only in Sequential mode).
    pub fn with_tie_breaker<R: CandidateRule + 'static>(mut self, rule: R) -> Self {
        self.rules.push(WeightedRule {
            rule: Arc::new(rule),
            weight: 0.0,
        });
        self
    }

    /// Sets the evaluation mode.
    pub fn with_mode(mut self, mode: EvaluationMode) -> Self {
        self.mode = mode;
        self
    }

    /// Sets the final tie-breaking strategy.
    pub fn with_final_tie_breaker(mut self, tie_breaker: TieBreaker) -> Self {
        self.tie_breaker = tie_breaker;
        self
    }

    /// Orders candidates, preferred first.
    ///
    /// Returns indices into `candidates`.
    pub fn sort_indices(&self, candidates: &[Candidate<'_>], context: &SelectionContext) -> Vec<usize> {
        // Scores are quantized to epsilon steps once per candidate so the
        // comparator is a total order.
        let keys: Vec<Vec<i64>> = candidates
            .iter()
            .map(|c| match &self.mode {
                EvaluationMode::Sequential => self
                    .rules
                    .iter()
                    .map(|wr| self.quantize(wr.rule.evaluate(c, context)))
                    .collect(),
                EvaluationMode::Weighted => vec![self.quantize(self.weighted_score(c, context))],
            })
            .collect();

        let mut indices: Vec<usize> = (0..candidates.len()).collect();
        indices.sort_by(|&a, &b| {
            keys[a]
                .cmp(&keys[b])
                .then_with(|| self.final_order(&candidates[a], &candidates[b]))
        });
        indices
    }

    /// Index of the preferred candidate.
    pub fn select_best(&self, candidates: &[Candidate<'_>], context: &SelectionContext) -> Option<usize> {
        self.sort_indices(candidates, context).first().copied()
    }

    /// Evaluates a single candidate and returns weighted scores from each rule.
    pub fn evaluate(&self, candidate: &Candidate<'_>, context: &SelectionContext) -> Vec<RuleScore> {
        self.rules
            .iter()
            .map(|wr| wr.rule.evaluate(candidate, context) * wr.weight)
            .collect()
    }

    /// Scores within the same epsilon step compare equal. NaN maps to 0.
    fn quantize(&self, score: RuleScore) -> i64 {
        (score / self.epsilon).round() as i64
    }

    fn final_order(&self, a: &Candidate<'_>, b: &Candidate<'_>) -> Ordering {
        match &self.tie_breaker {
            TieBreaker::RosterOrder => a.position.cmp(&b.position),
            TieBreaker::ById => a
                .volunteer
                .id
                .cmp(&b.volunteer.id)
                .then(a.position.cmp(&b.position)),
        }
    }

    fn weighted_score(&self, candidate: &Candidate<'_>, context: &SelectionContext) -> f64 {
        self.rules
            .iter()
            .map(|wr| wr.rule.evaluate(candidate, context) * wr.weight)
            .sum()
    }
}

impl Default for RuleEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for RuleEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuleEngine")
            .field(
                "rules",
                &self
                    .rules
                    .iter()
                    .map(|r| format!("{}(w={})", r.rule.name(), r.weight))
                    .collect::<Vec<_>>(),
            )
            .field("mode", &self.mode)
            .field("tie_breaker", &self.tie_breaker)
            .finish()
    }
}
