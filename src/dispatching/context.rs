//! Assignment state passed to selection rules.

use chrono::NaiveDate;
use std::collections::HashMap;

/// Per-run assignment state.
///
/// Built fresh by each resolver run and updated as slots are filled.
/// Preassigned slots are recorded too, so group assignments count toward a
/// volunteer's load.
#[derive(Debug, Clone, Default)]
pub struct SelectionContext {
    /// Slots held this run per volunteer id.
    pub assignment_counts: HashMap<String, usize>,
    /// Most recent date each volunteer serves this run.
    pub last_assigned: HashMap<String, NaiveDate>,
}

impl SelectionContext {
    /// Creates an empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records that a volunteer holds a slot on `date`.
    pub fn record(&mut self, volunteer_id: &str, date: NaiveDate) {
        *self
            .assignment_counts
            .entry(volunteer_id.to_string())
            .or_insert(0) += 1;
        let last = self
            .last_assigned
            .entry(volunteer_id.to_string())
            .or_insert(date);
        if date > *last {
            *last = date;
        }
    }

    /// Slots held by a volunteer this run.
    pub fn count(&self, volunteer_id: &str) -> usize {
        self.assignment_counts.get(volunteer_id).copied().unwrap_or(0)
    }

    /// Latest date a volunteer serves this run.
    pub fn last_date(&self, volunteer_id: &str) -> Option<NaiveDate> {
        self.last_assigned.get(volunteer_id).copied()
    }

    /// Sets a starting load (e.g., carried over from earlier runs).
    pub fn with_count(mut self, volunteer_id: impl Into<String>, count: usize) -> Self {
        self.assignment_counts.insert(volunteer_id.into(), count);
        self
    }
}
