//! Resolution quality metrics (KPIs).
//!
//! Computes coverage and load-balance indicators from a completed
//! resolution run.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Fill Rate | (filled + preassigned) / slots |
//! | Open Slots | Slots left unassigned |
//! | Load by Volunteer | Slots held per volunteer (filled + preassigned) |
//! | Max / Min Load | Extremes over volunteers holding any slot |
//! | Load Spread | Max load - min load |
//!
//! # Reference
//! Pinedo (2016), "Scheduling", Ch. 1.2: Performance Measures

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::models::AssignmentResult;

/// Resolution performance indicators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolveKpi {
    /// Slots considered.
    pub slot_count: usize,
    /// Fraction of slots holding a volunteer after the run (0.0..1.0).
    pub fill_rate: f64,
    /// Slots left unassigned.
    pub open_slots: usize,
    /// Slots held per volunteer id.
    pub load_by_volunteer: BTreeMap<String, usize>,
    /// Largest load of any volunteer.
    pub max_load: usize,
    /// Smallest load among volunteers holding at least one slot.
    pub min_load: usize,
}

impl ResolveKpi {
    /// Computes KPIs from a resolution result.
    pub fn calculate(result: &AssignmentResult) -> Self {
        let mut load_by_volunteer: BTreeMap<String, usize> = BTreeMap::new();
        for decision in &result.decisions {
            if let Some(v) = decision.outcome.volunteer() {
                *load_by_volunteer.entry(v.id.clone()).or_insert(0) += 1;
            }
        }

        let slot_count = result.decisions.len();
        let held = result.summary.filled + result.summary.preassigned;
        let fill_rate = if slot_count == 0 {
            1.0
        } else {
            held as f64 / slot_count as f64
        };

        Self {
            slot_count,
            fill_rate,
            open_slots: result.summary.open,
            max_load: load_by_volunteer.values().copied().max().unwrap_or(0),
            min_load: load_by_volunteer.values().copied().min().unwrap_or(0),
            load_by_volunteer,
        }
    }

    /// Difference between the heaviest and lightest load.
    pub fn load_spread(&self) -> usize {
        self.max_load - self.min_load
    }

    /// Whether the run meets the given quality thresholds.
    pub fn meets_thresholds(&self, min_fill_rate: f64, max_load: usize) -> bool {
        self.fill_rate >= min_fill_rate && self.max_load <= max_load
    }
}
