//! Row store boundary and the month run.
//!
//! The engine reads from and writes to an external tabular store (a
//! spreadsheet or anything shaped like one) through [`RowStore`]. A run
//! reads every table it needs once, into a [`RunContext`], computes, and
//! writes all changed slots back in a single batch.
//!
//! # Tables
//!
//! | Table | Required | Absent |
//! |-------|----------|--------|
//! | Volunteers | yes | [`Error::MissingTable`](crate::error::Error::MissingTable) |
//! | Role-slots for the month | yes | [`Error::MissingTable`](crate::error::Error::MissingTable) |
//! | Time-off requests | no | warning, treated as empty |

mod context;
mod memory;
mod rows;

pub use context::{run_month, LoadStats, MonthReport, RunContext};
pub use memory::MemoryStore;
pub use rows::{SlotRow, TimeOffRow, VolunteerRow, MAX_EXPANDED_RANGE_DAYS};

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::{SlotDecision, SlotStatus};

/// Table names used in errors and logs.
pub mod tables {
    /// Volunteer roster.
    pub const VOLUNTEERS: &str = "Volunteers";
    /// Time-off requests.
    pub const TIME_OFF: &str = "TimeOffRequests";
    /// Role-slots / assignments.
    pub const ROLE_SLOTS: &str = "Assignments";
}

/// One slot update to persist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentWrite {
    /// Slot row reference.
    pub row_ref: String,
    /// Assigned volunteer id.
    pub volunteer_id: String,
    /// Assigned volunteer name.
    pub volunteer_name: String,
    /// New status.
    pub status: SlotStatus,
}

impl AssignmentWrite {
    /// Write for a resolver decision, if the decision changed its slot.
    ///
    /// Only slots the resolver filled are changes; preassigned and open
    /// slots are left as they are in the store.
    pub fn from_decision(decision: &SlotDecision) -> Option<Self> {
        match &decision.outcome {
            crate::models::SlotOutcome::Assigned(v) => Some(Self {
                row_ref: decision.slot_id.clone(),
                volunteer_id: v.id.clone(),
                volunteer_name: v.name.clone(),
                status: decision.outcome.status(),
            }),
            _ => None,
        }
    }
}

/// Tabular store the engine reads from and writes to.
///
/// Readers return `Ok(None)` when the table does not exist and `Err` only
/// when the store itself fails. Rows come back in table order.
pub trait RowStore {
    /// Reads the volunteer roster.
    fn read_volunteers(&self) -> Result<Option<Vec<VolunteerRow>>>;

    /// Reads all time-off requests.
    fn read_time_off(&self) -> Result<Option<Vec<TimeOffRow>>>;

    /// Reads the role-slots generated for a month.
    fn read_role_slots(&self, year: i32, month: u32) -> Result<Option<Vec<SlotRow>>>;

    /// Persists slot updates as one batch.
    fn write_assignments(&mut self, writes: &[AssignmentWrite]) -> Result<()>;
}
