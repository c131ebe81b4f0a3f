//! In-memory row store.

use std::collections::BTreeMap;

use super::{AssignmentWrite, RowStore, SlotRow, TimeOffRow, VolunteerRow};
use crate::error::{Error, Result};

/// A [`RowStore`] held in memory.
///
/// Tables start absent; the `with_*` builders create them. Writes are
/// applied to the stored slot rows and also kept as a log of batches.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    volunteers: Option<Vec<VolunteerRow>>,
    time_off: Option<Vec<TimeOffRow>>,
    slots: BTreeMap<(i32, u32), Vec<SlotRow>>,
    batches: Vec<Vec<AssignmentWrite>>,
}

impl MemoryStore {
    /// Creates a store with no tables.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the volunteers table.
    pub fn with_volunteers(mut self, rows: Vec<VolunteerRow>) -> Self {
        self.volunteers = Some(rows);
        self
    }

    /// Sets the time-off table.
    pub fn with_time_off(mut self, rows: Vec<TimeOffRow>) -> Self {
        self.time_off = Some(rows);
        self
    }

    /// Sets the role-slot table for a month.
    pub fn with_slots(mut self, year: i32, month: u32, rows: Vec<SlotRow>) -> Self {
        self.slots.insert((year, month), rows);
        self
    }

    /// Current slot rows for a month.
    pub fn slots(&self, year: i32, month: u32) -> Option<&[SlotRow]> {
        self.slots.get(&(year, month)).map(Vec::as_slice)
    }

    /// Every write received, in order.
    pub fn written(&self) -> Vec<&AssignmentWrite> {
        self.batches.iter().flatten().collect()
    }

    /// Number of write batches received.
    pub fn write_batches(&self) -> usize {
        self.batches.len()
    }
}

impl RowStore for MemoryStore {
    fn read_volunteers(&self) -> Result<Option<Vec<VolunteerRow>>> {
        Ok(self.volunteers.clone())
    }

    fn read_time_off(&self) -> Result<Option<Vec<TimeOffRow>>> {
        Ok(self.time_off.clone())
    }

    fn read_role_slots(&self, year: i32, month: u32) -> Result<Option<Vec<SlotRow>>> {
        Ok(self.slots.get(&(year, month)).cloned())
    }

    fn write_assignments(&mut self, writes: &[AssignmentWrite]) -> Result<()> {
        // All or nothing: refuse the batch before touching any row.
        if let Some(unknown) = writes.iter().find(|w| {
            !self
                .slots
                .values()
                .flatten()
                .any(|row| row.row_ref.trim() == w.row_ref)
        }) {
            return Err(Error::Store(format!("no slot row '{}'", unknown.row_ref)));
        }

        for write in writes {
            let Some(row) = self
                .slots
                .values_mut()
                .flatten()
                .find(|row| row.row_ref.trim() == write.row_ref)
            else {
                continue;
            };
            row.volunteer_id = write.volunteer_id.clone();
            row.volunteer_name = write.volunteer_name.clone();
            row.status = write.status.as_str().to_string();
        }
        self.batches.push(writes.to_vec());
        Ok(())
    }
}
