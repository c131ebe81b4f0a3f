//! Role-slot model.
//!
//! A role-slot is one fillable unit of a monthly schedule: a date, a
//! day-part, a ministry, and the specific role within it (e.g., "Lector",
//! "First Reading"). Slots are produced by schedule generation, filled by
//! the resolver, and persisted back through the row store.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::DayPart;

/// A slot to fill.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleSlot {
    /// Row reference in the store.
    pub id: String,
    /// Mass date.
    pub date: NaiveDate,
    /// Vigil or daytime mass.
    pub day_part: DayPart,
    /// Ministry name (e.g., "Lector", "Altar Server").
    pub ministry: String,
    /// Specific role within the ministry (e.g., "First Reading").
    pub role: String,
    /// Volunteer already attached (group or recurring assignment).
    pub volunteer: Option<SlotVolunteer>,
    /// Assignment status.
    pub status: SlotStatus,
}

/// A volunteer reference stored on a slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotVolunteer {
    /// Volunteer identifier.
    pub id: String,
    /// Volunteer display name.
    pub name: String,
}

/// Slot assignment status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SlotStatus {
    /// Nobody attached yet.
    #[default]
    Unassigned,
    /// A volunteer is attached.
    Assigned,
}

impl SlotStatus {
    /// Store cell value.
    pub fn as_str(&self) -> &'static str {
        match self {
            SlotStatus::Unassigned => "Unassigned",
            SlotStatus::Assigned => "Assigned",
        }
    }
}

impl SlotVolunteer {
    /// Creates a volunteer reference.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

impl RoleSlot {
    /// Creates an unassigned slot whose role equals its ministry.
    pub fn new(
        id: impl Into<String>,
        date: NaiveDate,
        day_part: DayPart,
        ministry: impl Into<String>,
    ) -> Self {
        let ministry = ministry.into();
        Self {
            id: id.into(),
            date,
            day_part,
            role: ministry.clone(),
            ministry,
            volunteer: None,
            status: SlotStatus::Unassigned,
        }
    }

    /// Sets the specific role.
    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = role.into();
        self
    }

    /// Attaches a volunteer ahead of resolution.
    pub fn with_volunteer(mut self, id: impl Into<String>, name: impl Into<String>) -> Self {
        self.volunteer = Some(SlotVolunteer::new(id, name));
        self.status = SlotStatus::Assigned;
        self
    }

    /// Whether the slot arrived with a volunteer attached.
    pub fn is_preassigned(&self) -> bool {
        self.volunteer.is_some()
    }
}
