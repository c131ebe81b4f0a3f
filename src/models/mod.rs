//! Scheduling domain models.
//!
//! Typed records for the parish roster, time-off requests, and the monthly
//! role-slots, plus the calendar primitives they share. Records arrive from
//! the row store already converted (see [`crate::store`]); nothing here reads
//! loosely typed cells except the explicit `parse` helpers.
//!
//! # Domain Mappings
//!
//! | ministry-schedule | Scheduling term |
//! |-------------------|-----------------|
//! | Volunteer | Resource (human) |
//! | RoleSlot | Activity |
//! | SkillMap | Skill requirement |
//! | TimeOffRequest | Blocked period / availability window |
//! | AssignmentResult | Schedule |

mod assignment;
mod calendar;
mod skill_map;
mod slot;
mod time_off;
mod volunteer;

pub use assignment::{AssignmentResult, ResolveSummary, SlotDecision, SlotOutcome, UnfilledReason};
pub use calendar::{midday, parse_date, parse_date_time, DateRange, MonthWindow};
pub use skill_map::SkillMap;
pub use slot::{RoleSlot, SlotStatus, SlotVolunteer};
pub use time_off::{DayPart, RequestKind, RequestStatus, TimeOffEntry, TimeOffRequest};
pub use volunteer::{same_person, Volunteer, VolunteerPool, VolunteerStatus};
