//! Scheduling engine for parish liturgical ministries.
//!
//! Computes the moveable feasts that shape a month's masses, turns approved
//! time-off into per-volunteer date lookups, flags suspicious time-off
//! submissions, and fills a month's role-slots with qualified, available
//! volunteers.
//!
//! # Modules
//!
//! - **`liturgical`**: Feast dates from the computus, transfer flags,
//!   lectionary cycles
//! - **`time_off`**: Interval index of approved unavailable /
//!   exclusively-available dates for one month
//! - **`validation`**: Intake checks (probable duplicates, bad ranges,
//!   unknown names)
//! - **`dispatching`**: Candidate ranking rules and the rule engine
//! - **`scheduler`**: The greedy slot resolver and its KPIs
//! - **`store`**: Row store boundary, read-once run context, `run_month`
//! - **`models`**: Domain types: `Volunteer`, `TimeOffRequest`, `RoleSlot`,
//!   `SkillMap`, `AssignmentResult`
//! - **`config`**: TOML engine configuration
//!
//! # Architecture
//!
//! Every component is synchronous and owns no state between calls. A month
//! run reads all tables once, computes, and writes one batch back.
//!
//! # References
//!
//! - Meeus (1991), "Astronomical Algorithms", Ch. 8: Date of Easter
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems"

pub mod config;
pub mod dispatching;
pub mod error;
pub mod liturgical;
pub mod models;
pub mod scheduler;
pub mod store;
pub mod time_off;
pub mod validation;

pub use config::EngineConfig;
pub use error::{Error, Result};
pub use liturgical::{compute_liturgical_dates, Feast, LiturgicalConfig, LiturgicalDates};
pub use scheduler::Resolver;
pub use store::{run_month, MonthReport, RowStore};
pub use time_off::{build_time_off_index, TimeOffIndex};
pub use validation::{has_recent_overlap, validate_submissions};
