//! Error types for ministry-schedule.
//!
//! Only structural problems surface as errors. Per-row data-quality issues
//! (malformed dates, unknown names, unrecognized request types) are logged
//! and counted by the component that meets them, never returned.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type.
#[derive(Error, Debug)]
pub enum Error {
    /// A backing table required for the run is absent.
    #[error("Required table '{table}' is missing for {year}-{month:02}")]
    MissingTable {
        table: &'static str,
        year: i32,
        month: u32,
    },

    /// The year cannot be represented on the Gregorian calendar.
    #[error("Year {0} is outside the supported calendar range")]
    InvalidYear(i32),

    /// The month number is not in 1..=12.
    #[error("Month {0} is not a calendar month")]
    InvalidMonth(u32),

    /// Failed to load or parse configuration.
    #[error("Failed to load configuration from {path}: {message}")]
    Config { path: PathBuf, message: String },

    /// Configuration text is not valid TOML for [`EngineConfig`](crate::config::EngineConfig).
    #[error("Failed to parse configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// The row store refused a read or write.
    #[error("Row store error: {0}")]
    Store(String),
}

/// Result type alias for [`Error`].
pub type Result<T, E = Error> = std::result::Result<T, E>;
