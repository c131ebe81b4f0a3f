//! Engine configuration.
//!
//! One TOML document configures a month run:
//!
//! ```toml
//! [liturgical]
//! transfer_ascension = true
//!
//! [intake]
//! overlap_window_days = 7
//! max_range_days = 60
//!
//! [resolver]
//! policy = "fewest_assignments"
//!
//! [skills]
//! "First Reading" = ["Lector"]
//! "Altar Server" = ["Altar Server", "Acolyte"]
//! ```
//!
//! Every table and key is optional; missing values take their defaults
//! (no transfers, 7-day window, 60-day ceiling, fewest-assignments policy,
//! empty skill map).

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::dispatching::SelectionPolicy;
use crate::error::{Error, Result};
use crate::liturgical::LiturgicalConfig;
use crate::models::SkillMap;
use crate::validation::IntakeConfig;

/// Resolver settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Tie-break among eligible candidates.
    pub policy: SelectionPolicy,
}

/// Top-level engine configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Feast transfer flags.
    pub liturgical: LiturgicalConfig,
    /// Intake check thresholds.
    pub intake: IntakeConfig,
    /// Resolver settings.
    pub resolver: ResolverConfig,
    /// Ministry/role → skill tags.
    pub skills: SkillMap,
}

impl EngineConfig {
    /// Parses configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigParse`] if the text is not valid TOML or does
    /// not match the expected shape.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Loads the configuration from a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let config: Self = toml::from_str(&content).map_err(|e| Error::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        tracing::debug!(path = %path.display(), skills = config.skills.len(), "configuration loaded");
        Ok(config)
    }

    /// Serializes the configuration as TOML.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if serialization fails.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| Error::Config {
            path: Path::new("<memory>").to_path_buf(),
            message: e.to_string(),
        })
    }
}
