//! Problem configuration.
//!
//! The horizon, roster size and rule thresholds are fixed inputs supplied
//! once at construction and shared immutably by every component. They can
//! be built in code or loaded from TOML.
//!
//! # Examples
//!
//! ```
//! use u_roster::config::RosterConfig;
//!
//! let config = RosterConfig::from_toml_str(r#"
//!     days = 14
//!     staff = 8
//!
//!     [constraints]
//!     max_total_shifts = 10
//!     max_night_shifts = 4
//! "#).unwrap();
//!
//! assert_eq!(config.days, 14);
//! assert_eq!(config.constraints.max_night_shifts, 4);
//! // Unset thresholds keep their defaults.
//! assert_eq!(config.constraints.max_consecutive_working_days, 3);
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::models::{ConstraintSet, ShiftKind};

/// Immutable problem configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RosterConfig {
    /// Horizon length in days.
    pub days: usize,
    /// Number of staff (ids `0..staff`).
    pub staff: usize,
    /// Rule thresholds.
    pub constraints: ConstraintSet,
}

impl Default for RosterConfig {
    fn default() -> Self {
        Self {
            days: 7,
            staff: 5,
            constraints: ConstraintSet::default(),
        }
    }
}

impl RosterConfig {
    /// Creates a configuration with default thresholds.
    pub fn new(days: usize, staff: usize) -> Self {
        Self {
            days,
            staff,
            constraints: ConstraintSet::default(),
        }
    }

    /// Replaces the rule thresholds.
    pub fn with_constraints(mut self, constraints: ConstraintSet) -> Self {
        self.constraints = constraints;
        self
    }

    /// Loads and validates configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns error if the file can't be read, contains invalid TOML, or
    /// describes an empty problem.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_toml_file(path)
    }

    /// Loads and validates configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parses and validates configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects configurations no schedule can be built for.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.days == 0 {
            return Err(ConfigError::Invalid("days must be positive".into()));
        }
        if self.staff == 0 {
            return Err(ConfigError::Invalid("staff must be positive".into()));
        }
        Ok(())
    }

    /// Number of shift slots over the horizon.
    #[inline]
    pub fn slot_count(&self) -> usize {
        self.days * ShiftKind::COUNT
    }
}
