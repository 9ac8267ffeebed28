//! Tracker configuration.
//!
//! A [`TrackerConfig`] names the fields to watch and how to treat fields that
//! show up on the current record without ever having been captured. It can be
//! built in code or parsed from TOML:
//!
//! ```
//! use fieldwatch_core::config::{TrackerConfig, UncapturedFieldPolicy};
//!
//! let config = TrackerConfig::from_toml_str(
//!     r#"
//!     fields = ["Name", "Age"]
//!     uncaptured_fields = "ignore"
//!     "#,
//! )
//! .unwrap();
//! assert_eq!(config.uncaptured_fields, UncapturedFieldPolicy::Ignore);
//! ```

use crate::errors::{ExError, Result, TrackerError};
use serde::{Deserialize, Serialize};

/// How a change report treats a tracked field that is present on the
/// current record but absent from the snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UncapturedFieldPolicy {
    /// Report the field with a `PriorValue::NotCaptured` marker
    #[default]
    Report,
    /// Leave the field out of the report
    Ignore,
}

/// Declarative tracker settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TrackerConfig {
    /// Field names to watch; duplicates collapse
    #[serde(default)]
    pub fields: Vec<String>,
    #[serde(default)]
    pub uncaptured_fields: UncapturedFieldPolicy,
}

impl TrackerConfig {
    pub fn new<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            fields: fields.into_iter().map(Into::into).collect(),
            uncaptured_fields: UncapturedFieldPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: UncapturedFieldPolicy) -> Self {
        self.uncaptured_fields = policy;
        self
    }

    /// Parse a config from TOML text.
    ///
    /// # Errors
    ///
    /// `InvalidConfig` when the text is not valid TOML or has unknown keys.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| {
            ExError::from(TrackerError::InvalidConfig {
                reason: e.to_string(),
            })
            .with_op("tracker_config_parse")
        })
    }
}
