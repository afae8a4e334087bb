//! core::config::schema
//!
//! Configuration file format.
//!
//! # Location
//!
//! Searched in order:
//! 1. `$HIVEWORK_CONFIG` if set
//! 2. `$XDG_CONFIG_HOME/hivework/config.toml`
//! 3. `~/.hivework/config.toml` (canonical write location)
//!
//! # Validation
//!
//! Values are validated after parsing: the default hive must be a valid hive
//! name and the log level one that `tracing` understands.

use serde::{Deserialize, Serialize};

use super::ConfigError;
use crate::core::types::HiveName;

/// Log levels accepted in `log_level`.
pub const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error", "off"];

/// Hivework configuration file.
///
/// # Example
///
/// ```toml
/// data_dir = "/var/lib/hivework"
/// default_hive = "main"
/// creator = "harbinger-node-1"
/// log_level = "info"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct HiveworkConfig {
    /// Directory holding `<name>.hive` files
    pub data_dir: Option<String>,

    /// Hive opened when none is named
    pub default_hive: Option<String>,

    /// Signature written into hive headers
    pub creator: Option<String>,

    /// Default tracing filter level
    pub log_level: Option<String>,
}

impl HiveworkConfig {
    /// Validate the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(dir) = &self.data_dir {
            if dir.trim().is_empty() {
                return Err(ConfigError::InvalidValue(
                    "data_dir cannot be empty".to_string(),
                ));
            }
        }

        if let Some(hive) = &self.default_hive {
            HiveName::new(hive.as_str()).map_err(|e| {
                ConfigError::InvalidValue(format!("invalid default_hive: {}", e))
            })?;
        }

        if let Some(creator) = &self.creator {
            if creator.is_empty() {
                return Err(ConfigError::InvalidValue(
                    "creator cannot be empty".to_string(),
                ));
            }
        }

        if let Some(level) = &self.log_level {
            if !LOG_LEVELS.contains(&level.to_ascii_lowercase().as_str()) {
                return Err(ConfigError::InvalidValue(format!(
                    "invalid log_level '{}', must be one of: {}",
                    level,
                    LOG_LEVELS.join(", ")
                )));
            }
        }

        Ok(())
    }
}
