//! Configuration for relationship rules
//!
//! Loaded from TOML, either standalone or as the `[service]` table of a
//! larger config file.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Configuration loading error
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Failed to parse TOML
    #[error("Failed to parse config TOML: {0}")]
    TomlParse(#[from] toml::de::Error),
}

/// Rules applied when proposing relationships
///
/// # Examples
///
/// ```
/// use kinship_service::ServiceConfig;
///
/// let config = ServiceConfig::default();
/// assert!(!config.allow_self_relationship);
/// assert!(config.reject_duplicates);
///
/// let config = ServiceConfig::permissive();
/// assert!(config.allow_self_relationship);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Allow a user to propose a relationship to themselves
    /// Default: false
    #[serde(default)]
    pub allow_self_relationship: bool,

    /// Reject a proposal when the same requester already proposed the same
    /// type to the same target
    /// Default: true
    #[serde(default = "default_reject_duplicates")]
    pub reject_duplicates: bool,
}

fn default_reject_duplicates() -> bool {
    true
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            allow_self_relationship: false,
            reject_duplicates: true,
        }
    }
}

impl ServiceConfig {
    /// Only the foreign-key and required-field checks
    pub fn permissive() -> Self {
        Self {
            allow_self_relationship: true,
            reject_duplicates: false,
        }
    }

    /// Every check enabled
    pub fn strict() -> Self {
        Self::default()
    }

    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    /// Parse configuration from a TOML string
    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }
}
