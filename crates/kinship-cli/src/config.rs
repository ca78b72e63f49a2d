//! Configuration management for the CLI.

use crate::error::{CliError, Result};
use kinship_service::ServiceConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// CLI configuration.
///
/// ```toml
/// database = "/home/alice/.kinship/kinship.db"
///
/// [settings]
/// color = true
/// format = "table"
///
/// [service]
/// allow_self_relationship = false
/// reject_duplicates = true
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// SQLite database file
    #[serde(default = "default_database")]
    pub database: PathBuf,

    /// Global settings
    #[serde(default)]
    pub settings: Settings,

    /// Relationship rules
    #[serde(default)]
    pub service: ServiceConfig,
}

/// Global CLI settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Enable colored output
    #[serde(default = "default_true")]
    pub color: bool,

    /// Default output format
    #[serde(default = "default_format")]
    pub format: OutputFormat,
}

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Table format
    Table,
    /// JSON format
    Json,
    /// Quiet (IDs only) format
    Quiet,
}

impl Config {
    /// Directory holding the config file and the default database.
    pub fn dir() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| CliError::Config("Could not find home directory".into()))?;
        Ok(home.join(".kinship"))
    }

    /// Get the default configuration file path.
    pub fn path() -> Result<PathBuf> {
        Ok(Self::dir()?.join("config.toml"))
    }

    /// Load configuration from the default path, writing defaults on first run.
    pub fn load_or_create() -> Result<Self> {
        Self::load_or_create_at(&Self::path()?)
    }

    /// Load configuration from `path`, writing defaults there if it is absent.
    ///
    /// An existing file that fails to parse is an error and is left untouched.
    pub fn load_or_create_at(path: &Path) -> Result<Self> {
        if path.exists() {
            return Self::load_from(path);
        }

        let config = Self::default();
        config.save_to(path)?;
        Ok(config)
    }

    /// Load configuration from an explicit path, which must exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| {
            CliError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml(&contents)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Save configuration to the given path.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Create parent directory if it doesn't exist
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| CliError::Config(format!("Failed to serialize config: {}", e)))?;
        fs::write(path, contents)?;
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: default_database(),
            settings: Settings::default(),
            service: ServiceConfig::default(),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            color: true,
            format: OutputFormat::Table,
        }
    }
}

fn default_database() -> PathBuf {
    match Config::dir() {
        Ok(dir) => dir.join("kinship.db"),
        Err(_) => PathBuf::from("kinship.db"),
    }
}

fn default_true() -> bool {
    true
}

fn default_format() -> OutputFormat {
    OutputFormat::Table
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.settings.color);
        assert_eq!(config.settings.format, OutputFormat::Table);
        assert!(config.database.ends_with("kinship.db"));
        assert_eq!(config.service, ServiceConfig::default());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = Config::from_toml(
            r#"
            database = "/tmp/rel.db"

            [service]
            allow_self_relationship = true
            "#,
        )
        .unwrap();

        assert_eq!(config.database, PathBuf::from("/tmp/rel.db"));
        assert!(config.settings.color);
        assert!(config.service.allow_self_relationship);
        assert!(config.service.reject_duplicates);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.settings.format = OutputFormat::Json;
        config.service = ServiceConfig::permissive();
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.settings.format, OutputFormat::Json);
        assert_eq!(loaded.service, ServiceConfig::permissive());
    }

    #[test]
    fn test_first_run_writes_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".kinship").join("config.toml");

        let config = Config::load_or_create_at(&path).unwrap();
        assert!(path.exists());
        assert_eq!(config.service, ServiceConfig::default());

        let reloaded = Config::load_or_create_at(&path).unwrap();
        assert_eq!(reloaded.database, config.database);
    }

    #[test]
    fn test_malformed_config_is_rejected_and_kept() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let contents = "database = \"/srv/custom.db\"\n\n[service]\nallow_self_relationship = true\nreject_duplicates = \"no\"\n";
        std::fs::write(&path, contents).unwrap();

        let result = Config::load_or_create_at(&path);
        assert!(matches!(result, Err(CliError::Toml(_))));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), contents);
    }

    #[test]
    fn test_load_missing_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let result = Config::load_from(&dir.path().join("absent.toml"));
        assert!(matches!(result, Err(CliError::Config(_))));
    }
}
