use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::logging::LogConfig;

/// Session used for fatigue detection when none is given
pub const DEFAULT_SESSION_ID: &str = "session_001";

/// Main application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Application metadata
    pub metadata: ConfigMetadata,

    /// Logging settings
    #[serde(default)]
    pub logging: LogConfig,

    /// Upstream data location
    #[serde(default)]
    pub data: DataSettings,

    /// Terminal display preferences
    #[serde(default)]
    pub display: DisplaySettings,
}

/// Configuration metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigMetadata {
    /// Configuration format version
    pub version: String,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last modification timestamp
    pub updated_at: DateTime<Utc>,
}

/// Location of the JSON data files read by the file-backed services
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataSettings {
    /// Directory holding players.json, metrics.json and predictions.json
    pub data_dir: PathBuf,
}

/// Terminal display preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplaySettings {
    /// Colorize severity classes
    pub color: bool,

    /// Session identifier used for fatigue detection
    pub default_session_id: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        let now = Utc::now();
        Self {
            metadata: ConfigMetadata {
                version: env!("CARGO_PKG_VERSION").to_string(),
                created_at: now,
                updated_at: now,
            },
            logging: LogConfig::default(),
            data: DataSettings::default(),
            display: DisplaySettings::default(),
        }
    }
}

impl Default for DataSettings {
    fn default() -> Self {
        Self {
            data_dir: AppConfig::config_dir().join("data"),
        }
    }
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            color: true,
            default_session_id: DEFAULT_SESSION_ID.to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: AppConfig =
            toml::from_str(&content).with_context(|| "Failed to parse TOML configuration")?;

        Ok(config)
    }

    /// Save configuration to TOML file
    pub fn save_to_file<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        self.metadata.updated_at = Utc::now();

        if let Some(parent) = path.as_ref().parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml_content = toml::to_string_pretty(self)
            .with_context(|| "Failed to serialize configuration to TOML")?;

        fs::write(&path, toml_content)
            .with_context(|| format!("Failed to write config file: {}", path.as_ref().display()))?;

        Ok(())
    }

    /// Directory holding the configuration and default data directory
    pub fn config_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".squadpulse")
    }

    /// Get default configuration file path
    pub fn default_config_path() -> PathBuf {
        Self::config_dir().join("config.toml")
    }

    /// Load configuration with fallback to defaults
    pub fn load_or_default() -> Self {
        let config_path = Self::default_config_path();

        match Self::load_from_file(&config_path) {
            Ok(config) => config,
            Err(e) => {
                tracing::debug!(
                    path = %config_path.display(),
                    error = %e,
                    "Config file not loaded, using defaults"
                );
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::{LogFormat, LogLevel};
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.display.default_session_id, "session_001");
        assert!(config.display.color);
        assert_eq!(config.logging.level, LogLevel::Warn);
        assert!(config.data.data_dir.ends_with("data"));
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = AppConfig::default();
        config.logging.format = LogFormat::Json;
        config.data.data_dir = PathBuf::from("/srv/squad");
        config.save_to_file(&path).unwrap();

        let loaded = AppConfig::load_from_file(&path).unwrap();
        assert_eq!(loaded.logging.format, LogFormat::Json);
        assert_eq!(loaded.data.data_dir, PathBuf::from("/srv/squad"));
    }

    #[test]
    fn test_partial_config_uses_section_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            r#"
[metadata]
version = "0.1.0"
created_at = "2024-05-01T10:00:00Z"
updated_at = "2024-05-01T10:00:00Z"

[display]
color = false
"#,
        )
        .unwrap();

        let config = AppConfig::load_from_file(&path).unwrap();
        assert!(!config.display.color);
        assert_eq!(config.display.default_session_id, DEFAULT_SESSION_ID);
        assert_eq!(config.logging, LogConfig::default());
    }

    #[test]
    fn test_missing_file_is_error() {
        let dir = tempdir().unwrap();
        assert!(AppConfig::load_from_file(dir.path().join("absent.toml")).is_err());
    }
}
