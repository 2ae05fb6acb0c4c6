//! Configuration loader for the executor
//!
//! Handles loading deployment configuration from TOML files and merging with
//! defaults. The fields here are the knobs an operator actually turns per
//! deployment: channel endpoint, per-console timing slack, and detection
//! policy.

use super::defaults::default_config;
use crate::core::types::{ConsoleLanguage, DetectionMode};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Configuration error type
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_connection")]
    pub connection: ConnectionConfig,

    #[serde(default = "default_timings")]
    pub timings: TimingConfig,

    #[serde(default = "default_console")]
    pub console: ConsoleConfig,

    #[serde(default = "default_logging")]
    pub logging: LoggingConfig,
}

/// Debug-channel endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectionConfig {
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Per-deployment timing additions in milliseconds.
///
/// Every value is slack added on top of the baseline macro waits; slower
/// consoles and SD cards need more. `avoid_system_update` inserts the
/// directional press that skips a pending system-update prompt during launch.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TimingConfig {
    #[serde(default)]
    pub extra_time_load_profile: u64,
    #[serde(default)]
    pub extra_time_check_dlc: u64,
    #[serde(default)]
    pub extra_time_load_game: u64,
    #[serde(default)]
    pub extra_time_return_home: u64,
    #[serde(default)]
    pub extra_time_close_game: u64,
    #[serde(default)]
    pub extra_time_reconnect: u64,
    #[serde(default)]
    pub avoid_system_update: bool,
}

/// Console-specific detection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsoleConfig {
    #[serde(default = "default_language")]
    pub language: ConsoleLanguage,
    #[serde(default)]
    pub screen_detection: DetectionMode,
    #[serde(default)]
    pub screen_off: bool,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

/// Configuration loader
pub struct ConfigLoader {
    config_path: PathBuf,
}

impl ConfigLoader {
    /// Creates a new configuration loader
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        ConfigLoader {
            config_path: path.as_ref().to_path_buf(),
        }
    }

    /// Loads configuration from file
    pub fn load(&self) -> Result<Config, ConfigError> {
        if !self.config_path.exists() {
            return Err(ConfigError::FileNotFound(
                self.config_path.display().to_string(),
            ));
        }

        let contents = fs::read_to_string(&self.config_path)?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Loads configuration or returns defaults if file doesn't exist
    pub fn load_or_default(&self) -> Config {
        self.load().unwrap_or_else(|_| Config::default())
    }

    /// Saves configuration to file
    pub fn save(&self, config: &Config) -> Result<(), ConfigError> {
        let contents = toml::to_string_pretty(config)?;
        fs::write(&self.config_path, contents)?;
        Ok(())
    }
}

/// Loads configuration from the default location
pub fn load_config() -> Result<Config, ConfigError> {
    let loader = ConfigLoader::new("config.toml");
    Ok(loader.load_or_default())
}

// Default functions for serde
fn default_connection() -> ConnectionConfig {
    let defaults = default_config();
    ConnectionConfig {
        host: defaults.connection.host,
        port: defaults.connection.port,
    }
}

fn default_timings() -> TimingConfig {
    let defaults = default_config().timings;
    TimingConfig {
        extra_time_load_profile: defaults.extra_time_load_profile,
        extra_time_check_dlc: defaults.extra_time_check_dlc,
        extra_time_load_game: defaults.extra_time_load_game,
        extra_time_return_home: defaults.extra_time_return_home,
        extra_time_close_game: defaults.extra_time_close_game,
        extra_time_reconnect: defaults.extra_time_reconnect,
        avoid_system_update: defaults.avoid_system_update,
    }
}

fn default_console() -> ConsoleConfig {
    let defaults = default_config().console;
    ConsoleConfig {
        language: defaults.language,
        screen_detection: defaults.screen_detection,
        screen_off: defaults.screen_off,
    }
}

fn default_logging() -> LoggingConfig {
    LoggingConfig {
        level: default_config().logging.level,
    }
}

fn default_port() -> u16 {
    default_config().connection.port
}

fn default_language() -> ConsoleLanguage {
    default_config().console.language
}

fn default_log_level() -> String {
    default_config().logging.level
}

impl Default for Config {
    fn default() -> Self {
        Config {
            connection: default_connection(),
            timings: default_timings(),
            console: default_console(),
            logging: default_logging(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.connection.port, 6000);
        assert_eq!(config.console.screen_detection, DetectionMode::Raw);
        assert_eq!(config.timings.extra_time_load_game, 0);
    }

    #[test]
    fn test_load_missing_file() {
        let loader = ConfigLoader::new("nonexistent.toml");
        let result = loader.load();
        assert!(result.is_err());
        assert!(matches!(result.unwrap_err(), ConfigError::FileNotFound(_)));
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("test.toml");

        let mut config = Config::default();
        config.timings.extra_time_load_game = 5000;
        let loader = ConfigLoader::new(&config_path);

        loader.save(&config).unwrap();
        assert!(config_path.exists());

        let loaded = loader.load().unwrap();
        assert_eq!(loaded.connection.host, config.connection.host);
        assert_eq!(loaded.timings.extra_time_load_game, 5000);
    }

    #[test]
    fn test_partial_config() {
        let toml_str = r#"
            [connection]
            host = "10.0.0.7"

            [console]
            language = "japanese"
            screen_detection = "console-language"
        "#;

        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.connection.host, "10.0.0.7");
        assert_eq!(config.connection.port, 6000);
        assert_eq!(config.console.language, ConsoleLanguage::Japanese);
        assert_eq!(config.console.screen_detection, DetectionMode::ConsoleLanguage);
        // Check defaults are applied
        assert_eq!(config.timings.extra_time_check_dlc, 0);
        assert_eq!(config.logging.level, "info");
    }
}
