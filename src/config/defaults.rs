//! Default configuration values for the executor

use crate::core::types::{ConsoleLanguage, DetectionMode};
use serde::{Deserialize, Serialize};

/// Default configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigDefaults {
    pub connection: ConnectionDefaults,
    pub timings: TimingDefaults,
    pub console: ConsoleDefaults,
    pub logging: LoggingDefaults,
}

/// Default connection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectionDefaults {
    pub host: String,
    pub port: u16,
}

/// Default per-deployment timing additions, in milliseconds
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimingDefaults {
    pub extra_time_load_profile: u64,
    pub extra_time_check_dlc: u64,
    pub extra_time_load_game: u64,
    pub extra_time_return_home: u64,
    pub extra_time_close_game: u64,
    pub extra_time_reconnect: u64,
    pub avoid_system_update: bool,
}

/// Default console configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsoleDefaults {
    pub language: ConsoleLanguage,
    pub screen_detection: DetectionMode,
    pub screen_off: bool,
}

/// Default logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingDefaults {
    pub level: String,
}

/// Returns the default configuration
pub fn default_config() -> ConfigDefaults {
    ConfigDefaults {
        connection: ConnectionDefaults {
            host: "192.168.1.100".to_string(),
            port: 6000,
        },
        timings: TimingDefaults {
            extra_time_load_profile: 0,
            extra_time_check_dlc: 0,
            extra_time_load_game: 0,
            extra_time_return_home: 0,
            extra_time_close_game: 0,
            extra_time_reconnect: 0,
            avoid_system_update: false,
        },
        console: ConsoleDefaults {
            language: ConsoleLanguage::English,
            screen_detection: DetectionMode::Raw,
            screen_off: false,
        },
        logging: LoggingDefaults {
            level: "info".to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = default_config();
        assert_eq!(config.connection.port, 6000);
        assert_eq!(config.console.language, ConsoleLanguage::English);
        assert_eq!(config.console.screen_detection, DetectionMode::Raw);
        assert!(!config.timings.avoid_system_update);
    }

    #[test]
    fn test_timing_defaults_are_zero() {
        let timings = default_config().timings;
        assert_eq!(timings.extra_time_load_profile, 0);
        assert_eq!(timings.extra_time_load_game, 0);
        assert_eq!(timings.extra_time_close_game, 0);
    }

    #[test]
    fn test_serialization() {
        let config = default_config();
        let serialized = toml::to_string(&config).unwrap();
        assert!(serialized.contains("host"));
        assert!(serialized.contains("screen_detection"));

        let deserialized: ConfigDefaults = toml::from_str(&serialized).unwrap();
        assert_eq!(deserialized.connection.host, config.connection.host);
        assert_eq!(deserialized.console.language, config.console.language);
    }
}
