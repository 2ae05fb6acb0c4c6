//! Configuration validator for the executor
//!
//! Validates configuration values to ensure they are within acceptable ranges
//! before a session starts; a bad value caught here is an operator fix, not a
//! mid-macro surprise.

use super::loader::{Config, ConfigError};

/// Largest accepted per-step timing addition. Anything beyond this is
/// almost certainly a units mistake (seconds typed where ms belong).
const MAX_EXTRA_TIME_MS: u64 = 60_000;

/// Configuration validator
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validates the entire configuration
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        Self::validate_connection(&config.connection)?;
        Self::validate_timings(&config.timings)?;
        Self::validate_logging(&config.logging)?;
        Ok(())
    }

    /// Validates connection configuration
    fn validate_connection(connection: &super::loader::ConnectionConfig) -> Result<(), ConfigError> {
        if connection.host.is_empty() {
            return Err(ConfigError::Invalid(
                "Channel host cannot be empty".to_string(),
            ));
        }

        if connection.port == 0 {
            return Err(ConfigError::Invalid("Channel port cannot be 0".to_string()));
        }

        Ok(())
    }

    /// Validates timing configuration
    fn validate_timings(timings: &super::loader::TimingConfig) -> Result<(), ConfigError> {
        let extras = [
            ("extra_time_load_profile", timings.extra_time_load_profile),
            ("extra_time_check_dlc", timings.extra_time_check_dlc),
            ("extra_time_load_game", timings.extra_time_load_game),
            ("extra_time_return_home", timings.extra_time_return_home),
            ("extra_time_close_game", timings.extra_time_close_game),
            ("extra_time_reconnect", timings.extra_time_reconnect),
        ];

        for (name, value) in extras {
            if value > MAX_EXTRA_TIME_MS {
                return Err(ConfigError::Invalid(format!(
                    "{name} is {value} ms; timing additions are capped at {MAX_EXTRA_TIME_MS} ms"
                )));
            }
        }

        Ok(())
    }

    /// Validates logging configuration
    fn validate_logging(logging: &super::loader::LoggingConfig) -> Result<(), ConfigError> {
        let valid_levels = ["trace", "debug", "info", "warn", "error", "off"];
        if !valid_levels.contains(&logging.level.to_lowercase().as_str()) {
            return Err(ConfigError::Invalid(format!(
                "Invalid log level: {}. Must be one of: {:?}",
                logging.level, valid_levels
            )));
        }

        Ok(())
    }
}

/// Validates a configuration
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    ConfigValidator::validate(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_config() {
        let config = Config::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_invalid_port() {
        let mut config = Config::default();
        config.connection.port = 0;
        let result = validate_config(&config);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("port"));
    }

    #[test]
    fn test_empty_host() {
        let mut config = Config::default();
        config.connection.host = String::new();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_excessive_timing() {
        let mut config = Config::default();
        config.timings.extra_time_close_game = 90_000;
        let result = validate_config(&config);
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("extra_time_close_game"));
    }

    #[test]
    fn test_invalid_log_level() {
        let mut config = Config::default();
        config.logging.level = "loud".to_string();
        let result = validate_config(&config);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("log level"));
    }

    #[test]
    fn test_edge_cases() {
        let mut config = Config::default();

        config.connection.port = 1;
        config.timings.extra_time_load_game = MAX_EXTRA_TIME_MS;
        assert!(validate_config(&config).is_ok());
    }
}
