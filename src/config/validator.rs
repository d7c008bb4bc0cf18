//! Checks on configuration values that serde cannot express

use super::loader::{Config, ConfigError, LoggingConfig};
use tracing::level_filters::LevelFilter;

pub struct ConfigValidator;

impl ConfigValidator {
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        Self::log_filter(&config.logging)?;
        Ok(())
    }

    /// Parse the configured level (case-insensitive, `off` allowed)
    pub fn log_filter(logging: &LoggingConfig) -> Result<LevelFilter, ConfigError> {
        if logging.level.trim().is_empty() {
            return Err(ConfigError::Invalid("Empty log level".to_string()));
        }
        logging.level.parse::<LevelFilter>().map_err(|_| {
            ConfigError::Invalid(format!(
                "Invalid log level: {}. Must be one of: trace, debug, info, warn, error, off",
                logging.level
            ))
        })
    }
}

pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    ConfigValidator::validate(config)
}
