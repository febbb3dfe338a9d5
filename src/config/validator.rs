//! Configuration validator for sessionscan
//!
//! Validates configuration values before a run starts.

use super::loader::{Config, ConfigError};
use crate::profile::Profile;

/// Configuration validator
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validates the entire configuration
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        Self::validate_analysis(config)?;
        Self::validate_report(config)?;
        Self::validate_logging(config)?;
        Ok(())
    }

    fn validate_analysis(config: &Config) -> Result<(), ConfigError> {
        let analysis = &config.analysis;
        if Profile::by_name(&analysis.profile).is_none() {
            return Err(ConfigError::Invalid(format!(
                "Unknown profile '{}' (supported: {})",
                analysis.profile,
                Profile::names().join(", ")
            )));
        }

        if analysis.max_list_entries == 0 {
            return Err(ConfigError::Invalid(
                "max_list_entries must be at least 1".to_string(),
            ));
        }

        if analysis.max_list_entries > 1_000_000 {
            return Err(ConfigError::Invalid(
                "max_list_entries cannot exceed 1000000".to_string(),
            ));
        }

        Ok(())
    }

    fn validate_report(config: &Config) -> Result<(), ConfigError> {
        match config.report.format.as_str() {
            "text" | "json" => Ok(()),
            other => Err(ConfigError::Invalid(format!(
                "Unknown report format '{other}' (supported: text, json)"
            ))),
        }
    }

    fn validate_logging(config: &Config) -> Result<(), ConfigError> {
        match config.logging.level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
            other => Err(ConfigError::Invalid(format!(
                "Unknown log level '{other}'"
            ))),
        }
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
    fn test_default_config_is_valid() {
        assert!(validate_config(&Config::default()).is_ok());
    }

    #[test]
    fn test_unknown_profile_rejected() {
        let mut config = Config::default();
        config.analysis.profile = "win95-osr2".to_string();
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("Unknown profile"));
    }

    #[test]
    fn test_zero_list_cap_rejected() {
        let mut config = Config::default();
        config.analysis.max_list_entries = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_unknown_format_rejected() {
        let mut config = Config::default();
        config.report.format = "xml".to_string();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_unknown_log_level_rejected() {
        let mut config = Config::default();
        config.logging.level = "loud".to_string();
        assert!(validate_config(&config).is_err());
    }
}
