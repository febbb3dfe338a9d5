//! Configuration module for sessionscan
//!
//! Provides configuration loading, validation, and default settings.

mod defaults;
mod loader;
mod validator;

pub use defaults::default_config;
pub use loader::{load_config, ConfigLoader};
pub use validator::{validate_config, ConfigValidator};

// Re-export the main configuration structure
pub use loader::{AnalysisConfig, Config, LoggingConfig, ReportConfig};

// Configuration-related error type
pub use loader::ConfigError;

// Configuration result type
pub type ConfigResult<T> = Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_module_exports() {
        let config = default_config();
        assert!(validate_config(&config).is_ok());

        let result: ConfigResult<String> = Ok("test".to_string());
        assert!(result.is_ok());
    }

    #[test]
    fn test_load_config_export() {
        // Returns defaults when no file exists in the working directory
        let result = load_config();
        assert!(result.is_ok());
    }
}
