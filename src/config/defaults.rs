//! Default configuration values for sessionscan

use super::loader::{AnalysisConfig, Config, LoggingConfig, ReportConfig};

pub fn default_profile() -> String {
    "win7-sp1-x64".to_string()
}

pub fn default_max_list_entries() -> usize {
    4096
}

pub fn default_format() -> String {
    "text".to_string()
}

pub fn default_log_level() -> String {
    "info".to_string()
}

pub fn default_analysis() -> AnalysisConfig {
    AnalysisConfig {
        profile: default_profile(),
        max_list_entries: default_max_list_entries(),
    }
}

pub fn default_report() -> ReportConfig {
    ReportConfig {
        format: default_format(),
    }
}

pub fn default_logging() -> LoggingConfig {
    LoggingConfig {
        level: default_log_level(),
    }
}

/// Returns the default configuration
pub fn default_config() -> Config {
    Config {
        analysis: default_analysis(),
        report: default_report(),
        logging: default_logging(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_consistent() {
        let config = default_config();
        assert_eq!(config.analysis.profile, default_profile());
        assert_eq!(config.analysis.max_list_entries, 4096);
        assert_eq!(config.report.format, "text");
        assert_eq!(config.logging.level, "info");
    }
}
