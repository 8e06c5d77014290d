//! Core runtime configuration.
//!
//! # Responsibility
//! - Bundle service latency and optional logging settings into one value
//!   hosts can load from JSON.
//!
//! # Invariants
//! - Every field is optional in JSON; omitted fields fall back to defaults.
//! - A configured log directory must be absolute (checked at init time).

use crate::logging::{init_logging, LogConfig, LoggingError};
use crate::service::latency::LatencyProfile;
use serde::Deserialize;
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct CoreConfig {
    pub latency: LatencyProfile,
    pub logging: Option<LogConfig>,
}

/// Config loading failures.
#[derive(Debug)]
pub enum ConfigError {
    Parse(serde_json::Error),
    Logging(LoggingError),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parse(err) => write!(f, "invalid core config: {err}"),
            Self::Logging(err) => write!(f, "logging setup failed: {err}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Parse(err) => Some(err),
            Self::Logging(err) => Some(err),
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(value: serde_json::Error) -> Self {
        Self::Parse(value)
    }
}

impl From<LoggingError> for ConfigError {
    fn from(value: LoggingError) -> Self {
        Self::Logging(value)
    }
}

impl CoreConfig {
    /// Parses a config document such as
    /// `{"latency": {"create": 0}, "logging": {"level": "info", "dir": "/var/log/crm"}}`.
    pub fn from_json(raw: &str) -> ConfigResult<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Zero latency and no logging.
    pub fn instant() -> Self {
        Self {
            latency: LatencyProfile::instant(),
            logging: None,
        }
    }

    /// Starts logging when configured. Returns whether logging is active.
    pub fn apply_logging(&self) -> ConfigResult<bool> {
        match &self.logging {
            Some(logging) => {
                init_logging(logging)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, CoreConfig};
    use crate::logging::LogLevel;
    use crate::service::latency::LatencyProfile;
    use std::path::PathBuf;

    #[test]
    fn empty_document_yields_defaults() {
        let config = CoreConfig::from_json("{}").expect("empty object parses");
        assert_eq!(config, CoreConfig::default());
        assert_eq!(config.latency.get_all, 300);
        assert!(config.logging.is_none());
    }

    #[test]
    fn partial_latency_overrides_keep_other_defaults() {
        let config = CoreConfig::from_json(r#"{"latency": {"create": 5, "getById": 1}}"#)
            .expect("partial latency parses");
        assert_eq!(config.latency.create, 5);
        assert_eq!(config.latency.get_by_id, 1);
        assert_eq!(config.latency.update, LatencyProfile::default().update);
    }

    #[test]
    fn logging_section_parses_level_case_insensitively() {
        let config = CoreConfig::from_json(
            r#"{"logging": {"level": "WARNING", "dir": "/tmp/crm-logs"}}"#,
        )
        .expect("logging section parses");
        let logging = config.logging.expect("logging configured");
        assert_eq!(logging.level, LogLevel::Warn);
        assert_eq!(logging.dir, PathBuf::from("/tmp/crm-logs"));
    }

    #[test]
    fn unknown_level_is_a_parse_error() {
        let err = CoreConfig::from_json(r#"{"logging": {"level": "loud", "dir": "/tmp"}}"#)
            .expect_err("unknown level must fail");
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn instant_config_skips_logging() {
        let config = CoreConfig::instant();
        assert_eq!(config.latency, LatencyProfile::instant());
        assert!(!config.apply_logging().expect("no logging to apply"));
    }
}
