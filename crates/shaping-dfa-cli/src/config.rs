//! Command configuration parsed from environment variables.
//!
//! Settings are read from variables prefixed with `SHAPING_DFA_` and can be
//! overridden by command-line flags.

use std::env;
use std::str::FromStr;

use crate::error::CliError;

/// Environment variable holding the log level.
pub const LOG_LEVEL_VAR: &str = "SHAPING_DFA_LOG_LEVEL";

/// Log level enumeration matching tracing crate levels.
///
/// Defaults to `Warn` so command output stays quiet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    /// Every discovered state and lexed rule.
    Trace,
    /// Compilation statistics.
    Debug,
    /// Command progress.
    Info,
    /// Potentially problematic situations.
    #[default]
    Warn,
    /// Failures only.
    Error,
}

impl FromStr for LogLevel {
    type Err = CliError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "trace" => Ok(Self::Trace),
            "debug" => Ok(Self::Debug),
            "info" => Ok(Self::Info),
            "warn" | "warning" => Ok(Self::Warn),
            "error" => Ok(Self::Error),
            _ => Err(CliError::InvalidConfig(format!(
                "unknown log level '{s}', expected one of: trace, debug, info, warn, error"
            ))),
        }
    }
}

impl LogLevel {
    /// Convert to a tracing filter directive string.
    #[must_use]
    pub fn as_filter_str(&self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

/// Configuration shared by every subcommand.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: LogLevel,
}

impl CliConfig {
    /// Load configuration from environment variables.
    ///
    /// Reads `SHAPING_DFA_LOG_LEVEL` and falls back to defaults when unset.
    ///
    /// # Errors
    ///
    /// Returns `CliError::InvalidConfig` if a variable holds an invalid value.
    pub fn from_env() -> Result<Self, CliError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, CliError> {
        let log_level = match lookup(LOG_LEVEL_VAR) {
            Some(val) => val.parse()?,
            None => LogLevel::default(),
        };
        Ok(Self { log_level })
    }

    /// Apply command-line overrides on top of environment defaults.
    #[must_use]
    pub fn apply_overrides(mut self, log_level: Option<LogLevel>) -> Self {
        if let Some(level) = log_level {
            self.log_level = level;
        }
        self
    }

    /// Create a new configuration with the specified log level.
    #[must_use]
    pub fn with_log_level(mut self, level: LogLevel) -> Self {
        self.log_level = level;
        self
    }
}

#[cfg(test)]
#[expect(
    clippy::unwrap_used,
    reason = "tests require explicit panic messages for debugging failures"
)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("trace", LogLevel::Trace)]
    #[case("Debug", LogLevel::Debug)]
    #[case("INFO", LogLevel::Info)]
    #[case("warn", LogLevel::Warn)]
    #[case("warning", LogLevel::Warn)]
    #[case("error", LogLevel::Error)]
    fn log_level_parses_valid_values(#[case] text: &str, #[case] expected: LogLevel) {
        assert_eq!(text.parse::<LogLevel>().ok(), Some(expected));
    }

    #[test]
    fn log_level_rejects_invalid_values() {
        let err = "loud".parse::<LogLevel>().unwrap_err();
        assert!(err.is_config());
        assert!(err.to_string().contains("unknown log level 'loud'"));
    }

    #[test]
    fn missing_variable_uses_defaults() {
        let config = CliConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config.log_level, LogLevel::Warn);
    }

    #[test]
    fn reads_log_level_variable() {
        let config = CliConfig::from_lookup(|key| {
            (key == LOG_LEVEL_VAR).then(|| "debug".to_string())
        })
        .unwrap();
        assert_eq!(config.log_level, LogLevel::Debug);
    }

    #[test]
    fn invalid_variable_is_a_config_error() {
        let err = CliConfig::from_lookup(|_| Some("chatty".into())).unwrap_err();
        assert!(err.is_config());
    }

    #[test]
    fn apply_overrides_prefers_flags() {
        let config = CliConfig::default().with_log_level(LogLevel::Info);
        assert_eq!(
            config.clone().apply_overrides(None).log_level,
            LogLevel::Info
        );
        assert_eq!(
            config.apply_overrides(Some(LogLevel::Trace)).log_level,
            LogLevel::Trace
        );
    }
}
