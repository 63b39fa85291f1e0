//! Structured logging for the command-line front end.
//!
//! Records go to stderr so stdout carries command output only. The library
//! crates log through the `log` facade; those records are forwarded into the
//! same subscriber.

use std::io::IsTerminal;

use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::format::FmtSpan;

use crate::config::CliConfig;

fn filter_from_config(config: &CliConfig) -> EnvFilter {
    EnvFilter::new(config.log_level.as_filter_str())
}

/// Initialise logging based on configuration.
///
/// Log level precedence (highest to lowest):
///
/// 1. CLI `--log-level`
/// 2. `SHAPING_DFA_LOG_LEVEL`
/// 3. `warn`
///
/// If a global subscriber is already set, the call is ignored.
pub fn init_logging(config: &CliConfig) {
    // First subscriber wins; later calls are no-ops.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter_from_config(config))
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_span_events(FmtSpan::CLOSE)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .try_init();
}
