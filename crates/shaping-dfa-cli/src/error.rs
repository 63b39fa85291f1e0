//! Semantic error types for the command-line front end.
//!
//! Configuration failures are kept apart from everything else so the binary
//! can map them to their own exit code.

use std::path::PathBuf;

use shaping_dfa::AlphabetRangeError;
use shaping_dfa_rules::RuleError;
use thiserror::Error;

/// Errors raised while configuring or running a command.
#[derive(Debug, Error)]
pub enum CliError {
    /// An invalid configuration value was provided.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The rule file could not be parsed or compiled.
    #[error(transparent)]
    Rules(#[from] RuleError),

    /// The symbols file is not a JSON object of names to codes.
    #[error("invalid symbols file {}: {source}", path.display())]
    SymbolsFile {
        /// Path of the offending file.
        path: PathBuf,
        /// Underlying JSON error.
        source: serde_json::Error,
    },

    /// An input argument is neither an integer nor a known symbol name.
    #[error("unknown symbol `{0}`")]
    UnknownSymbol(String),

    /// An input symbol does not fit the compiled alphabet.
    #[error(transparent)]
    AlphabetRange(#[from] AlphabetRangeError),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Whether the error stems from configuration rather than a command.
    #[must_use]
    pub fn is_config(&self) -> bool {
        matches!(self, Self::InvalidConfig(_))
    }
}
