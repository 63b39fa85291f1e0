//! Error types surfaced while reading rule text.

use std::fmt;

use shaping_dfa::CompileError;
use thiserror::Error;

/// Context for a malformed piece of rule text.
///
/// # Examples
/// ```
/// use shaping_dfa_rules::SyntaxErrorInfo;
/// let info = SyntaxErrorInfo::new("expected `;`", 12, Some("|".into()));
/// assert_eq!(info.to_string(), "expected `;`, found `|` at byte 12 (zero-based)");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxErrorInfo {
    /// What the parser expected or rejected.
    pub message: &'static str,
    /// Byte offset of the offending text.
    pub position: usize,
    /// The offending text, or `None` at end of input.
    pub found: Option<String>,
}

impl SyntaxErrorInfo {
    /// Create a new syntax error description.
    #[must_use]
    pub fn new(message: &'static str, position: usize, found: Option<String>) -> Self {
        Self {
            message,
            position,
            found,
        }
    }
}

impl fmt::Display for SyntaxErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.found {
            Some(found) => write!(
                f,
                "{}, found `{}` at byte {} (zero-based)",
                self.message, found, self.position
            ),
            None => write!(
                f,
                "{}, found end of input at byte {} (zero-based)",
                self.message, self.position
            ),
        }
    }
}

/// Errors surfaced while parsing or compiling rule text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleError {
    /// The text does not follow the rule grammar.
    #[error("{0}")]
    Syntax(SyntaxErrorInfo),
    /// The statements parsed but do not compile.
    #[error(transparent)]
    Compile(#[from] CompileError),
}

pub(crate) fn syntax_error(
    message: &'static str,
    position: usize,
    found: Option<String>,
) -> RuleError {
    RuleError::Syntax(SyntaxErrorInfo::new(message, position, found))
}
