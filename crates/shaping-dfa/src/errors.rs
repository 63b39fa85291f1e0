//! Error types shared by the resolver, the automaton builder and the matcher.

use std::fmt;
use thiserror::Error;

use crate::ast::Symbol;

/// A symbol value that falls outside the alphabet of a grammar.
///
/// Raised at compile time for literals that exceed the alphabet and at match
/// time for input symbols the automaton has no column for. `index` is only
/// set for match-time failures and points at the offending input element.
///
/// # Examples
/// ```
/// use shaping_dfa::AlphabetRangeError;
/// let err = AlphabetRangeError::new(9, 4, Some(2));
/// assert_eq!(err.to_string(), "symbol 9 at index 2 is outside the alphabet of size 4");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlphabetRangeError {
    /// The rejected symbol value.
    pub symbol: Symbol,
    /// Number of symbols the grammar defines.
    pub alphabet_size: usize,
    /// Input position of the symbol, for match-time failures.
    pub index: Option<usize>,
}

impl AlphabetRangeError {
    /// Describe a symbol that does not fit an alphabet of `alphabet_size`.
    #[must_use]
    pub fn new(symbol: Symbol, alphabet_size: usize, index: Option<usize>) -> Self {
        Self {
            symbol,
            alphabet_size,
            index,
        }
    }
}

impl fmt::Display for AlphabetRangeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.index {
            Some(index) => write!(
                f,
                "symbol {} at index {} is outside the alphabet of size {}",
                self.symbol, index, self.alphabet_size
            ),
            None => write!(
                f,
                "symbol {} is outside the alphabet of size {}",
                self.symbol, self.alphabet_size
            ),
        }
    }
}

impl std::error::Error for AlphabetRangeError {}

/// Errors surfaced while turning rule statements into an automaton.
///
/// # Examples
/// ```
/// use shaping_dfa::CompileError;
/// let err = CompileError::UndefinedReference { name: "Cons".into() };
/// assert_eq!(err.to_string(), "reference to undefined rule `Cons`");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    /// A variable was referenced before any statement or external symbol
    /// bound it.
    #[error("reference to undefined rule `{name}`")]
    UndefinedReference {
        /// Name of the unresolved reference.
        name: String,
    },
    /// No `Main` rule was defined.
    #[error("no `{}` rule defined", crate::symbols::MAIN)]
    MissingEntryRule,
    /// A literal does not fit the alphabet.
    #[error(transparent)]
    AlphabetRange(#[from] AlphabetRangeError),
    /// A bounded repetition whose bounds cannot be expanded.
    #[error(
        "invalid repetition bounds {{{min},{}}}",
        .max.map_or_else(String::new, |m| m.to_string())
    )]
    InvalidRepetition {
        /// Mandatory copies requested.
        min: u32,
        /// Upper bound, `None` when unbounded.
        max: Option<u32>,
    },
    /// The resolved tree has more leaf occurrences than a position id can
    /// index.
    #[error("grammar exceeds {} leaf positions", u32::MAX)]
    PositionLimit,
    /// Subset construction produced more states than a state id can index.
    #[error("automaton exceeds {} states", crate::automaton::StateId::MAX)]
    StateLimit,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_range_error_without_index() {
        let err = AlphabetRangeError::new(7, 3, None);
        assert_eq!(
            err.to_string(),
            "symbol 7 is outside the alphabet of size 3"
        );
    }

    #[test]
    fn forwards_range_error_display() {
        let inner = AlphabetRangeError::new(5, 2, None);
        let err = CompileError::from(inner);
        assert_eq!(err.to_string(), inner.to_string());
    }

    #[test]
    fn formats_unbounded_repetition() {
        let err = CompileError::InvalidRepetition { min: 3, max: None };
        assert_eq!(err.to_string(), "invalid repetition bounds {3,}");
    }

    #[test]
    fn formats_missing_entry_rule() {
        assert_eq!(
            CompileError::MissingEntryRule.to_string(),
            "no `Main` rule defined"
        );
    }

    #[test]
    fn size_limits_name_what_overflowed() {
        assert_eq!(
            CompileError::PositionLimit.to_string(),
            "grammar exceeds 4294967295 leaf positions"
        );
        assert_eq!(
            CompileError::StateLimit.to_string(),
            "automaton exceeds 4294967295 states"
        );
    }
}
