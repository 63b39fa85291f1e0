//! Rule-text front end for `shaping-dfa`.
//!
//! Reads grammars written as `name = expression;` statements with `#`
//! comments, integer literals, references to earlier rules, alternation,
//! juxtaposition, postfix repetition (`*`, `+`, `?`, `{min,max}`) and
//! zero-width tags (`name:(...)`), and hands them to the compiler.

mod errors;
mod parser;

use shaping_dfa::{Automaton, Compiler, Symbol};

pub use errors::{RuleError, SyntaxErrorInfo};
pub use parser::parse_rules;

/// Parse and compile rule text with `external` symbols pre-registered.
///
/// # Errors
/// Returns [`RuleError::Syntax`] for malformed text and
/// [`RuleError::Compile`] when the statements do not compile.
///
/// # Examples
/// ```
/// use shaping_dfa_rules::compile_rules;
///
/// let automaton = compile_rules("Main = C V?;", [("C", 0), ("V", 1)])
///     .expect("rules should compile");
/// let runs = automaton.match_all(&[0, 0, 1]).expect("input is in range");
/// assert_eq!(runs.len(), 2);
/// ```
pub fn compile_rules<N: Into<String>>(
    text: &str,
    external: impl IntoIterator<Item = (N, Symbol)>,
) -> Result<Automaton, RuleError> {
    compile_rules_with(text, &Compiler::new().with_external_symbols(external))
}

/// Parse rule text and compile it with a configured [`Compiler`].
///
/// # Errors
/// See [`compile_rules`].
pub fn compile_rules_with(text: &str, compiler: &Compiler) -> Result<Automaton, RuleError> {
    let statements = parse_rules(text)?;
    Ok(compiler.compile(&statements)?)
}
