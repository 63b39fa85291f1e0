//! Rule-text lexing and parsing.

mod grammar;
mod lexer;

use shaping_dfa::Statement;

use crate::errors::RuleError;

/// Parse rule text into the statement list the compiler consumes.
///
/// # Errors
/// Returns [`RuleError::Syntax`] for malformed text.
///
/// # Examples
/// ```
/// use shaping_dfa::Statement;
/// use shaping_dfa_rules::parse_rules;
///
/// let statements = parse_rules("# halant\nH = 4;\nMain = H;")
///     .expect("rules should parse");
/// assert_eq!(statements.len(), 3);
/// assert_eq!(statements.first(), Some(&Statement::Comment("halant".into())));
/// ```
pub fn parse_rules(text: &str) -> Result<Vec<Statement>, RuleError> {
    let tokens = lexer::lex_rules(text)?;
    log::trace!("lexed {} rule tokens", tokens.len());
    grammar::Parser::new(tokens, text.len()).parse_statements()
}
