//! Recursive-descent parser turning tokens into rule statements.
//!
//! Precedence, loosest first: alternation, juxtaposition, postfix
//! repetition, atoms. A tag `name:x` binds to the following atom together
//! with its postfix operators.

use shaping_dfa::{Expr, RepeatOp, Statement, Symbol};

use super::lexer::{Token, TokenKind};
use crate::errors::{RuleError, syntax_error};

pub(crate) struct Parser {
    tokens: Vec<Token>,
    index: usize,
    end: usize,
    deferred_comments: Vec<String>,
}

impl Parser {
    pub(crate) fn new(tokens: Vec<Token>, end: usize) -> Self {
        Self {
            tokens,
            index: 0,
            end,
            deferred_comments: Vec::new(),
        }
    }

    pub(crate) fn parse_statements(mut self) -> Result<Vec<Statement>, RuleError> {
        let mut statements = Vec::new();
        while let Some(token) = self.tokens.get(self.index).cloned() {
            match token.kind {
                TokenKind::Comment(text) => {
                    self.index += 1;
                    statements.push(Statement::Comment(text));
                }
                TokenKind::Ident(name) => {
                    self.index += 1;
                    statements.push(self.parse_assignment(name)?);
                    statements.extend(self.deferred_comments.drain(..).map(Statement::Comment));
                }
                _ => return Err(self.unexpected("expected a rule name")),
            }
        }
        Ok(statements)
    }

    fn parse_assignment(&mut self, name: String) -> Result<Statement, RuleError> {
        self.expect(&TokenKind::Equals, "expected `=` after rule name")?;
        let expr = self.parse_alternation()?;
        self.expect(&TokenKind::Semicolon, "expected `;` after rule")?;
        Ok(Statement::assign(name, expr))
    }

    fn parse_alternation(&mut self) -> Result<Expr, RuleError> {
        let mut branches = vec![self.parse_concatenation()?];
        while self.eat(&TokenKind::Pipe) {
            branches.push(self.parse_concatenation()?);
        }
        Expr::choice(branches).ok_or_else(|| self.unexpected("expected an expression"))
    }

    fn parse_concatenation(&mut self) -> Result<Expr, RuleError> {
        let mut items = vec![self.parse_repeat()?];
        while self.peek_kind().is_some_and(TokenKind::starts_atom) {
            items.push(self.parse_repeat()?);
        }
        Expr::sequence(items).ok_or_else(|| self.unexpected("expected an expression"))
    }

    fn parse_repeat(&mut self) -> Result<Expr, RuleError> {
        let mut expr = self.parse_atom()?;
        loop {
            let op = match self.peek_kind() {
                Some(TokenKind::Star) => RepeatOp::ZeroOrMore,
                Some(TokenKind::Plus) => RepeatOp::OneOrMore,
                Some(TokenKind::Question) => RepeatOp::Optional,
                Some(TokenKind::OpenBrace) => {
                    expr = self.parse_bounds(&expr)?;
                    continue;
                }
                _ => return Ok(expr),
            };
            self.index += 1;
            expr = Expr::repeat(expr, op);
        }
    }

    fn parse_bounds(&mut self, inner: &Expr) -> Result<Expr, RuleError> {
        let open = self.position();
        self.index += 1;
        let min = self.eat_integer();
        let max = if self.eat(&TokenKind::Comma) {
            self.eat_integer()
        } else if min.is_some() {
            min
        } else {
            return Err(self.unexpected("expected repetition bounds"));
        };
        self.expect(
            &TokenKind::CloseBrace,
            "expected `}` after repetition bounds",
        )?;
        let min = min.unwrap_or(0);
        Expr::repetition(inner, min, max).map_err(|_| {
            let upper = max.map_or_else(String::new, |max| max.to_string());
            syntax_error(
                "invalid repetition bounds",
                open,
                Some(format!("{{{min},{upper}}}")),
            )
        })
    }

    fn parse_atom(&mut self) -> Result<Expr, RuleError> {
        let Some(kind) = self.peek_kind().cloned() else {
            return Err(self.unexpected("expected an expression"));
        };
        match kind {
            TokenKind::Integer(value) => {
                self.index += 1;
                Ok(Expr::literal(value))
            }
            TokenKind::Ident(name) => {
                self.index += 1;
                if self.eat(&TokenKind::Colon) {
                    Ok(Expr::tagged(name, self.parse_repeat()?))
                } else {
                    Ok(Expr::variable(name))
                }
            }
            TokenKind::OpenParen => {
                self.index += 1;
                let expr = self.parse_alternation()?;
                self.expect(&TokenKind::CloseParen, "expected `)` to close group")?;
                Ok(expr)
            }
            _ => Err(self.unexpected("expected an expression")),
        }
    }

    /// The next significant token kind. Comments inside a rule are set aside
    /// and emitted after it.
    fn peek_kind(&mut self) -> Option<&TokenKind> {
        while let Some(Token {
            kind: TokenKind::Comment(text),
            ..
        }) = self.tokens.get(self.index)
        {
            self.deferred_comments.push(text.clone());
            self.index += 1;
        }
        self.tokens.get(self.index).map(|token| &token.kind)
    }

    fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.peek_kind() == Some(kind) {
            self.index += 1;
            true
        } else {
            false
        }
    }

    fn eat_integer(&mut self) -> Option<Symbol> {
        if let Some(&TokenKind::Integer(value)) = self.peek_kind() {
            self.index += 1;
            Some(value)
        } else {
            None
        }
    }

    fn expect(&mut self, kind: &TokenKind, message: &'static str) -> Result<(), RuleError> {
        if self.eat(kind) {
            Ok(())
        } else {
            Err(self.unexpected(message))
        }
    }

    fn position(&self) -> usize {
        self.tokens
            .get(self.index)
            .map_or(self.end, |token| token.position)
    }

    fn unexpected(&mut self, message: &'static str) -> RuleError {
        let found = self.peek_kind().map(TokenKind::describe);
        syntax_error(message, self.position(), found)
    }
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "tests exercise parser fallibility")]
mod tests {
    use super::*;
    use crate::parser::lexer::lex_rules;

    fn parse(text: &str) -> Result<Vec<Statement>, RuleError> {
        Parser::new(lex_rules(text)?, text.len()).parse_statements()
    }

    fn rule(text: &str) -> String {
        match parse(text).unwrap().as_slice() {
            [Statement::Assignment { expr, .. }] => expr.to_string(),
            other => panic!("expected one assignment, got {other:?}"),
        }
    }

    #[test]
    fn alternation_binds_looser_than_concatenation() {
        assert_eq!(rule("Main = 1 2 | 3;"), "1 2 | 3");
        assert_eq!(rule("Main = 1 (2 | 3);"), "1 (2 | 3)");
    }

    #[test]
    fn postfix_binds_to_the_preceding_atom() {
        assert_eq!(rule("Main = 1 2*;"), "1 2*");
        assert_eq!(rule("Main = (1 2)+?;"), "(1 2)+?");
    }

    #[test]
    fn tag_wraps_the_following_repeat() {
        assert_eq!(
            parse("Main = a:(1)+ 2;").unwrap(),
            vec![Statement::assign(
                "Main",
                Expr::concat(
                    Expr::tagged("a", Expr::repeat(Expr::literal(1), RepeatOp::OneOrMore)),
                    Expr::literal(2),
                ),
            )]
        );
    }

    #[test]
    fn chains_fold_to_the_left() {
        assert_eq!(
            parse("Main = 1 | 2 | 3;").unwrap(),
            vec![Statement::assign(
                "Main",
                Expr::alt(
                    Expr::alt(Expr::literal(1), Expr::literal(2)),
                    Expr::literal(3),
                ),
            )]
        );
        assert_eq!(rule("Main = 1 2 3;"), "1 2 3");
    }

    #[test]
    fn expands_bounded_repetition() {
        assert_eq!(rule("Main = 1{2};"), "1 1");
        assert_eq!(rule("Main = 1{1,3};"), "1 1? 1?");
        assert_eq!(rule("Main = 1{,2};"), "1? 1?");
        assert_eq!(rule("Main = 1{2,};"), "1 1 1*");
    }

    #[test]
    fn comments_inside_rules_follow_the_rule() {
        let statements = parse("Main = 1 # first\n 2;").unwrap();
        assert_eq!(
            statements,
            vec![
                Statement::assign(
                    "Main",
                    Expr::concat(Expr::literal(1), Expr::literal(2)),
                ),
                Statement::Comment("first".into()),
            ]
        );
    }

    #[test]
    fn reports_missing_semicolon_at_end_of_input() {
        let err = parse("Main = 1").unwrap_err();
        assert_eq!(
            err.to_string(),
            "expected `;` after rule, found end of input at byte 8 (zero-based)"
        );
    }

    #[test]
    fn reports_inverted_bounds() {
        let err = parse("Main = 1{3,1};").unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid repetition bounds, found `{3,1}` at byte 8 (zero-based)"
        );
    }

    #[test]
    fn reports_empty_bounds() {
        let err = parse("Main = 1{};").unwrap_err();
        let message = err.to_string();
        assert!(message.starts_with("expected repetition bounds, found `}`"));
    }

    #[test]
    fn reports_stray_operator() {
        let err = parse("Main = | 1;").unwrap_err();
        assert_eq!(
            err.to_string(),
            "expected an expression, found `|` at byte 7 (zero-based)"
        );
    }

    #[test]
    fn reports_statement_without_name() {
        let err = parse("= 1;").unwrap_err();
        assert!(err.to_string().starts_with("expected a rule name"));
    }
}
