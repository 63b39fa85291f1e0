//! Rule lexer converting rule text into positioned tokens.

use shaping_dfa::Symbol;

use crate::errors::{RuleError, syntax_error};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum TokenKind {
    Ident(String),
    Integer(Symbol),
    Comment(String),
    Equals,
    Semicolon,
    Pipe,
    Colon,
    Comma,
    OpenParen,
    CloseParen,
    OpenBrace,
    CloseBrace,
    Star,
    Plus,
    Question,
}

impl TokenKind {
    /// Whether the token can begin an operand of juxtaposition.
    pub(crate) const fn starts_atom(&self) -> bool {
        matches!(self, Self::Integer(_) | Self::Ident(_) | Self::OpenParen)
    }

    /// The token as it would be written in rule text.
    pub(crate) fn describe(&self) -> String {
        match self {
            Self::Ident(name) => name.clone(),
            Self::Integer(value) => value.to_string(),
            Self::Comment(text) => format!("#{text}"),
            Self::Equals => "=".into(),
            Self::Semicolon => ";".into(),
            Self::Pipe => "|".into(),
            Self::Colon => ":".into(),
            Self::Comma => ",".into(),
            Self::OpenParen => "(".into(),
            Self::CloseParen => ")".into(),
            Self::OpenBrace => "{".into(),
            Self::CloseBrace => "}".into(),
            Self::Star => "*".into(),
            Self::Plus => "+".into(),
            Self::Question => "?".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Token {
    pub kind: TokenKind,
    pub position: usize,
}

fn is_ident_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_'
}

fn is_ident_continue(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

fn take_while(bytes: &[u8], start: usize, pred: impl Fn(u8) -> bool) -> usize {
    let mut end = start;
    while bytes.get(end).is_some_and(|&b| pred(b)) {
        end += 1;
    }
    end
}

fn text_between(text: &str, start: usize, end: usize) -> String {
    text.get(start..end).unwrap_or_default().to_string()
}

pub(crate) fn lex_rules(text: &str) -> Result<Vec<Token>, RuleError> {
    let bytes = text.as_bytes();
    let mut tokens = Vec::new();
    let mut pos = 0;

    while let Some(&b) = bytes.get(pos) {
        let start = pos;
        let kind = match b {
            b if b.is_ascii_whitespace() => {
                pos += 1;
                continue;
            }
            b'#' => {
                pos = take_while(bytes, pos + 1, |b| b != b'\n');
                TokenKind::Comment(text_between(text, start + 1, pos).trim().to_string())
            }
            b if is_ident_start(b) => {
                pos = take_while(bytes, pos, is_ident_continue);
                TokenKind::Ident(text_between(text, start, pos))
            }
            b if b.is_ascii_digit() => {
                pos = take_while(bytes, pos, |b| b.is_ascii_digit());
                let digits = text_between(text, start, pos);
                let value = digits.parse::<Symbol>().map_err(|_| {
                    syntax_error(
                        "integer literal does not fit a symbol",
                        start,
                        Some(digits.clone()),
                    )
                })?;
                TokenKind::Integer(value)
            }
            _ => {
                let kind = match b {
                    b'=' => TokenKind::Equals,
                    b';' => TokenKind::Semicolon,
                    b'|' => TokenKind::Pipe,
                    b':' => TokenKind::Colon,
                    b',' => TokenKind::Comma,
                    b'(' => TokenKind::OpenParen,
                    b')' => TokenKind::CloseParen,
                    b'{' => TokenKind::OpenBrace,
                    b'}' => TokenKind::CloseBrace,
                    b'*' => TokenKind::Star,
                    b'+' => TokenKind::Plus,
                    b'?' => TokenKind::Question,
                    _ => {
                        let found = text.get(start..).and_then(|rest| rest.chars().next());
                        return Err(syntax_error(
                            "unexpected character in rule text",
                            start,
                            found.map(String::from),
                        ));
                    }
                };
                pos += 1;
                kind
            }
        };
        tokens.push(Token {
            kind,
            position: start,
        });
    }

    Ok(tokens)
}
