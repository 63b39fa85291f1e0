//! Expression trees for rule grammars.
//!
//! A rule is a tree over a closed set of node kinds. Trees own their children
//! outright, so cloning a subtree always yields independent leaves; the
//! builder later gives every leaf occurrence its own position id, which keeps
//! two uses of the same macro from collapsing into one automaton state.

use std::fmt;

use crate::errors::CompileError;

/// One element of the input alphabet, e.g. a shaping category code.
pub type Symbol = u32;

/// Postfix repetition operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RepeatOp {
    /// `*`: zero or more.
    ZeroOrMore,
    /// `+`: one or more.
    OneOrMore,
    /// `?`: zero or one.
    Optional,
}

impl RepeatOp {
    /// Whether the repeated expression may be skipped entirely.
    #[must_use]
    pub const fn is_nullable(self) -> bool {
        matches!(self, Self::ZeroOrMore | Self::Optional)
    }

    /// Whether the repeated expression may follow itself.
    #[must_use]
    pub const fn loops(self) -> bool {
        matches!(self, Self::ZeroOrMore | Self::OneOrMore)
    }

    /// The operator as written in rule text.
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            Self::ZeroOrMore => '*',
            Self::OneOrMore => '+',
            Self::Optional => '?',
        }
    }
}

/// A node of a rule expression tree.
///
/// # Examples
/// ```
/// use shaping_dfa::{Expr, RepeatOp};
///
/// // (1 | 2)+
/// let expr = Expr::repeat(
///     Expr::alt(Expr::literal(1), Expr::literal(2)),
///     RepeatOp::OneOrMore,
/// );
/// assert!(!expr.nullable());
/// assert_eq!(expr.to_string(), "(1 | 2)+");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Expr {
    /// Matches exactly one symbol.
    Literal(Symbol),
    /// Zero-width marker naming a sub-rule.
    Tag(String),
    /// Synthetic acceptance marker appended by the builder.
    EndMarker,
    /// Reference to a previously defined rule, removed by resolution.
    Variable(String),
    /// `a | b`
    Alternation(Box<Self>, Box<Self>),
    /// `a b`
    Concatenation(Box<Self>, Box<Self>),
    /// `a*`, `a+`, `a?`
    Repeat(Box<Self>, RepeatOp),
}

impl Expr {
    /// A leaf matching `value`.
    #[must_use]
    pub fn literal(value: Symbol) -> Self {
        Self::Literal(value)
    }

    /// A reference to the rule called `name`.
    #[must_use]
    pub fn variable(name: impl Into<String>) -> Self {
        Self::Variable(name.into())
    }

    /// A bare zero-width tag.
    #[must_use]
    pub fn tag(name: impl Into<String>) -> Self {
        Self::Tag(name.into())
    }

    /// `left right`
    #[must_use]
    pub fn concat(left: Self, right: Self) -> Self {
        Self::Concatenation(Box::new(left), Box::new(right))
    }

    /// `left | right`
    #[must_use]
    pub fn alt(left: Self, right: Self) -> Self {
        Self::Alternation(Box::new(left), Box::new(right))
    }

    /// Wrap `inner` in a postfix repetition.
    #[must_use]
    pub fn repeat(inner: Self, op: RepeatOp) -> Self {
        Self::Repeat(Box::new(inner), op)
    }

    /// `name:(inner)`. The tag trails the expression it names, so it shows up
    /// in the states reached once `inner` has been consumed.
    #[must_use]
    pub fn tagged(name: impl Into<String>, inner: Self) -> Self {
        Self::concat(inner, Self::tag(name))
    }

    /// Left-fold `items` into a concatenation. Returns `None` when empty.
    pub fn sequence(items: impl IntoIterator<Item = Self>) -> Option<Self> {
        items.into_iter().reduce(Self::concat)
    }

    /// Left-fold `items` into an alternation. Returns `None` when empty.
    pub fn choice(items: impl IntoIterator<Item = Self>) -> Option<Self> {
        items.into_iter().reduce(Self::alt)
    }

    /// Expand `inner{min,max}` into plain nodes.
    ///
    /// The result is `min` mandatory copies followed by either one trailing
    /// `*` copy (`max` is `None`) or `max - min` trailing `?` copies. Every
    /// copy is an independent clone.
    ///
    /// # Errors
    /// Returns [`CompileError::InvalidRepetition`] when `max < min` or when
    /// `max` is zero, since the expansion would be empty.
    ///
    /// # Examples
    /// ```
    /// use shaping_dfa::Expr;
    /// let expr = Expr::repetition(&Expr::literal(3), 1, Some(2))
    ///     .expect("bounds are valid");
    /// assert_eq!(expr.to_string(), "3 3?");
    /// ```
    pub fn repetition(inner: &Self, min: u32, max: Option<u32>) -> Result<Self, CompileError> {
        if max.is_some_and(|max| max < min || max == 0) {
            return Err(CompileError::InvalidRepetition { min, max });
        }

        let mut copies: Vec<Self> = (0..min).map(|_| inner.clone()).collect();
        let tail: Vec<Self> = max.map_or_else(
            || vec![Self::repeat(inner.clone(), RepeatOp::ZeroOrMore)],
            |max| {
                (min..max)
                    .map(|_| Self::repeat(inner.clone(), RepeatOp::Optional))
                    .collect()
            },
        );
        copies.extend(tail);
        Self::sequence(copies).ok_or(CompileError::InvalidRepetition { min, max })
    }

    /// Whether the expression matches the empty sequence.
    #[must_use]
    pub fn nullable(&self) -> bool {
        match self {
            Self::Literal(_) | Self::EndMarker | Self::Variable(_) => false,
            Self::Tag(_) => true,
            Self::Alternation(a, b) => a.nullable() || b.nullable(),
            Self::Concatenation(a, b) => a.nullable() && b.nullable(),
            Self::Repeat(_, op) => op.is_nullable(),
        }
    }

    /// Names of all variables referenced by the tree, in left-to-right order.
    #[must_use]
    pub fn references(&self) -> Vec<&str> {
        let mut names = Vec::new();
        self.collect_references(&mut names);
        names
    }

    fn collect_references<'a>(&'a self, names: &mut Vec<&'a str>) {
        match self {
            Self::Variable(name) => names.push(name),
            Self::Alternation(a, b) | Self::Concatenation(a, b) => {
                a.collect_references(names);
                b.collect_references(names);
            }
            Self::Repeat(inner, _) => inner.collect_references(names),
            Self::Literal(_) | Self::Tag(_) | Self::EndMarker => {}
        }
    }

    const fn precedence(&self) -> u8 {
        match self {
            Self::Alternation(..) => 0,
            Self::Concatenation(..) => 1,
            Self::Repeat(..) => 2,
            Self::Literal(_) | Self::Tag(_) | Self::EndMarker | Self::Variable(_) => 3,
        }
    }

    fn fmt_operand(&self, f: &mut fmt::Formatter<'_>, min: u8) -> fmt::Result {
        if self.precedence() < min {
            write!(f, "({self})")
        } else {
            write!(f, "{self}")
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(value) => write!(f, "{value}"),
            Self::Tag(name) => write!(f, "<{name}>"),
            Self::EndMarker => f.write_str("#"),
            Self::Variable(name) => f.write_str(name),
            Self::Alternation(a, b) => {
                a.fmt_operand(f, 0)?;
                f.write_str(" | ")?;
                b.fmt_operand(f, 1)
            }
            Self::Concatenation(a, b) => {
                a.fmt_operand(f, 1)?;
                f.write_str(" ")?;
                b.fmt_operand(f, 2)
            }
            Self::Repeat(inner, op) => {
                inner.fmt_operand(f, 2)?;
                write!(f, "{}", op.as_char())
            }
        }
    }
}

/// A top-level rule statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    /// `name = expr;`
    Assignment {
        /// Rule name being bound.
        name: String,
        /// Unresolved right-hand side.
        expr: Expr,
    },
    /// Comment text, ignored by resolution.
    Comment(String),
}

impl Statement {
    /// Shorthand for [`Statement::Assignment`].
    #[must_use]
    pub fn assign(name: impl Into<String>, expr: Expr) -> Self {
        Self::Assignment {
            name: name.into(),
            expr,
        }
    }
}
