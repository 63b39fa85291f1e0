//! Rule resolution: macro-style substitution of named rules.
//!
//! Statements are processed once, in order. Each assignment has its variable
//! references replaced by fresh copies of the rules they name, so a name must
//! be bound before it is used and recursion is impossible. Names bound to a
//! bare literal double as alphabet symbols.

use std::collections::BTreeMap;

use hashbrown::HashMap;

use crate::ast::{Expr, Statement, Symbol};
use crate::errors::CompileError;

/// Name of the entry rule every grammar must define.
pub const MAIN: &str = "Main";

/// Resolved rule bindings and the alphabet they define.
///
/// # Examples
/// ```
/// use shaping_dfa::{Expr, Statement, SymbolTable};
///
/// let mut table = SymbolTable::new([("Cons", 0), ("Vowel", 1)]);
/// table
///     .process(&[Statement::assign(
///         "Main",
///         Expr::concat(Expr::variable("Cons"), Expr::variable("Vowel")),
///     )])
///     .expect("all references are bound");
/// assert_eq!(table.alphabet_size(), 2);
/// assert_eq!(table.main().map(ToString::to_string), Ok("0 1".to_string()));
/// ```
#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    rules: HashMap<String, Expr>,
    symbols: BTreeMap<String, Symbol>,
    alphabet_size: usize,
}

impl SymbolTable {
    /// Create a table pre-populated with host-owned symbols.
    ///
    /// Each distinct name becomes a literal rule and one alphabet symbol.
    pub fn new<N: Into<String>>(external: impl IntoIterator<Item = (N, Symbol)>) -> Self {
        let mut table = Self::default();
        for (name, value) in external {
            table.bind_symbol(name.into(), value);
        }
        table
    }

    /// Resolve `statements` in order, binding every assignment.
    ///
    /// # Errors
    /// Returns [`CompileError::UndefinedReference`] for the first variable
    /// that has no earlier binding. Bindings made before the failure remain.
    pub fn process(&mut self, statements: &[Statement]) -> Result<(), CompileError> {
        for statement in statements {
            match statement {
                Statement::Assignment { name, expr } => {
                    let resolved = self.resolve(expr).inspect_err(|_| {
                        log::debug!(
                            "rule `{name}` has unbound references {:?}",
                            self.unbound_references(expr)
                        );
                    })?;
                    log::trace!("bound rule `{name}` to {resolved}");
                    if let Expr::Literal(value) = resolved {
                        self.bind_symbol(name.clone(), value);
                    } else {
                        self.rules.insert(name.clone(), resolved);
                    }
                }
                Statement::Comment(_) => {}
            }
        }
        Ok(())
    }

    /// Return a copy of `expr` with every variable replaced by a fresh copy of
    /// its binding.
    ///
    /// # Errors
    /// Returns [`CompileError::UndefinedReference`] when a variable is unbound.
    pub fn resolve(&self, expr: &Expr) -> Result<Expr, CompileError> {
        Ok(match expr {
            Expr::Variable(name) => self
                .rules
                .get(name)
                .cloned()
                .ok_or_else(|| CompileError::UndefinedReference { name: name.clone() })?,
            Expr::Alternation(a, b) => Expr::alt(self.resolve(a)?, self.resolve(b)?),
            Expr::Concatenation(a, b) => Expr::concat(self.resolve(a)?, self.resolve(b)?),
            Expr::Repeat(inner, op) => Expr::repeat(self.resolve(inner)?, *op),
            Expr::Literal(_) | Expr::Tag(_) | Expr::EndMarker => expr.clone(),
        })
    }

    /// Names referenced by `expr` that have no binding yet, in the order
    /// they appear.
    #[must_use]
    pub fn unbound_references<'e>(&self, expr: &'e Expr) -> Vec<&'e str> {
        expr.references()
            .into_iter()
            .filter(|name| !self.rules.contains_key(*name))
            .collect()
    }

    /// Raise the alphabet size to at least `size`.
    ///
    /// Grammars written with raw integer literals use this to declare symbols
    /// they never name.
    pub fn reserve_alphabet(&mut self, size: usize) {
        self.alphabet_size = self.alphabet_size.max(size);
    }

    /// Number of symbols in the alphabet.
    #[must_use]
    pub fn alphabet_size(&self) -> usize {
        self.alphabet_size
    }

    /// Symbol value bound to `name`, if `name` is a symbol.
    #[must_use]
    pub fn symbol(&self, name: &str) -> Option<Symbol> {
        self.symbols.get(name).copied()
    }

    /// All named symbols, ordered by name.
    #[must_use]
    pub fn symbols(&self) -> &BTreeMap<String, Symbol> {
        &self.symbols
    }

    /// The resolved rule bound to `name`.
    #[must_use]
    pub fn rule(&self, name: &str) -> Option<&Expr> {
        self.rules.get(name)
    }

    /// The resolved entry rule.
    ///
    /// # Errors
    /// Returns [`CompileError::MissingEntryRule`] when no `Main` rule exists.
    pub fn main(&self) -> Result<&Expr, CompileError> {
        self.rule(MAIN).ok_or(CompileError::MissingEntryRule)
    }

    pub(crate) fn into_symbols(self) -> BTreeMap<String, Symbol> {
        self.symbols
    }

    fn bind_symbol(&mut self, name: String, value: Symbol) {
        if self.symbols.insert(name.clone(), value).is_none() {
            self.alphabet_size += 1;
        }
        self.rules.insert(name, Expr::Literal(value));
    }
}
