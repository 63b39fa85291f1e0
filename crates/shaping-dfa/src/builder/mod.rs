//! Compilation from rule statements to an [`Automaton`].

mod positions;
pub(crate) mod subset;

use crate::ast::{Expr, Statement, Symbol};
use crate::automaton::Automaton;
use crate::errors::CompileError;
use crate::symbols::SymbolTable;

/// Configurable entry point for compiling a grammar.
///
/// # Examples
/// ```
/// use shaping_dfa::{Compiler, Expr, RepeatOp, Statement};
///
/// let automaton = Compiler::new()
///     .with_min_alphabet_size(2)
///     .compile(&[Statement::assign(
///         "Main",
///         Expr::repeat(Expr::literal(1), RepeatOp::OneOrMore),
///     )])
///     .expect("grammar compiles");
/// assert_eq!(automaton.alphabet_size(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Compiler {
    external: Vec<(String, Symbol)>,
    min_alphabet_size: usize,
}

impl Compiler {
    /// A compiler with no external symbols.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-register host-owned symbols, e.g. shaping category codes.
    #[must_use]
    pub fn with_external_symbols<N: Into<String>>(
        mut self,
        symbols: impl IntoIterator<Item = (N, Symbol)>,
    ) -> Self {
        for (name, value) in symbols {
            self.external.push((name.into(), value));
        }
        self
    }

    /// Guarantee at least `size` alphabet symbols, named or not.
    #[must_use]
    pub fn with_min_alphabet_size(mut self, size: usize) -> Self {
        self.min_alphabet_size = size;
        self
    }

    /// Resolve `statements` and build the automaton for their `Main` rule.
    ///
    /// # Errors
    /// Returns [`CompileError`] when a reference is undefined, `Main` is
    /// missing, a literal falls outside the alphabet or the automaton grows
    /// beyond the state id range. No partial automaton is produced.
    pub fn compile(&self, statements: &[Statement]) -> Result<Automaton, CompileError> {
        let mut table = SymbolTable::new(self.external.iter().cloned());
        table.process(statements)?;
        table.reserve_alphabet(self.min_alphabet_size);
        build(table)
    }
}

/// Compile `statements` with `external` symbols pre-registered.
///
/// # Errors
/// See [`Compiler::compile`].
pub fn compile<N: Into<String>>(
    statements: &[Statement],
    external: impl IntoIterator<Item = (N, Symbol)>,
) -> Result<Automaton, CompileError> {
    Compiler::new()
        .with_external_symbols(external)
        .compile(statements)
}

/// Build the automaton for the `Main` rule of a fully processed table.
///
/// # Errors
/// Returns [`CompileError::MissingEntryRule`] when `Main` is unbound, and
/// range or size errors from construction.
pub fn build(table: SymbolTable) -> Result<Automaton, CompileError> {
    let alphabet_size = table.alphabet_size();
    let root = Expr::concat(table.main()?.clone(), Expr::EndMarker);
    let positions = positions::Positions::build(&root, alphabet_size)?;
    let tables = subset::construct(&positions, alphabet_size)?;
    let automaton = Automaton::new(alphabet_size, tables, table.into_symbols());
    log::debug!(
        "compiled {} positions into {} states over {} symbols",
        positions.len(),
        automaton.state_count(),
        alphabet_size
    );
    Ok(automaton)
}
