//! The compiled, immutable automaton.

use std::collections::{BTreeMap, BTreeSet};

use crate::ast::Symbol;
use crate::builder::subset::Tables;

/// Index of an automaton state.
pub type StateId = u32;

/// The absorbing state reached when no transition exists.
pub const FAIL_STATE: StateId = 0;

/// The state every run starts from.
pub const INITIAL_STATE: StateId = 1;

/// A deterministic automaton over integer symbols.
///
/// Owns flat tables only: a row-major `[state][symbol]` transition table,
/// one acceptance flag and one tag set per state, and the named symbols the
/// grammar defined. It never changes after compilation, so it can be shared
/// freely between threads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Automaton {
    alphabet_size: usize,
    transitions: Vec<StateId>,
    accepting: Vec<bool>,
    tags: Vec<BTreeSet<String>>,
    symbols: BTreeMap<String, Symbol>,
}

impl Automaton {
    pub(crate) fn new(
        alphabet_size: usize,
        tables: Tables,
        symbols: BTreeMap<String, Symbol>,
    ) -> Self {
        Self {
            alphabet_size,
            transitions: tables.transitions,
            accepting: tables.accepting,
            tags: tables.tags,
            symbols,
        }
    }

    /// Number of symbols each state has a transition column for.
    #[must_use]
    pub fn alphabet_size(&self) -> usize {
        self.alphabet_size
    }

    /// Number of states, including the fail state.
    #[must_use]
    pub fn state_count(&self) -> usize {
        self.accepting.len()
    }

    /// Next state from `state` on `symbol`.
    ///
    /// Returns `None` when either index is out of range; a missing
    /// transition is [`FAIL_STATE`].
    #[must_use]
    pub fn transition(&self, state: StateId, symbol: Symbol) -> Option<StateId> {
        if symbol as usize >= self.alphabet_size {
            return None;
        }
        (state as usize)
            .checked_mul(self.alphabet_size)
            .and_then(|row| row.checked_add(symbol as usize))
            .and_then(|cell| self.transitions.get(cell))
            .copied()
    }

    /// Whether reaching `state` completes a match.
    #[must_use]
    pub fn is_accepting(&self, state: StateId) -> bool {
        self.accepting.get(state as usize).copied().unwrap_or(false)
    }

    /// Names of the tags present in `state`.
    #[must_use]
    pub fn tags(&self, state: StateId) -> Option<&BTreeSet<String>> {
        self.tags.get(state as usize)
    }

    /// Number of accepting states.
    #[must_use]
    pub fn accepting_count(&self) -> usize {
        self.accepting
            .iter()
            .filter(|&&accepting| accepting)
            .count()
    }

    /// Symbol code bound to `name` by the grammar or the host.
    #[must_use]
    pub fn symbol(&self, name: &str) -> Option<Symbol> {
        self.symbols.get(name).copied()
    }

    /// All named symbols, ordered by name.
    #[must_use]
    pub fn symbols(&self) -> &BTreeMap<String, Symbol> {
        &self.symbols
    }
}
