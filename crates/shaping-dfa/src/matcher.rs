//! Scanning symbol sequences with a compiled [`Automaton`].
//!
//! The scan is a single left-to-right pass with one table lookup per symbol.
//! When a transition fails, the pending run (if it ever accepted) is emitted
//! with the tags of the state reached just before the failure, and the
//! failing symbol is fed to the initial state again rather than skipped. A
//! run that reaches the end of input is emitted with the tags of the final
//! state.

use std::collections::BTreeSet;
use std::fmt;
use std::iter::FusedIterator;
use std::ops::RangeInclusive;

use hashbrown::HashMap;

use crate::ast::Symbol;
use crate::automaton::{Automaton, FAIL_STATE, INITIAL_STATE, StateId};
use crate::errors::AlphabetRangeError;

static NO_TAGS: BTreeSet<String> = BTreeSet::new();

/// One matched run of the input.
///
/// `end` is inclusive. `tags` borrows the tag set of the state the run was
/// reported from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Match<'a> {
    /// Index of the first symbol of the run.
    pub start: usize,
    /// Index of the last accepted symbol of the run.
    pub end: usize,
    /// Tags of the state the run was reported from.
    pub tags: &'a BTreeSet<String>,
}

impl Match<'_> {
    /// Number of symbols covered by the run.
    #[must_use]
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start).saturating_add(1)
    }

    /// Always `false`: a run covers at least one symbol.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.end < self.start
    }

    /// Indices covered by the run.
    #[must_use]
    pub fn range(&self) -> RangeInclusive<usize> {
        self.start..=self.end
    }

    /// Whether the run carries the tag `name`.
    #[must_use]
    pub fn has_tag(&self, name: &str) -> bool {
        self.tags.contains(name)
    }
}

/// Callback invoked for a tagged run with `(start, len, matched_symbols)`.
pub type TagAction<'f> = Box<dyn FnMut(usize, usize, &[Symbol]) + 'f>;

/// Tag name to callback registry used by [`Automaton::apply`].
///
/// # Examples
/// ```
/// use shaping_dfa::TagActions;
///
/// let mut seen = Vec::new();
/// let actions = TagActions::new()
///     .on("syllable", |start, len, _| seen.push((start, len)));
/// assert!(actions.contains("syllable"));
/// ```
#[derive(Default)]
pub struct TagActions<'f> {
    actions: HashMap<String, TagAction<'f>>,
}

impl<'f> TagActions<'f> {
    /// An empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `action` for runs tagged `name`, replacing any earlier one.
    #[must_use]
    pub fn on(
        mut self,
        name: impl Into<String>,
        action: impl FnMut(usize, usize, &[Symbol]) + 'f,
    ) -> Self {
        self.insert(name, action);
        self
    }

    /// Register `action` for runs tagged `name`, replacing any earlier one.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        action: impl FnMut(usize, usize, &[Symbol]) + 'f,
    ) {
        self.actions.insert(name.into(), Box::new(action));
    }

    /// Whether a callback is registered for `name`.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.actions.contains_key(name)
    }

    fn get_mut(&mut self, name: &str) -> Option<&mut TagAction<'f>> {
        self.actions.get_mut(name)
    }
}

impl fmt::Debug for TagActions<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<_> = self.actions.keys().collect();
        names.sort();
        f.debug_struct("TagActions").field("tags", &names).finish()
    }
}

/// Lazy iterator over the runs of one input, created by
/// [`Automaton::matches`].
#[derive(Debug, Clone)]
pub struct Matches<'a> {
    automaton: &'a Automaton,
    input: &'a [Symbol],
    position: usize,
    state: StateId,
    start_run: Option<usize>,
    last_accepting: Option<usize>,
    flushed: bool,
}

impl<'a> Matches<'a> {
    fn new(automaton: &'a Automaton, input: &'a [Symbol]) -> Self {
        Self {
            automaton,
            input,
            position: 0,
            state: INITIAL_STATE,
            start_run: None,
            last_accepting: None,
            flushed: false,
        }
    }

    fn step(&self, state: StateId, symbol: Symbol) -> StateId {
        self.automaton
            .transition(state, symbol)
            .unwrap_or(FAIL_STATE)
    }

    /// The run awaiting emission, reported with the tags of `state`.
    fn pending(&self, state: StateId) -> Option<Match<'a>> {
        match (self.start_run, self.last_accepting) {
            (Some(start), Some(end)) if end >= start => Some(Match {
                start,
                end,
                tags: self.automaton.tags(state).unwrap_or(&NO_TAGS),
            }),
            _ => None,
        }
    }
}

impl<'a> Iterator for Matches<'a> {
    type Item = Match<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(&symbol) = self.input.get(self.position) {
            let index = self.position;
            self.position += 1;

            let previous = self.state;
            self.state = self.step(previous, symbol);

            let mut emitted = None;
            if self.state == FAIL_STATE {
                emitted = self.pending(previous);
                self.state = self.step(INITIAL_STATE, symbol);
                self.start_run = None;
            }

            if self.state != FAIL_STATE && self.start_run.is_none() {
                self.start_run = Some(index);
            }
            if self.automaton.is_accepting(self.state) {
                self.last_accepting = Some(index);
            }
            if self.state == FAIL_STATE {
                self.state = INITIAL_STATE;
            }

            if emitted.is_some() {
                return emitted;
            }
        }

        if self.flushed {
            return None;
        }
        self.flushed = true;
        self.pending(self.state)
    }
}

impl FusedIterator for Matches<'_> {}

impl Automaton {
    /// Scan `input` for runs.
    ///
    /// # Errors
    /// Returns [`AlphabetRangeError`] for the first symbol outside the
    /// alphabet, before any run is reported.
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
    /// let runs: Vec<_> = automaton
    ///     .matches(&[1, 1, 0, 1])
    ///     .expect("input is in range")
    ///     .map(|m| m.range())
    ///     .collect();
    /// assert_eq!(runs, vec![0..=1, 3..=3]);
    /// ```
    pub fn matches<'a>(&'a self, input: &'a [Symbol]) -> Result<Matches<'a>, AlphabetRangeError> {
        if let Some((index, &symbol)) = input
            .iter()
            .enumerate()
            .find(|&(_, &symbol)| symbol as usize >= self.alphabet_size())
        {
            return Err(AlphabetRangeError::new(
                symbol,
                self.alphabet_size(),
                Some(index),
            ));
        }
        Ok(Matches::new(self, input))
    }

    /// Collect every run of `input`.
    ///
    /// # Errors
    /// See [`Automaton::matches`].
    pub fn match_all<'a>(
        &'a self,
        input: &'a [Symbol],
    ) -> Result<Vec<Match<'a>>, AlphabetRangeError> {
        Ok(self.matches(input)?.collect())
    }

    /// Invoke the registered callback for every tag of every run.
    ///
    /// Each callback receives the run start, its length and the matched
    /// symbols. `start` is an index into the whole of `input`, while the
    /// slice holds only the symbols of the run, so `slice[0]` is
    /// `input[start]`. Tags of one run are visited in name order.
    ///
    /// # Errors
    /// See [`Automaton::matches`]; no callback runs when the input is
    /// rejected.
    pub fn apply(
        &self,
        input: &[Symbol],
        actions: &mut TagActions<'_>,
    ) -> Result<(), AlphabetRangeError> {
        for run in self.matches(input)? {
            let matched = input.get(run.range()).unwrap_or_default();
            for tag in run.tags {
                if let Some(action) = actions.get_mut(tag) {
                    action(run.start, run.len(), matched);
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Expr, RepeatOp, Statement};
    use crate::builder::Compiler;

    fn automaton(main: Expr, alphabet_size: usize) -> Automaton {
        Compiler::new()
            .with_min_alphabet_size(alphabet_size)
            .compile(&[Statement::assign("Main", main)])
            .unwrap_or_else(|err| panic!("grammar should compile: {err}"))
    }

    fn spans(automaton: &Automaton, input: &[Symbol]) -> Vec<(usize, usize)> {
        automaton
            .matches(input)
            .unwrap_or_else(|err| panic!("input should be in range: {err}"))
            .map(|m| (m.start, m.end))
            .collect()
    }

    #[test]
    fn never_accepting_grammar_yields_nothing() {
        // `0 1` over an input that never completes it.
        let dfa = automaton(Expr::concat(Expr::literal(0), Expr::literal(1)), 2);
        assert!(spans(&dfa, &[0, 0, 0]).is_empty());
        assert!(spans(&dfa, &[]).is_empty());
    }

    #[test]
    fn flushes_run_at_end_of_input() {
        let dfa = automaton(Expr::repeat(Expr::literal(0), RepeatOp::OneOrMore), 2);
        assert_eq!(spans(&dfa, &[1, 0, 0]), vec![(1, 2)]);
    }

    #[test]
    fn restart_failure_resets_to_initial_state() {
        // 2 has no transition anywhere, so the restart fails as well.
        let dfa = automaton(Expr::literal(0), 3);
        assert_eq!(spans(&dfa, &[0, 2, 2, 0]), vec![(0, 0), (3, 3)]);
    }

    #[test]
    fn reports_longest_accepted_prefix_of_a_failed_run() {
        // 0 | 0 1 2: the run over `0 1` fails on `0` and falls back to index 0.
        let main = Expr::alt(
            Expr::literal(0),
            Expr::concat(
                Expr::concat(Expr::literal(0), Expr::literal(1)),
                Expr::literal(2),
            ),
        );
        let dfa = automaton(main, 3);
        assert_eq!(spans(&dfa, &[0, 1, 0]), vec![(0, 0), (2, 2)]);
    }

    #[test]
    fn rejects_out_of_range_symbols_up_front() {
        let dfa = automaton(Expr::literal(0), 2);
        let Err(err) = dfa.matches(&[0, 1, 5, 0]) else {
            panic!("symbol 5 should be rejected");
        };
        assert_eq!(err, AlphabetRangeError::new(5, 2, Some(2)));
    }

    #[test]
    fn match_reports_length_and_tags() {
        let tags = BTreeSet::from(["a".to_string()]);
        let run = Match {
            start: 3,
            end: 5,
            tags: &tags,
        };
        assert_eq!(run.len(), 3);
        assert!(!run.is_empty());
        assert!(run.has_tag("a"));
        assert!(!run.has_tag("b"));
    }

    #[test]
    fn debug_lists_registered_tags() {
        let actions = TagActions::new()
            .on("b", |_, _, _| {})
            .on("a", |_, _, _| {});
        assert_eq!(format!("{actions:?}"), r#"TagActions { tags: ["a", "b"] }"#);
    }
    #[test]
    fn apply_reports_offsets_into_the_whole_input() {
        let dfa = automaton(
            Expr::tagged("run", Expr::repeat(Expr::literal(1), RepeatOp::OneOrMore)),
            3,
        );
        let mut calls = Vec::new();
        let mut actions = TagActions::new();
        actions.insert("run", |start, len, matched: &[Symbol]| {
            calls.push((start, len, matched.to_vec()));
        });
        dfa.apply(&[0, 2, 1, 1, 0, 1], &mut actions)
            .unwrap_or_else(|err| panic!("input should be in range: {err}"));
        drop(actions);
        assert_eq!(calls, vec![(2, 2, vec![1, 1]), (5, 1, vec![1])]);
    }
}
