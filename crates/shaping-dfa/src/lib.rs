//! Rule-grammar to DFA compilation and run matching for text shaping.
//!
//! Script-specific shaping rules are written as small regular grammars over
//! integer symbols (shaping categories). This crate resolves named rules into
//! one expression tree, compiles it into a deterministic automaton with the
//! `followpos` subset construction, and scans symbol sequences for
//! non-overlapping runs, reporting the zero-width tags reached along the way.
//!
//! ```
//! use shaping_dfa::{compile, Expr, RepeatOp, Statement};
//!
//! let statements = [
//!     Statement::assign("Syllable", Expr::concat(Expr::variable("C"), Expr::variable("V"))),
//!     Statement::assign(
//!         "Main",
//!         Expr::tagged("syllable", Expr::repeat(Expr::variable("Syllable"), RepeatOp::OneOrMore)),
//!     ),
//! ];
//! let automaton = compile(&statements, [("C", 0), ("V", 1)]).expect("grammar compiles");
//! let runs = automaton.match_all(&[0, 1, 0, 1, 1]).expect("input is in range");
//! assert_eq!(runs.len(), 1);
//! assert_eq!(runs.first().map(|m| m.range()), Some(0..=3));
//! ```

mod ast;
mod automaton;
mod builder;
mod errors;
mod matcher;
mod symbols;

pub use ast::{Expr, RepeatOp, Statement, Symbol};
pub use automaton::{Automaton, FAIL_STATE, INITIAL_STATE, StateId};
pub use builder::{Compiler, build, compile};
pub use errors::{AlphabetRangeError, CompileError};
pub use matcher::{Match, Matches, TagAction, TagActions};
pub use symbols::{MAIN, SymbolTable};
