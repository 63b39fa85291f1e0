//! Command-line front end for `shaping-dfa`.
//!
//! Compiles rule files, reports automaton statistics and runs the matcher
//! over symbol sequences given on the command line.
//!
//! # Configuration
//!
//! - `SHAPING_DFA_LOG_LEVEL`: log verbosity (trace, debug, info, warn,
//!   error), overridden by `--log-level`.

pub mod config;
pub mod error;
pub mod input;
pub mod logging;
pub mod output;
