//! Helpers for rendering command output.

use std::io::Write;

use eyre::{Result, WrapErr};
use serde::Serialize;
use shaping_dfa::{Automaton, Match};

/// One matched run as printed by `match`.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct MatchRecord<'a> {
    /// First index of the run.
    pub start: usize,
    /// Last index of the run, inclusive.
    pub end: usize,
    /// Tags of the reporting state, sorted.
    pub tags: Vec<&'a str>,
}

impl<'a> From<Match<'a>> for MatchRecord<'a> {
    fn from(run: Match<'a>) -> Self {
        Self {
            start: run.start,
            end: run.end,
            tags: run.tags.iter().map(String::as_str).collect(),
        }
    }
}

/// Write automaton statistics and the symbol table.
///
/// # Errors
///
/// Returns an error when the writer fails.
pub fn write_summary(writer: &mut dyn Write, automaton: &Automaton) -> Result<()> {
    writeln!(
        writer,
        "states: {}\nalphabet: {}\naccepting: {}",
        automaton.state_count(),
        automaton.alphabet_size(),
        automaton.accepting_count()
    )
    .wrap_err("failed to write automaton summary")?;
    if automaton.symbols().is_empty() {
        return Ok(());
    }
    writeln!(writer, "symbols:").wrap_err("failed to write symbol table header")?;
    for (name, value) in automaton.symbols() {
        writeln!(writer, "  {name} = {value}")
            .wrap_err_with(|| format!("failed to write symbol {name}"))?;
    }
    Ok(())
}

/// Write one JSON object per run, one per line.
///
/// # Errors
///
/// Returns an error when a record cannot be serialised or written.
pub fn write_matches<'a>(
    writer: &mut dyn Write,
    runs: impl IntoIterator<Item = Match<'a>>,
) -> Result<usize> {
    let mut count = 0;
    for run in runs {
        let record = MatchRecord::from(run);
        let (start, end) = (record.start, record.end);
        serde_json::to_writer(&mut *writer, &record)
            .wrap_err_with(|| format!("failed to serialise run {start}..={end}"))?;
        writeln!(writer).wrap_err("failed to terminate match record")?;
        count += 1;
    }
    Ok(count)
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "tests exercise fallible writers")]
mod tests {
    use shaping_dfa::{Expr, RepeatOp, Statement, compile};

    use super::*;

    fn automaton() -> Automaton {
        let main = Expr::tagged(
            "run",
            Expr::repeat(Expr::variable("C"), RepeatOp::OneOrMore),
        );
        compile(&[Statement::assign("Main", main)], [("C", 0), ("X", 1)]).unwrap()
    }

    #[test]
    fn summary_lists_statistics_and_symbols() {
        let mut out = Vec::new();
        write_summary(&mut out, &automaton()).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "states: 3\nalphabet: 2\naccepting: 1\nsymbols:\n  C = 0\n  X = 1\n"
        );
    }

    #[test]
    fn matches_are_json_lines() {
        let dfa = automaton();
        let mut out = Vec::new();
        let count = write_matches(&mut out, dfa.matches(&[0, 0, 1, 0]).unwrap()).unwrap();
        assert_eq!(count, 2);
        assert_eq!(
            String::from_utf8(out).unwrap(),
            concat!(
                "{\"start\":0,\"end\":1,\"tags\":[\"run\"]}\n",
                "{\"start\":3,\"end\":3,\"tags\":[\"run\"]}\n",
            )
        );
    }
}
