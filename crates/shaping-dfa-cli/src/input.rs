//! Reading rule files, symbol files and symbol arguments.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use shaping_dfa::{Automaton, Compiler, Symbol};
use shaping_dfa_rules::compile_rules_with;

use crate::error::CliError;

/// Parse a JSON object mapping symbol names to codes.
///
/// # Errors
///
/// Returns the JSON error when `text` is not such an object.
pub fn parse_symbols(text: &str) -> Result<BTreeMap<String, Symbol>, serde_json::Error> {
    serde_json::from_str(text)
}

/// Load the external symbols file at `path`.
///
/// # Errors
///
/// Returns `CliError::Io` when the file cannot be read and
/// `CliError::SymbolsFile` when it does not parse.
pub fn load_symbols(path: &Path) -> Result<BTreeMap<String, Symbol>, CliError> {
    let text = fs::read_to_string(path)?;
    parse_symbols(&text).map_err(|source| CliError::SymbolsFile {
        path: path.to_path_buf(),
        source,
    })
}

/// Where to find a grammar and how to size its alphabet.
#[derive(Debug, Clone, Copy)]
pub struct GrammarSource<'a> {
    /// Rule text file.
    pub rules: &'a Path,
    /// Optional JSON file of external symbols.
    pub symbols: Option<&'a Path>,
    /// Minimum alphabet size.
    pub alphabet: Option<usize>,
}

impl GrammarSource<'_> {
    /// Read and compile the grammar.
    ///
    /// # Errors
    ///
    /// Returns I/O, symbols-file and rule errors.
    pub fn compile(&self) -> Result<Automaton, CliError> {
        let external = match self.symbols {
            Some(path) => load_symbols(path)?,
            None => BTreeMap::new(),
        };
        let text = fs::read_to_string(self.rules)?;
        let compiler = Compiler::new()
            .with_external_symbols(external)
            .with_min_alphabet_size(self.alphabet.unwrap_or_default());
        Ok(compile_rules_with(&text, &compiler)?)
    }
}

/// Translate command-line arguments into symbol codes.
///
/// Each argument is either a decimal code or a name the grammar knows.
///
/// # Errors
///
/// Returns `CliError::UnknownSymbol` for the first argument that is neither.
pub fn resolve_symbols<S: AsRef<str>>(
    automaton: &Automaton,
    args: &[S],
) -> Result<Vec<Symbol>, CliError> {
    args.iter()
        .map(AsRef::as_ref)
        .map(|arg| {
            arg.parse::<Symbol>()
                .ok()
                .or_else(|| automaton.symbol(arg))
                .ok_or_else(|| CliError::UnknownSymbol(arg.to_string()))
        })
        .collect()
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "tests exercise fallible helpers")]
mod tests {
    use std::io::Write;

    use shaping_dfa::compile;
    use shaping_dfa::{Expr, Statement};
    use tempfile::NamedTempFile;

    use super::*;

    fn automaton() -> Automaton {
        compile(
            &[Statement::assign("Main", Expr::variable("C"))],
            [("C", 0), ("V", 1)],
        )
        .unwrap()
    }

    #[test]
    fn parses_symbol_objects() {
        let symbols = parse_symbols(r#"{"V": 1, "C": 0}"#).unwrap();
        assert_eq!(symbols.get("C"), Some(&0));
        assert_eq!(symbols.len(), 2);
    }

    #[test]
    fn rejects_negative_codes() {
        assert!(parse_symbols(r#"{"C": -1}"#).is_err());
    }

    #[test]
    fn names_the_broken_symbols_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "[1, 2]").unwrap();
        let err = load_symbols(file.path()).unwrap_err();
        assert!(matches!(err, CliError::SymbolsFile { .. }));
        assert!(err.to_string().starts_with("invalid symbols file"));
    }

    #[test]
    fn resolves_codes_and_names() {
        assert_eq!(
            resolve_symbols(&automaton(), &["C", "1", "V", "7"]).unwrap(),
            vec![0, 1, 1, 7]
        );
    }

    #[test]
    fn reports_unknown_names() {
        let err = resolve_symbols(&automaton(), &["C", "Q"]).unwrap_err();
        assert_eq!(err.to_string(), "unknown symbol `Q`");
    }

    #[test]
    fn compiles_rules_with_external_symbols() {
        let mut rules = NamedTempFile::new().unwrap();
        write!(rules, "Main = C+;").unwrap();
        let mut symbols = NamedTempFile::new().unwrap();
        write!(symbols, r#"{{"C": 0, "X": 1}}"#).unwrap();
        let automaton = GrammarSource {
            rules: rules.path(),
            symbols: Some(symbols.path()),
            alphabet: Some(4),
        }
        .compile()
        .unwrap();
        assert_eq!(automaton.alphabet_size(), 4);
        assert_eq!(automaton.symbol("X"), Some(1));
    }
}
