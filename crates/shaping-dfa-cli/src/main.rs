//! Compile shaping rule files and match symbol sequences against them.

use std::io::Write;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use eyre::{Result, WrapErr};
use tracing::{debug, info};

use shaping_dfa_cli::config::{CliConfig, LogLevel};
use shaping_dfa_cli::error::CliError;
use shaping_dfa_cli::input::{GrammarSource, resolve_symbols};
use shaping_dfa_cli::logging::init_logging;
use shaping_dfa_cli::output::{write_matches, write_summary};

/// Compile rule grammars into automata and scan symbol sequences.
#[derive(Parser, Debug)]
#[command(name = "shaping-dfa", version, about)]
struct Cli {
    /// Log level (trace, debug, info, warn, error).
    #[arg(long, global = true)]
    log_level: Option<LogLevel>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Compile a rule file and print automaton statistics.
    Check(GrammarArgs),
    /// Compile a rule file and print the runs found in a symbol sequence.
    Match {
        #[command(flatten)]
        grammar: GrammarArgs,
        /// Input symbols, as integer codes or symbol names.
        #[arg(required = true)]
        symbols: Vec<String>,
    },
}

#[derive(Args, Debug)]
struct GrammarArgs {
    /// Rule text file.
    rules: PathBuf,
    /// JSON object mapping external symbol names to codes.
    #[arg(long = "symbols", value_name = "FILE")]
    symbols_file: Option<PathBuf>,
    /// Minimum alphabet size.
    #[arg(long, value_name = "N")]
    alphabet: Option<usize>,
}

impl GrammarArgs {
    fn source(&self) -> GrammarSource<'_> {
        GrammarSource {
            rules: &self.rules,
            symbols: self.symbols_file.as_deref(),
            alphabet: self.alphabet,
        }
    }
}

fn main() {
    let cli = Cli::parse();

    let config = match build_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            init_logging(&CliConfig::default());
            tracing::error!(error = %e, "invalid configuration");
            std::process::exit(2);
        }
    };
    init_logging(&config);

    if let Err(e) = run(&cli.command) {
        tracing::error!("{e:#}");
        std::process::exit(1);
    }
}

fn build_config(cli: &Cli) -> Result<CliConfig, CliError> {
    let config = CliConfig::from_env()?;
    Ok(config.apply_overrides(cli.log_level))
}

fn run(command: &Commands) -> Result<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match command {
        Commands::Check(grammar) => handle_check(&mut out, grammar),
        Commands::Match { grammar, symbols } => handle_match(&mut out, grammar, symbols),
    }?;
    out.flush().wrap_err("failed to flush output")
}

fn compile(grammar: &GrammarArgs) -> Result<shaping_dfa::Automaton> {
    let _span = tracing::info_span!("compile", rules = %grammar.rules.display()).entered();
    let automaton = grammar
        .source()
        .compile()
        .wrap_err_with(|| format!("failed to compile {}", grammar.rules.display()))?;
    info!(
        states = automaton.state_count(),
        alphabet = automaton.alphabet_size(),
        "compiled grammar"
    );
    Ok(automaton)
}

/// Handle the `check` subcommand by printing automaton statistics.
fn handle_check(out: &mut dyn Write, grammar: &GrammarArgs) -> Result<()> {
    let automaton = compile(grammar)?;
    write_summary(out, &automaton)
}

/// Handle the `match` subcommand by printing one JSON record per run.
fn handle_match(out: &mut dyn Write, grammar: &GrammarArgs, args: &[String]) -> Result<()> {
    let automaton = compile(grammar)?;
    let _span = tracing::info_span!("match", symbols = args.len()).entered();
    let input = resolve_symbols(&automaton, args).wrap_err("failed to read input symbols")?;
    let runs = automaton
        .matches(&input)
        .map_err(CliError::from)
        .wrap_err("input does not fit the grammar")?;
    let count = write_matches(out, runs)?;
    debug!(runs = count, "matched input");
    Ok(())
}
