//! Command-line front end for the math tutor
//!
//! Answers the query given as arguments, or every non-empty stdin line when
//! no query is given.

use anyhow::{Context, Result};
use clap::Parser;
use mathly::{FormulaBook, Tutor, TutorConfig};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter
const LOG_ENV: &str = "MATHLY_LOG";

#[derive(Debug, Parser)]
#[command(name = "mathly", version, about = "Step-by-step answers to math questions")]
struct Cli {
    /// The question; words are joined with spaces
    query: Vec<String>,

    /// JSON configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// JSON formula book replacing the built-in one
    #[arg(short, long, value_name = "FILE")]
    formulas: Option<PathBuf>,

    /// Print the problem type instead of the answer
    #[arg(long)]
    classify: bool,

    /// Search the formula book instead of answering
    #[arg(short, long, value_name = "TERM")]
    search: Option<String>,

    /// Log pipeline decisions to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    let mut config = match &cli.config {
        Some(path) => TutorConfig::from_json_file(path)
            .with_context(|| format!("loading configuration from {}", path.display()))?,
        None => TutorConfig::default(),
    };
    if let Some(path) = &cli.formulas {
        // Fail early with the path in the message
        FormulaBook::from_json_file(path)
            .with_context(|| format!("loading formulas from {}", path.display()))?;
        config.formula_file = Some(path.clone());
    }
    let tutor = Tutor::from_config(config).context("building tutor")?;

    let stdout = io::stdout();
    let mut out = stdout.lock();

    if let Some(term) = &cli.search {
        let found = tutor.formulas().search(term);
        if found.is_empty() {
            writeln!(out, "No formulas mention '{}'.", term)?;
        }
        for line in found {
            writeln!(out, "{}", line)?;
        }
        return Ok(());
    }

    let answer = |query: &str| {
        if cli.classify {
            tutor.classify(query).to_string()
        } else {
            tutor.solve(query)
        }
    };

    if !cli.query.is_empty() {
        writeln!(out, "{}", answer(&cli.query.join(" ")))?;
        return Ok(());
    }

    debug!("reading queries from stdin");
    for line in io::stdin().lock().lines() {
        let line = line.context("reading stdin")?;
        if line.trim().is_empty() {
            continue;
        }
        writeln!(out, "{}", answer(&line))?;
        if !cli.classify {
            writeln!(out)?;
        }
    }
    Ok(())
}
