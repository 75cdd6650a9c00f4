//! Deck-Search main entry point
//!
//! This is the command-line interface for the Deck-Search paginated searcher.

use anyhow::Context;
use clap::Parser;
use deck_search::config::{load_config_or_default, validate};
use deck_search::output::{print_statistics, write_top_records, RunStatistics};
use deck_search::search::{run_search, SearchTerm};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

/// Deck-Search: concurrent paginated search over Speaker Deck
///
/// Discovers how many result pages a search has, fetches them all
/// concurrently, and prints the most recent talks first.
#[derive(Parser, Debug)]
#[command(name = "deck-search")]
#[command(version)]
#[command(about = "Concurrent paginated Speaker Deck search", long_about = None)]
struct Cli {
    /// Search term; multiple words are joined with spaces
    #[arg(value_name = "TERM")]
    term: Vec<String>,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Maximum number of result pages to fetch
    #[arg(long, value_name = "N")]
    max_pages: Option<u32>,

    /// Number of records to print
    #[arg(long, value_name = "K")]
    top: Option<usize>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// Logs go to stderr; stdout carries only search results.
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("deck_search=info,warn"),
            1 => EnvFilter::new("deck_search=debug,info"),
            2 => EnvFilter::new("deck_search=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Runs one search and prints its results
async fn run(cli: Cli) -> anyhow::Result<()> {
    // Checked before any config loading or network activity
    let term = SearchTerm::from_args(&cli.term)?;

    let mut config = load_config_or_default(cli.config.as_deref()).with_context(|| {
        match &cli.config {
            Some(path) => format!("Failed to load configuration from {}", path.display()),
            None => "Invalid default configuration".to_string(),
        }
    })?;

    if let Some(max_pages) = cli.max_pages {
        config.search.max_pages = max_pages;
    }
    if let Some(top) = cli.top {
        config.search.top = top;
    }
    validate(&config).context("Invalid command-line override")?;

    tracing::debug!(
        "Limits: max {} pages, {} concurrent fetches",
        config.search.max_pages,
        config.search.max_concurrent_fetches
    );

    let start_time = Instant::now();
    let result = run_search(&config, &term).await?;

    let stdout = std::io::stdout();
    let mut handle = stdout.lock();
    write_top_records(&result, config.search.top, &mut handle)?;

    if !cli.quiet {
        print_statistics(&RunStatistics::from_result(&result, start_time.elapsed()));
    }

    Ok(())
}
