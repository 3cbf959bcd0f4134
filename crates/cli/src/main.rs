mod output;

use anyhow::{Context, Result};
use clap::{CommandFactory, FromArgMatches, Parser};
use colored::Colorize;
use data_loader::{RecordStore, DEFAULT_DATA_FILE};
use pipeline::{FlagRegistry, QueryRequest};
use std::io::{self, Write};
use std::path::Path;
use std::time::Instant;

/// movie-query - filter, rank and summarize the IMDb Top 1000
#[derive(Parser, Debug)]
#[command(name = "movie-query")]
#[command(
    about = "Filter, rank and summarize a movie dataset from command-line flags",
    override_usage = "movie-query [DATA_FILE] [--flag value]..."
)]
struct Cli {
    /// Optional data file (defaults to data/imdb_top_1000.csv) followed by
    /// --flag value pairs
    #[arg(
        value_name = "ARGS",
        trailing_var_arg = true,
        allow_hyphen_values = true,
        num_args = 0..
    )]
    args: Vec<String>,
}

fn main() -> Result<()> {
    // Logs go to stderr so stdout only carries query output
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let registry = FlagRegistry::standard();
    let matches = Cli::command()
        .after_help(format!("Flags:\n{}", registry.help_text()))
        .get_matches();
    let cli = Cli::from_arg_matches(&matches)?;

    let request = QueryRequest::from_args(cli.args.as_slice(), &registry)?;

    let data_file = request.data_file_or(Path::new(DEFAULT_DATA_FILE));
    if request.data_file.is_none() {
        tracing::info!("No data file given, using {}", DEFAULT_DATA_FILE);
    }

    let start = Instant::now();
    let store = RecordStore::load_from_file(data_file)
        .with_context(|| format!("Failed to load movie dataset from {}", data_file.display()))?;
    tracing::info!("Loaded {} movies in {:?}", store.len(), start.elapsed());

    let outcome = request.run(store.records());

    let mut stdout = io::stdout().lock();
    let printed = match &request.output {
        Some(path) => {
            output::export(&outcome.result, path)?;
            writeln!(
                stdout,
                "{} Wrote {} rows to {}",
                "✓".green(),
                outcome.result.len(),
                path.display()
            )
        }
        None => output::print_console(&mut stdout, &outcome, &request),
    };
    output::ignore_broken_pipe(printed).context("Failed to write to stdout")?;

    Ok(())
}
