//! kqxs CLI
//!
//! Local execution entry point. For AWS Lambda, use `kqxs-lambda`.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use futures::stream::{self, StreamExt};
use serde_json::json;

use kqxs_ingest::error::Result;
use kqxs_ingest::models::{Config, GameType};
use kqxs_ingest::pipeline::ResultPipeline;
use kqxs_ingest::utils::http::HttpFetcher;

/// kqxs - Vietnamese lottery results ingester
#[derive(Parser, Debug)]
#[command(
    name = "kqxs",
    version,
    about = "Fetches lottery draw results into one canonical feed"
)]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch canonical results for one game
    Fetch {
        /// Game selector (xsmb, mega645, power655, keno, bingo18)
        #[arg(long)]
        game: GameType,

        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Fetch every registered game
    FetchAll {
        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,

        /// Maximum concurrent upstream requests
        #[arg(long, default_value_t = 3)]
        concurrency: usize,
    },

    /// List registered game selectors
    Games,

    /// Validate the configuration file
    Validate,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = Config::load_or_default(&cli.config);

    match cli.command {
        Command::Fetch { game, pretty } => {
            let pipeline = build_pipeline(&config)?;
            let outcome = pipeline.run(game).await?;

            log::info!(
                "{game}: {} records ({} skipped, {} dropped)",
                outcome.records.len(),
                outcome.skipped,
                outcome.dropped
            );
            print_json(&outcome.records, pretty)?;
        }

        Command::FetchAll {
            pretty,
            concurrency,
        } => {
            let pipeline = Arc::new(build_pipeline(&config)?);
            let games = pipeline.registered_games();
            log::info!("Fetching {} registered games...", games.len());

            let mut runs = stream::iter(games)
                .map(|game| {
                    let pipeline = Arc::clone(&pipeline);
                    async move { (game, pipeline.run(game).await) }
                })
                .buffer_unordered(concurrency.max(1));

            // Keyed by selector; per-game failures are reported in place so
            // one dead upstream never sinks the batch.
            let mut by_game = serde_json::Map::new();
            while let Some((game, result)) = runs.next().await {
                match result {
                    Ok(outcome) => {
                        log::info!("{game}: {} records", outcome.records.len());
                        by_game.insert(game.to_string(), serde_json::to_value(&outcome.records)?);
                    }
                    Err(error) => {
                        log::warn!("{game}: {error}");
                        by_game.insert(game.to_string(), json!({ "error": error.to_string() }));
                    }
                }
            }

            print_json(&serde_json::Value::Object(by_game), pretty)?;
        }

        Command::Games => {
            let pipeline = build_pipeline(&config)?;
            for game in pipeline.registered_games() {
                println!("{game}");
            }
        }

        Command::Validate => {
            log::info!("Validating configuration...");
            config.validate()?;
            log::info!("Config OK ({} sources registered)", config.sources.len());
        }
    }

    Ok(())
}

fn build_pipeline(config: &Config) -> Result<ResultPipeline> {
    let fetch = Arc::new(HttpFetcher::new(&config.http)?);
    ResultPipeline::new(config, fetch)
}

fn print_json<T: serde::Serialize>(value: &T, pretty: bool) -> Result<()> {
    let text = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{text}");
    Ok(())
}
