//! Curator CLI - Grade labeled image datasets with a vision model.
//!
//! Curator queries a multimodal inference service for descriptions of each
//! image in a labeled dataset, scores the descriptions against the
//! ground-truth labels, and records everything in resumable CSV ledgers.
//!
//! # Usage
//!
//! ```bash
//! # Curate every subdirectory of a dataset root
//! curator run ./data/
//!
//! # Re-combine the per-directory ledgers
//! curator aggregate ./data/
//!
//! # View configuration
//! curator config show
//! ```

use clap::{Parser, Subcommand};

mod cli;
mod logging;

/// Curator - Grade labeled image datasets with a vision model.
#[derive(Parser, Debug)]
#[command(name = "curator")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Curate a dataset root: query, score, and record every image
    Run(cli::run::RunArgs),

    /// Combine per-directory ledgers into one CSV
    Aggregate(cli::aggregate::AggregateArgs),

    /// View and manage configuration
    Config(cli::config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging from config, with CLI verbose override.
    // Note: logging isn't initialized yet, so use eprintln for config warnings.
    let config = match curator_core::Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!(
                "Warning: Failed to load config: {e}\n  \
                 Using default configuration. Check your config file with `curator config path`."
            );
            curator_core::Config::default()
        }
    };
    logging::init_from_config(&config, cli.verbose, cli.json_logs);

    tracing::debug!("Curator v{}", curator_core::VERSION);

    // Dispatch to the appropriate command handler
    match cli.command {
        Commands::Run(args) => cli::run::execute(args, config).await,
        Commands::Aggregate(args) => cli::aggregate::execute(args, config).await,
        Commands::Config(args) => cli::config::execute(args).await,
    }
}
