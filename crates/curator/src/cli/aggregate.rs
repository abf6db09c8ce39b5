//! The `curator aggregate` command: re-combine per-directory ledgers.

use clap::Args;
use curator_core::{Config, CuratorError};
use std::path::PathBuf;

/// Arguments for the `aggregate` command.
#[derive(Args, Debug)]
pub struct AggregateArgs {
    /// Dataset root whose subdirectories hold ledgers
    #[arg(required = true)]
    pub root: PathBuf,

    /// Output file name, written at the root (overrides config)
    #[arg(short, long)]
    pub output: Option<String>,
}

/// Execute the aggregate command.
pub async fn execute(args: AggregateArgs, config: Config) -> anyhow::Result<()> {
    let output_file = args
        .output
        .unwrap_or_else(|| config.curation.aggregate_file.clone());

    let rows = curator_core::aggregate(&args.root, &config.curation.ledger_file, &output_file)
        .map_err(CuratorError::Curation)?;

    if rows == 0 {
        println!("No ledgers found under {}", args.root.display());
    } else {
        println!("{rows} rows in {}", args.root.join(&output_file).display());
    }
    Ok(())
}
