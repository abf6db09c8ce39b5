//! The `curator run` command: curate a dataset root end to end.

use clap::Args;
use curator_core::{Config, CurationError, Curator, CuratorError};
use std::path::PathBuf;

/// Arguments for the `run` command.
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Dataset root whose subdirectories hold images and labels
    #[arg(required = true)]
    pub root: PathBuf,

    /// Vision model identifier (overrides config)
    #[arg(long)]
    pub model: Option<String>,

    /// Completions requested per image (overrides config)
    #[arg(long)]
    pub samples: Option<usize>,

    /// Maximum simultaneous in-flight requests (overrides config)
    #[arg(long)]
    pub max_parallel: Option<usize>,

    /// File holding the API key
    #[arg(long, env = "CURATOR_KEY_FILE")]
    pub key_file: Option<PathBuf>,

    /// File holding the prompt text
    #[arg(long, env = "CURATOR_PROMPT_FILE")]
    pub prompt_file: Option<PathBuf>,

    /// Skip writing the combined CSV after curation
    #[arg(long)]
    pub no_aggregate: bool,
}

/// Execute the run command.
pub async fn execute(args: RunArgs, mut config: Config) -> anyhow::Result<()> {
    if let Some(model) = args.model {
        config.query.model = model;
    }
    if let Some(samples) = args.samples {
        config.query.samples_per_image = samples;
    }
    if let Some(max_parallel) = args.max_parallel {
        config.throttle.max_parallel_requests = max_parallel;
    }
    if let Some(key_file) = args.key_file {
        config.query.key_file = key_file;
    }
    if let Some(prompt_file) = args.prompt_file {
        config.query.prompt_file = prompt_file;
    }
    config.validate().map_err(CuratorError::Config)?;

    let curator = match Curator::new(&config) {
        Err(CurationError::MissingCredentials { path }) => {
            anyhow::bail!(
                "No API key found at: {}\nWrite your inference-service key to that file, \
                 or point --key-file at it.",
                path.display()
            );
        }
        other => other.map_err(CuratorError::Curation)?,
    };

    let processed = curator
        .process_all(&args.root)
        .await
        .map_err(CuratorError::Curation)?;
    tracing::info!("Run complete: {processed} images processed");

    if !args.no_aggregate {
        let rows = curator_core::aggregate(
            &args.root,
            &config.curation.ledger_file,
            &config.curation.aggregate_file,
        )
        .map_err(CuratorError::Curation)?;
        println!(
            "Processed {processed} images; {rows} rows in {}",
            args.root.join(&config.curation.aggregate_file).display()
        );
    } else {
        println!("Processed {processed} images");
    }

    Ok(())
}
