//! The `curator config` command for configuration management.

use clap::{Args, Subcommand};
use curator_core::Config;
use std::path::Path;

/// Arguments for the `config` command.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

/// Subcommands for configuration management.
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Display current configuration and the resolved run inputs
    Show,

    /// Show config file path
    Path,

    /// Initialize a new config file with defaults
    Init {
        /// Overwrite existing config file
        #[arg(long)]
        force: bool,
    },
}

/// "found" or "missing" marker for a run input the operator must provide.
fn presence(path: &Path) -> &'static str {
    if path.exists() {
        "found"
    } else {
        "missing"
    }
}

/// Execute the config command.
pub async fn execute(args: ConfigArgs) -> anyhow::Result<()> {
    match args.command {
        ConfigCommand::Show => {
            let config = Config::load()?;
            println!("{}", config.to_toml()?);

            // The run inputs the TOML only names indirectly
            println!("# config file:  {}", Config::default_path().display());
            println!("# model cache:  {}", config.scoring_cache_dir().display());
            println!(
                "# key file:     {} ({})",
                config.query.key_file.display(),
                presence(&config.query.key_file)
            );
            println!(
                "# prompt file:  {} ({})",
                config.query.prompt_file.display(),
                presence(&config.query.prompt_file)
            );
        }

        ConfigCommand::Path => {
            println!("{}", Config::default_path().display());
        }

        ConfigCommand::Init { force } => {
            let path = Config::default_path();

            if path.exists() && !force {
                anyhow::bail!(
                    "Config file already exists at: {}\nUse --force to overwrite.",
                    path.display()
                );
            }

            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }

            let config = Config::default();
            std::fs::write(&path, config.to_toml()?)?;
            println!("Configuration initialized at: {}", path.display());

            // A fresh setup still needs the two per-project files
            if !config.query.key_file.exists() {
                println!(
                    "Next: write your inference-service key to {}",
                    config.query.key_file.display()
                );
            }
            if !config.query.prompt_file.exists() {
                println!(
                    "Next: write the per-image prompt to {} \
                     (e.g. \"What is shown in this image? Answer in a few words.\")",
                    config.query.prompt_file.display()
                );
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presence_markers() {
        let dir = tempfile::tempdir().unwrap();
        let existing = dir.path().join("API_KEY");
        std::fs::write(&existing, "sk-test").unwrap();

        assert_eq!(presence(&existing), "found");
        assert_eq!(presence(&dir.path().join("prompt.txt")), "missing");
    }
}
