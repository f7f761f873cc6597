//! The `relovit config` command for configuration management.
//!
//! The config file holds the Gemini endpoint and models, the prompt settings
//! (language, store context, tone, price range, templates), the retry policy
//! and output defaults. The API key normally stays out of the file and is
//! read from `GEMINI_API_KEY` through the `${GEMINI_API_KEY}` placeholder.

use clap::{Args, Subcommand};
use relovit_core::Config;
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
    /// Display current configuration
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

/// Execute the config command.
pub async fn execute(args: ConfigArgs) -> anyhow::Result<()> {
    match args.command {
        ConfigCommand::Show => {
            // Shows the merged result: file values over built-in defaults
            let config = Config::load()?;
            println!("{}", config.to_toml()?);
        }

        ConfigCommand::Path => {
            println!("{}", Config::default_path().display());
        }

        ConfigCommand::Init { force } => {
            let path = Config::default_path();
            write_default_config(&path, force)?;

            tracing::info!("Config file created at: {}", path.display());
            println!("Configuration initialized at: {}", path.display());
            println!("Set GEMINI_API_KEY or edit gemini.api_key before running `relovit enrich`.");
        }
    }

    Ok(())
}

/// Write the default configuration to `path`.
///
/// # Errors
///
/// Fails if the file already exists and `force` is false, or if the file or
/// its parent directory cannot be written.
fn write_default_config(path: &Path, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        anyhow::bail!(
            "Config file already exists at: {}\nUse --force to overwrite.",
            path.display()
        );
    }

    // The platform config directory may not exist on a fresh machine
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    std::fs::write(path, Config::default().to_toml()?)?;
    Ok(())
}
