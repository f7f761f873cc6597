//! Relovit CLI - AI-assisted listings for second-hand products.
//!
//! Relovit sends product photos to the Gemini API to identify sellable items
//! and draft the listing: description, price, category path, tags and a clean
//! product photo.
//!
//! # Usage
//!
//! ```bash
//! # List the sellable items in a photo
//! relovit identify photo.jpg
//!
//! # Enrich a product from its photos
//! relovit enrich --name "Lampe en laiton" --task description --task price lamp1.jpg lamp2.jpg
//!
//! # View configuration
//! relovit config show
//! ```

use clap::{Parser, Subcommand};

mod cli;
mod logging;

/// Relovit - AI-assisted listings for second-hand products.
#[derive(Parser, Debug)]
#[command(name = "relovit")]
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
    /// Identify the sellable items in a photo
    Identify(cli::identify::IdentifyArgs),

    /// Generate description, price, category/tags or a product photo
    Enrich(cli::enrich::EnrichArgs),

    /// View and manage configuration
    Config(cli::config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logging isn't initialized yet, so config warnings go through eprintln.
    let config = match relovit_core::Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!(
                "Warning: Failed to load config: {e}\n  \
                 Using default configuration. Check your config file with `relovit config path`."
            );
            relovit_core::Config::default()
        }
    };
    logging::init_from_config(&config, cli.verbose, cli.json_logs);

    tracing::debug!("Relovit v{}", relovit_core::VERSION);

    match cli.command {
        Commands::Identify(args) => cli::identify::execute(args, &config).await,
        Commands::Enrich(args) => cli::enrich::execute(args, &config).await,
        Commands::Config(args) => cli::config::execute(args).await,
    }
}
