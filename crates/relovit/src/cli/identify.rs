//! The `relovit identify` command: list the sellable items in a photo.

use super::types::{resolve_format, OutputFormat};
use clap::Args;
use relovit_core::{drafts_from_items, Config, GeminiClient, ImageRef, OutputWriter};
use std::path::PathBuf;

/// Arguments for the `identify` command.
#[derive(Args, Debug)]
pub struct IdentifyArgs {
    /// Photo to analyse
    #[arg(required = true)]
    pub image: PathBuf,

    /// MIME type of the photo (guessed from the extension by default)
    #[arg(long)]
    pub mime_type: Option<String>,

    /// Print one product draft per item instead of plain item names
    #[arg(long)]
    pub drafts: bool,

    /// Output format (defaults to `[output] format`)
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,
}

/// Execute the identify command.
pub async fn execute(args: IdentifyArgs, config: &Config) -> anyhow::Result<()> {
    let image = match args.mime_type {
        Some(mime) => ImageRef::with_mime_type(&args.image, mime),
        None => ImageRef::new(&args.image),
    };

    let client = GeminiClient::new(config.gemini.clone(), config.prompts.clone());
    tracing::info!("Identifying items in {}", args.image.display());
    let items = client.identify_objects(&image).await?;
    tracing::info!("Found {} items", items.len());

    let format = resolve_format(args.format, &config.output.format);
    let stdout = std::io::stdout();
    let mut writer = OutputWriter::new(stdout.lock(), format, args.pretty || config.output.pretty);

    if args.drafts {
        writer.write_all(&drafts_from_items(&items, &image))?;
    } else {
        writer.write_all(&items)?;
    }
    writer.flush()?;

    Ok(())
}
