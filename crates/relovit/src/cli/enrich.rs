//! The `relovit enrich` command: fill in a product listing from its photos.

use super::types::{resolve_format, OutputFormat, PriceRangeArg, TaskArg};
use anyhow::Context;
use clap::Args;
use relovit_core::{
    Config, EnrichOptions, Enricher, EnrichmentReport, EnrichmentTask, GeminiClient, ImageRef,
    OutputWriter, ProductDraft, TaskFailure,
};
use std::path::{Path, PathBuf};

/// Arguments for the `enrich` command.
#[derive(Args, Debug)]
pub struct EnrichArgs {
    /// Product photos; the first one is the main image
    #[arg(required = true)]
    pub images: Vec<PathBuf>,

    /// Product name
    #[arg(short, long)]
    pub name: String,

    /// Task to run (repeatable). Tasks always run in the order
    /// description, price, category, image.
    #[arg(short, long = "task", value_enum, required = true)]
    pub tasks: Vec<TaskArg>,

    /// Price positioning (defaults to `[prompts] price_range`)
    #[arg(long, value_enum)]
    pub price_range: Option<PriceRangeArg>,

    /// Where to write the generated photo (defaults to `[output] image_dir`)
    #[arg(long)]
    pub image_out: Option<PathBuf>,

    /// Output format (defaults to `[output] format`)
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,
}

/// Execute the enrich command.
pub async fn execute(args: EnrichArgs, config: &Config) -> anyhow::Result<()> {
    let images = args.images.iter().map(ImageRef::new).collect();
    let mut draft = ProductDraft::new(&args.name, images);
    if let Some(range) = args.price_range {
        draft = draft.with_price_range(range.key());
    }
    let tasks: Vec<EnrichmentTask> = args.tasks.iter().copied().map(Into::into).collect();

    let client = GeminiClient::new(config.gemini.clone(), config.prompts.clone());
    if !client.is_configured() {
        tracing::warn!("No Gemini API key configured; every task will fail");
    }
    let enricher = Enricher::new(client, EnrichOptions::from(&config.enrichment));

    let mut report = enricher.enrich(&draft, &tasks).await?;

    if report.image.is_some() {
        let target = match &args.image_out {
            Some(path) => path.clone(),
            None => default_image_path(&config.image_dir(), &report),
        };
        store_generated_image(&mut report, &target);
    }

    let format = resolve_format(args.format, &config.output.format);
    let stdout = std::io::stdout();
    let mut writer = OutputWriter::new(stdout.lock(), format, args.pretty || config.output.pretty);
    writer.write(&report)?;
    writer.flush()?;

    if !report.failures.is_empty() {
        tracing::warn!(
            "{} of {} tasks failed, see `failures` in the output",
            report.failures.len(),
            tasks.len()
        );
    }

    Ok(())
}

/// `<image_dir>/<product-name-slug>-ai.<ext>`
fn default_image_path(dir: &Path, report: &EnrichmentReport) -> PathBuf {
    let ext = report
        .image
        .as_ref()
        .map(|image| image.extension())
        .unwrap_or("png");
    dir.join(format!("{}-ai.{ext}", slugify(&report.product_name)))
}

fn slugify(name: &str) -> String {
    let slug: String = name
        .to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '-' })
        .collect();
    let slug = slug
        .split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-");
    if slug.is_empty() {
        "product".to_string()
    } else {
        slug
    }
}

/// Save the generated photo, or record the failure in the report.
///
/// A photo that cannot be saved counts as a failed image task. The other
/// fields of the report are kept and still printed.
fn store_generated_image(report: &mut EnrichmentReport, path: &Path) {
    if let Err(e) = save_generated_image(report, path) {
        tracing::warn!("Skipping generated image for {:?}: {e:#}", report.product_name);
        report.image = None;
        report.failures.push(TaskFailure {
            task: EnrichmentTask::Image,
            error: format!("{e:#}"),
        });
    }
}

/// Decode the generated photo, write it to `path` and record the location.
fn save_generated_image(report: &mut EnrichmentReport, path: &Path) -> anyhow::Result<()> {
    let Some(image) = &report.image else {
        return Ok(());
    };
    let bytes = image
        .decode()
        .context("Generated image is not valid base64")?;

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, bytes)
        .with_context(|| format!("Failed to write generated image to {}", path.display()))?;

    tracing::info!("Generated image saved to {}", path.display());
    report.image_path = Some(path.to_path_buf());
    Ok(())
}
