//! CLI enum types shared by commands: output format, task, price range.

use clap::ValueEnum;
use relovit_core::{EnrichmentTask, OutputFormat as CoreOutputFormat};

/// Supported output formats.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum OutputFormat {
    /// Single JSON object or array
    Json,
    /// One JSON object per line (newline-delimited)
    Jsonl,
}

impl From<OutputFormat> for CoreOutputFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Json => CoreOutputFormat::Json,
            OutputFormat::Jsonl => CoreOutputFormat::JsonLines,
        }
    }
}

/// Pick the CLI format, or fall back to `[output] format` from the config.
pub fn resolve_format(cli: Option<OutputFormat>, configured: &str) -> CoreOutputFormat {
    cli.map(CoreOutputFormat::from)
        .or_else(|| CoreOutputFormat::parse(configured))
        .unwrap_or(CoreOutputFormat::Json)
}

/// Enrichment tasks selectable from the command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum TaskArg {
    /// Product description
    Description,
    /// Suggested price
    Price,
    /// Category path and tags
    #[value(alias = "taxonomy")]
    Category,
    /// Clean product photo
    Image,
}

impl From<TaskArg> for EnrichmentTask {
    fn from(task: TaskArg) -> Self {
        match task {
            TaskArg::Description => EnrichmentTask::Description,
            TaskArg::Price => EnrichmentTask::Price,
            TaskArg::Category => EnrichmentTask::Taxonomy,
            TaskArg::Image => EnrichmentTask::Image,
        }
    }
}

/// Price positioning.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum PriceRangeArg {
    /// Cheap, aimed at a quick sale
    Low,
    /// Competitive market price
    Medium,
    /// Top of the market
    High,
}

impl PriceRangeArg {
    pub fn key(&self) -> &'static str {
        match self {
            PriceRangeArg::Low => "low",
            PriceRangeArg::Medium => "medium",
            PriceRangeArg::High => "high",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use relovit_core::PriceRange;

    #[test]
    fn test_category_maps_to_taxonomy() {
        assert_eq!(
            EnrichmentTask::from(TaskArg::Category),
            EnrichmentTask::Taxonomy
        );
    }

    #[test]
    fn test_resolve_format_prefers_cli() {
        assert_eq!(
            resolve_format(Some(OutputFormat::Jsonl), "json"),
            CoreOutputFormat::JsonLines
        );
        assert_eq!(resolve_format(None, "jsonl"), CoreOutputFormat::JsonLines);
        assert_eq!(resolve_format(None, "yaml"), CoreOutputFormat::Json);
    }

    #[test]
    fn test_price_range_keys_parse() {
        for range in [PriceRangeArg::Low, PriceRangeArg::Medium, PriceRangeArg::High] {
            assert!(PriceRange::parse(range.key()).is_some());
        }
    }
}
