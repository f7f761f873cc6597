//! Relovit Core - AI enrichment for second-hand product listings.
//!
//! Relovit turns product photos into listing data by asking the Gemini
//! multimodal API to identify items, write descriptions, suggest prices,
//! categories and tags, and generate a clean product photo.
//!
//! # Architecture
//!
//! ```text
//! Photos → Request Builder → Transport → Response Parser → Task Client → Enricher → Report
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use relovit_core::{Config, EnrichOptions, Enricher, EnrichmentTask, GeminiClient, ImageRef, ProductDraft};
//!
//! #[tokio::main]
//! async fn main() -> relovit_core::Result<()> {
//!     let config = Config::load()?;
//!     let client = GeminiClient::new(config.gemini.clone(), config.prompts.clone());
//!     let enricher = Enricher::new(client, EnrichOptions::from(&config.enrichment));
//!
//!     let draft = ProductDraft::new("Lampe en laiton", vec![ImageRef::new("lamp.jpg")]);
//!     let report = enricher
//!         .enrich(&draft, &[EnrichmentTask::Description, EnrichmentTask::Price])
//!         .await?;
//!     println!("{:?}", report.description);
//!     Ok(())
//! }
//! ```

// Module declarations
pub mod config;
pub mod error;
pub mod gemini;
pub mod output;
pub mod prompts;
pub mod types;

// Re-exports for convenient access
pub use config::Config;
pub use error::{ConfigError, EnrichError, EnrichResult, RelovitError, Result};
pub use gemini::{EnrichOptions, Enricher, GeminiClient, HttpTransport, Transport};
pub use output::{OutputFormat, OutputWriter};
pub use prompts::{PriceRange, PromptBuilder};
pub use types::{
    drafts_from_items, EnrichmentReport, EnrichmentTask, GeneratedImage, ImageRef, Price,
    ProductDraft, ProductStatus, TaskFailure, TaxonomyTerms,
};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
