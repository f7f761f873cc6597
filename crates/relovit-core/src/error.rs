//! Error types for Relovit.
//!
//! Enrichment errors follow the life of a single AI call: configuration is
//! checked first, then the transport, then the vendor's answer. Every variant
//! is terminal for the call that produced it.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for Relovit operations.
#[derive(Error, Debug)]
pub enum RelovitError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// AI enrichment errors
    #[error("Enrichment error: {0}")]
    Enrich(#[from] EnrichError),

    /// General I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the config file from disk
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse TOML configuration
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Configuration values are invalid
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Failures of a single AI enrichment call or enrichment run.
#[derive(Error, Debug)]
pub enum EnrichError {
    /// No API key configured; raised before any network attempt
    #[error("Gemini API key not set. Set GEMINI_API_KEY or gemini.api_key in the config file.")]
    MissingApiKey,

    /// The source image for a single-image task does not exist
    #[error("Image file not found: {0}")]
    ImageNotFound(PathBuf),

    /// Network failure, DNS failure or timeout
    #[error("Request failed: {0}")]
    Transport(String),

    /// The vendor answered with an embedded error object or an error status
    #[error("Gemini API error: {message}")]
    Vendor {
        message: String,
        status_code: Option<u16>,
    },

    /// The response did not have the expected shape
    #[error("Invalid response from Gemini API: {0}")]
    Parse(String),

    /// Enrichment requested with an empty task list
    #[error("Select at least one task to perform")]
    NoTasks,

    /// Enrichment requested for a product without images
    #[error("No images found for this product")]
    NoImages,

    /// Task name not usable in this context
    #[error("Invalid task: {0}")]
    InvalidTask(String),
}

/// Convenience type alias for Relovit results.
pub type Result<T> = std::result::Result<T, RelovitError>;

/// Convenience type alias for enrichment-specific results.
pub type EnrichResult<T> = std::result::Result<T, EnrichError>;
