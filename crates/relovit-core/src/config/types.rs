//! Sub-configuration structs with defaults matching the plugin settings page.

use crate::prompts::PromptTemplates;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Gemini API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeminiConfig {
    /// API key (supports ${ENV_VAR} syntax)
    pub api_key: String,

    /// API base URL, without the `/v1beta` suffix
    pub base_url: String,

    /// Multimodal model used for text and JSON tasks
    pub text_model: String,

    /// Model used for product photo generation
    pub image_model: String,

    /// Timeout for text and JSON tasks in seconds
    pub text_timeout_secs: u64,

    /// Timeout for image generation in seconds.
    /// Image generation is much slower than text, keep this above the text timeout.
    pub image_timeout_secs: u64,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: "${GEMINI_API_KEY}".to_string(),
            base_url: "https://generativelanguage.googleapis.com".to_string(),
            text_model: "gemini-2.0-flash".to_string(),
            image_model: "gemini-2.0-flash-preview-image-generation".to_string(),
            text_timeout_secs: 60,
            image_timeout_secs: 180,
        }
    }
}

/// Store-specific wording substituted into prompt templates.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PromptConfig {
    /// Language the AI should answer in
    pub language: String,

    /// Short description of the shop, prepended to generation prompts
    pub store_context: String,

    /// Default price range: "low", "medium" or "high"
    pub price_range: String,

    /// Tone of generated descriptions
    pub desc_tone: String,

    /// What descriptions should emphasise
    pub desc_keywords: String,

    /// Guidance for category and tag suggestions
    pub taxonomy_seo_focus: String,

    /// Background style for generated product photos
    pub image_bg_style: String,

    /// Prompt templates with `{placeholder}` markers
    pub templates: PromptTemplates,
}

impl Default for PromptConfig {
    fn default() -> Self {
        Self {
            language: "français".to_string(),
            store_context: "Je suis un vendeur d'articles d'occasion, spécialisé dans les objets vintage et de collection.".to_string(),
            price_range: "medium".to_string(),
            desc_tone: "détaillée, honnête et commerciale".to_string(),
            desc_keywords: "insistant sur son état et sa valeur pour un acheteur d'occasion"
                .to_string(),
            taxonomy_seo_focus: "pertinents pour le SEO".to_string(),
            image_bg_style: "sur un fond de studio blanc et propre".to_string(),
            templates: PromptTemplates::default(),
        }
    }
}

/// Enrichment run settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EnrichmentConfig {
    /// Extra attempts per task for transient failures (0 = single attempt)
    pub retry_attempts: u32,

    /// Base backoff delay between retries in milliseconds
    pub retry_delay_ms: u64,
}

impl Default for EnrichmentConfig {
    fn default() -> Self {
        Self {
            retry_attempts: 0,
            retry_delay_ms: 1000,
        }
    }
}

/// Output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Default output format ("json" or "jsonl")
    pub format: String,

    /// Pretty-print JSON output
    pub pretty: bool,

    /// Directory where generated product photos are written
    pub image_dir: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: "json".to_string(),
            pretty: false,
            image_dir: PathBuf::from("~/.relovit/generated"),
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: error, warn, info, debug, trace
    pub level: String,

    /// Log format: "pretty" or "json"
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}
