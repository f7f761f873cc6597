//! Core data types for product enrichment.
//!
//! Everything here lives for a single call or a single enrichment run;
//! persistence belongs to whoever owns the product record.

use base64::Engine;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// An image on disk to send to the AI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRef {
    /// Path to the image file
    pub path: PathBuf,

    /// MIME type; inferred from the extension when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
}

impl ImageRef {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            mime_type: None,
        }
    }

    pub fn with_mime_type(path: impl Into<PathBuf>, mime_type: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            mime_type: Some(mime_type.into()),
        }
    }

    /// The explicit MIME type, or one guessed from the file extension.
    pub fn media_type(&self) -> String {
        if let Some(mime) = &self.mime_type {
            return mime.clone();
        }
        media_type_for_path(&self.path).to_string()
    }
}

fn media_type_for_path(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "jpeg" | "jpg" => "image/jpeg",
        "png" => "image/png",
        "webp" => "image/webp",
        "gif" => "image/gif",
        "heic" => "image/heic",
        other => {
            tracing::warn!("Unknown image extension '{other}', defaulting to image/jpeg");
            "image/jpeg"
        }
    }
}

/// One AI-assisted operation on a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnrichmentTask {
    Identify,
    Description,
    Price,
    #[serde(alias = "category")]
    Taxonomy,
    Image,
}

impl EnrichmentTask {
    /// Tasks that fill product fields, in the order they are applied.
    pub const ENRICHMENT_ORDER: [EnrichmentTask; 4] = [
        EnrichmentTask::Description,
        EnrichmentTask::Price,
        EnrichmentTask::Taxonomy,
        EnrichmentTask::Image,
    ];

    /// Parse a task name (case-insensitive). `category` is accepted for `taxonomy`.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "identify" => Some(Self::Identify),
            "description" => Some(Self::Description),
            "price" => Some(Self::Price),
            "taxonomy" | "category" => Some(Self::Taxonomy),
            "image" => Some(Self::Image),
            _ => None,
        }
    }
}

impl fmt::Display for EnrichmentTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Identify => write!(f, "identify"),
            Self::Description => write!(f, "description"),
            Self::Price => write!(f, "price"),
            Self::Taxonomy => write!(f, "taxonomy"),
            Self::Image => write!(f, "image"),
        }
    }
}

/// Category path and tags suggested for a product.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxonomyTerms {
    /// Category path from the most general to the most specific term
    #[serde(default)]
    pub category: Vec<String>,

    #[serde(default)]
    pub tags: Vec<String>,
}

impl TaxonomyTerms {
    /// Category path with segments trimmed and blanks removed.
    pub fn category_path(&self) -> Vec<String> {
        clean_terms(&self.category)
    }

    /// Tags trimmed, blanks removed.
    pub fn clean_tags(&self) -> Vec<String> {
        clean_terms(&self.tags)
    }

    pub fn is_empty(&self) -> bool {
        self.category_path().is_empty() && self.clean_tags().is_empty()
    }
}

fn clean_terms(terms: &[String]) -> Vec<String> {
    terms
        .iter()
        .map(|t| t.trim())
        .filter(|t| !t.is_empty())
        .map(String::from)
        .collect()
}

/// A validated price suggested by the AI.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(f64);

impl Price {
    /// Parse the AI's price answer.
    ///
    /// Accepts a bare decimal with an optional currency symbol on either side
    /// and `,` as decimal separator. Anything else is rejected.
    pub fn parse(text: &str) -> Option<Self> {
        let trimmed = text
            .trim()
            .trim_start_matches(['€', '$', '£'])
            .trim_end_matches(['€', '$', '£'])
            .trim();
        if trimmed.is_empty() || !trimmed.chars().all(|c| c.is_ascii_digit() || c == '.' || c == ',')
        {
            return None;
        }
        let normalized = trimmed.replace(',', ".");
        let value: f64 = normalized.parse().ok()?;
        if value.is_finite() && value >= 0.0 {
            Some(Self(value))
        } else {
            None
        }
    }

    pub fn amount(&self) -> f64 {
        self.0
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

/// A product photo generated by the AI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedImage {
    /// Base64-encoded image bytes
    pub data: String,

    /// MIME type reported by the API
    pub mime_type: String,
}

impl GeneratedImage {
    /// Decode the base64 payload into raw bytes.
    pub fn decode(&self) -> Result<Vec<u8>, base64::DecodeError> {
        base64::engine::general_purpose::STANDARD.decode(&self.data)
    }

    /// File extension matching the MIME type.
    pub fn extension(&self) -> &'static str {
        match self.mime_type.as_str() {
            "image/jpeg" => "jpg",
            "image/webp" => "webp",
            "image/gif" => "gif",
            _ => "png",
        }
    }
}

/// Lifecycle state of a product record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductStatus {
    /// Created from an identified item, not yet enriched
    Draft,
    /// Enriched and waiting for review
    Pending,
}

/// A product to enrich.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductDraft {
    pub name: String,

    /// Images in priority order; the first is the main image
    pub images: Vec<ImageRef>,

    /// Price range key overriding the configured default
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_range: Option<String>,

    pub status: ProductStatus,
}

impl ProductDraft {
    /// Create a draft, dropping duplicate image paths while keeping order.
    pub fn new(name: impl Into<String>, images: Vec<ImageRef>) -> Self {
        let mut unique: Vec<ImageRef> = Vec::with_capacity(images.len());
        for image in images {
            if !unique.iter().any(|seen| seen.path == image.path) {
                unique.push(image);
            }
        }
        Self {
            name: name.into(),
            images: unique,
            price_range: None,
            status: ProductStatus::Draft,
        }
    }

    pub fn with_price_range(mut self, price_range: impl Into<String>) -> Self {
        self.price_range = Some(price_range.into());
        self
    }
}

/// Turn identified item names into drafts sharing the source photo.
pub fn drafts_from_items(items: &[String], image: &ImageRef) -> Vec<ProductDraft> {
    items
        .iter()
        .map(|item| item.trim())
        .filter(|item| !item.is_empty())
        .map(|item| ProductDraft::new(item, vec![image.clone()]))
        .collect()
}

/// A task that failed during enrichment and was skipped.
#[derive(Debug, Clone, Serialize)]
pub struct TaskFailure {
    pub task: EnrichmentTask,
    pub error: String,
}

/// Outcome of enriching one product.
#[derive(Debug, Clone, Serialize)]
pub struct EnrichmentReport {
    pub product_name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<Price>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub taxonomy: Option<TaxonomyTerms>,

    /// Generated photo; written to disk by the caller, never serialized inline
    #[serde(skip)]
    pub image: Option<GeneratedImage>,

    /// Where the caller stored the generated photo
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_path: Option<PathBuf>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<TaskFailure>,

    pub status: ProductStatus,
}

impl EnrichmentReport {
    pub fn new(product_name: impl Into<String>) -> Self {
        Self {
            product_name: product_name.into(),
            description: None,
            price: None,
            taxonomy: None,
            image: None,
            image_path: None,
            failures: Vec::new(),
            status: ProductStatus::Draft,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_media_type_from_extension() {
        assert_eq!(ImageRef::new("a/b.JPG").media_type(), "image/jpeg");
        assert_eq!(ImageRef::new("a/b.png").media_type(), "image/png");
        assert_eq!(ImageRef::new("a/b.webp").media_type(), "image/webp");
        assert_eq!(ImageRef::new("a/b").media_type(), "image/jpeg");
    }

    #[test]
    fn test_explicit_mime_type_wins() {
        let image = ImageRef::with_mime_type("upload.tmp", "image/png");
        assert_eq!(image.media_type(), "image/png");
    }

    #[test]
    fn test_task_parse_accepts_category_alias() {
        assert_eq!(EnrichmentTask::parse("category"), Some(EnrichmentTask::Taxonomy));
        assert_eq!(EnrichmentTask::parse(" Price "), Some(EnrichmentTask::Price));
        assert_eq!(EnrichmentTask::parse("colour"), None);
    }

    #[test]
    fn test_task_serde_alias() {
        let task: EnrichmentTask = serde_json::from_str("\"category\"").unwrap();
        assert_eq!(task, EnrichmentTask::Taxonomy);
        assert_eq!(serde_json::to_string(&task).unwrap(), "\"taxonomy\"");
    }

    #[test]
    fn test_taxonomy_absent_keys_are_empty() {
        let terms: TaxonomyTerms = serde_json::from_str("{\"tags\":[\"x\"]}").unwrap();
        assert!(terms.category.is_empty());
        assert_eq!(terms.tags, vec!["x"]);
    }

    #[test]
    fn test_category_path_skips_blank_segments() {
        let terms = TaxonomyTerms {
            category: vec![" Maison ".into(), "".into(), "Luminaires".into()],
            tags: vec![" ".into()],
        };
        assert_eq!(terms.category_path(), vec!["Maison", "Luminaires"]);
        assert!(terms.clean_tags().is_empty());
        assert!(!terms.is_empty());
    }

    #[test]
    fn test_price_parse_accepts_plain_and_localized() {
        assert_eq!(Price::parse("45").unwrap().amount(), 45.0);
        assert_eq!(Price::parse(" 45.50\n").unwrap().amount(), 45.5);
        assert_eq!(Price::parse("45,50 €").unwrap().amount(), 45.5);
        assert_eq!(Price::parse("$12").unwrap().amount(), 12.0);
    }

    #[test]
    fn test_price_parse_rejects_non_numeric() {
        assert!(Price::parse("about fifty").is_none());
        assert!(Price::parse("").is_none());
        assert!(Price::parse("20-30").is_none());
        assert!(Price::parse("1.2.3").is_none());
    }

    #[test]
    fn test_price_display_two_decimals() {
        assert_eq!(Price::parse("7").unwrap().to_string(), "7.00");
    }

    #[test]
    fn test_generated_image_decode() {
        let image = GeneratedImage {
            data: "AQID".to_string(),
            mime_type: "image/png".to_string(),
        };
        assert_eq!(image.decode().unwrap(), vec![1, 2, 3]);
        assert_eq!(image.extension(), "png");
    }

    #[test]
    fn test_draft_dedups_images() {
        let draft = ProductDraft::new(
            "Chaise",
            vec![
                ImageRef::new("a.jpg"),
                ImageRef::new("b.jpg"),
                ImageRef::new("a.jpg"),
            ],
        );
        assert_eq!(draft.images.len(), 2);
        assert_eq!(draft.images[0].path, PathBuf::from("a.jpg"));
        assert_eq!(draft.status, ProductStatus::Draft);
    }

    #[test]
    fn test_drafts_from_items() {
        let image = ImageRef::new("photo.jpg");
        let items = vec!["chair".to_string(), "  ".to_string(), " lamp ".to_string()];
        let drafts = drafts_from_items(&items, &image);
        assert_eq!(drafts.len(), 2);
        assert_eq!(drafts[1].name, "lamp");
        assert_eq!(drafts[1].images, vec![image]);
    }

    #[test]
    fn test_report_never_serializes_image_bytes() {
        let mut report = EnrichmentReport::new("Chaise");
        report.image = Some(GeneratedImage {
            data: "AQID".to_string(),
            mime_type: "image/png".to_string(),
        });
        let json = serde_json::to_string(&report).unwrap();
        assert!(!json.contains("AQID"));
        assert!(!json.contains("failures"));
        assert!(json.contains("\"status\":\"draft\""));
    }
}
