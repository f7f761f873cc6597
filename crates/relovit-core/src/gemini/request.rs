//! Multimodal request payloads for `generateContent`.
//!
//! A payload always starts with exactly one text part, followed by one
//! inline-data part per readable image.

use crate::types::ImageRef;
use base64::Engine;
use serde::Serialize;

// --- Wire types ---

#[derive(Debug, Clone, Serialize)]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    #[serde(rename = "generationConfig", skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Content {
    pub parts: Vec<RequestPart>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum RequestPart {
    Text { text: String },
    InlineData { inline_data: InlineData },
}

#[derive(Debug, Clone, Serialize)]
pub struct InlineData {
    pub mime_type: String,
    /// Base64-encoded bytes
    pub data: String,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_mime_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_modalities: Option<Vec<String>>,
}

impl GenerateContentRequest {
    /// Number of parts in the single content block.
    pub fn part_count(&self) -> usize {
        self.contents.iter().map(|c| c.parts.len()).sum()
    }
}

/// A prompt plus the images that go with it.
#[derive(Debug, Clone)]
pub struct PromptRequest {
    pub prompt: String,
    pub images: Vec<ImageRef>,
    /// Ask the model for JSON and decode the answer strictly
    pub strict_json: bool,
    /// Ask the model to answer with an image
    pub image_output: bool,
}

impl PromptRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            images: Vec::new(),
            strict_json: false,
            image_output: false,
        }
    }

    pub fn with_images(mut self, images: &[ImageRef]) -> Self {
        self.images.extend_from_slice(images);
        self
    }

    pub fn strict_json(mut self) -> Self {
        self.strict_json = true;
        self
    }

    pub fn image_output(mut self) -> Self {
        self.image_output = true;
        self
    }

    /// Read the images and assemble the wire payload.
    ///
    /// Images that cannot be read are skipped with a warning; they never fail
    /// the request.
    pub async fn build(&self) -> GenerateContentRequest {
        let mut parts = Vec::with_capacity(1 + self.images.len());
        parts.push(RequestPart::Text {
            text: self.prompt.clone(),
        });

        for image in &self.images {
            match tokio::fs::read(&image.path).await {
                Ok(bytes) => parts.push(RequestPart::InlineData {
                    inline_data: InlineData {
                        mime_type: image.media_type(),
                        data: base64::engine::general_purpose::STANDARD.encode(&bytes),
                    },
                }),
                Err(e) => {
                    tracing::warn!("Skipping unreadable image {:?}: {e}", image.path);
                }
            }
        }

        let generation_config = if self.strict_json || self.image_output {
            Some(GenerationConfig {
                response_mime_type: self
                    .strict_json
                    .then(|| "application/json".to_string()),
                response_modalities: self
                    .image_output
                    .then(|| vec!["TEXT".to_string(), "IMAGE".to_string()]),
            })
        } else {
            None
        };

        GenerateContentRequest {
            contents: vec![Content { parts }],
            generation_config,
        }
    }
}
