//! Decoding of `generateContent` responses into [`AiResponse`].
//!
//! Precedence is fixed: embedded error, then error status, then the first
//! part's text, then the first inline-data part. Anything else is an invalid
//! response.

use super::transport::HttpReply;
use crate::error::EnrichError;
use serde::Deserialize;

/// Shape the caller expects from the first candidate's text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expect {
    /// Plain text, trimmed
    Text,
    /// JSON, possibly wrapped in a markdown code fence
    Json,
}

/// A normalized AI answer.
#[derive(Debug, Clone, PartialEq)]
pub enum AiResponse {
    Text(String),
    Json(serde_json::Value),
    Binary { data: String, mime_type: String },
}

// --- Wire types ---

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    error: Option<ApiError>,
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    code: Option<u16>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
    #[serde(default, rename = "inlineData", alias = "inline_data")]
    inline_data: Option<Blob>,
}

#[derive(Debug, Deserialize)]
struct Blob {
    data: String,
    #[serde(rename = "mimeType", alias = "mime_type", default = "default_blob_mime")]
    mime_type: String,
}

fn default_blob_mime() -> String {
    "image/png".to_string()
}

const INVALID_RESPONSE: &str = "no text or image data in response";

/// Decode a raw reply into exactly one outcome.
pub fn parse_reply(reply: &HttpReply, expect: Expect) -> Result<AiResponse, EnrichError> {
    let decoded: GenerateContentResponse = serde_json::from_str(&reply.body).map_err(|e| {
        if reply.is_success() {
            EnrichError::Parse(format!("response is not valid JSON: {e}"))
        } else {
            EnrichError::Vendor {
                message: format!("HTTP {}", reply.status),
                status_code: Some(reply.status),
            }
        }
    })?;

    if let Some(error) = decoded.error {
        return Err(EnrichError::Vendor {
            message: error
                .message
                .unwrap_or_else(|| "unknown error".to_string()),
            status_code: error
                .code
                .or_else(|| (!reply.is_success()).then_some(reply.status)),
        });
    }

    if !reply.is_success() {
        return Err(EnrichError::Vendor {
            message: format!("HTTP {}", reply.status),
            status_code: Some(reply.status),
        });
    }

    let parts = decoded
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|c| c.parts)
        .unwrap_or_default();

    if let Some(text) = parts.first().and_then(|p| p.text.as_deref()) {
        return match expect {
            Expect::Text => Ok(AiResponse::Text(text.trim().to_string())),
            Expect::Json => serde_json::from_str(strip_code_fence(text))
                .map(AiResponse::Json)
                .map_err(|e| EnrichError::Parse(format!("JSON decode failed: {e}"))),
        };
    }

    parts
        .into_iter()
        .find_map(|p| p.inline_data)
        .map(|blob| AiResponse::Binary {
            data: blob.data,
            mime_type: blob.mime_type,
        })
        .ok_or_else(|| EnrichError::Parse(INVALID_RESPONSE.to_string()))
}

/// Strip an optional leading ```` ``` ```` / ```` ```json ```` fence and an
/// optional trailing fence. Either may be missing.
pub fn strip_code_fence(text: &str) -> &str {
    let mut s = text.trim();
    if let Some(rest) = s.strip_prefix("```") {
        s = rest.strip_prefix("json").unwrap_or(rest);
    }
    if let Some(rest) = s.trim_end().strip_suffix("```") {
        s = rest;
    }
    s.trim()
}
