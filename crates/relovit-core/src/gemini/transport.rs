//! Outbound HTTP for the Gemini API.
//!
//! One POST per call, no retries at this layer. The API key travels in the
//! `Authorization` header and never in the URL.

use crate::error::EnrichError;
use async_trait::async_trait;
use std::time::Duration;

/// Status and body of an HTTP response.
///
/// The body is kept as raw text. Gemini reports errors both through the
/// status code and through an `error` object in the body, so interpreting
/// either is left to [`parse_reply`](super::parse_reply).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpReply {
    /// HTTP status code
    pub status: u16,
    /// Response body, usually JSON
    pub body: String,
}

impl HttpReply {
    /// Whether the status is in the 2xx range.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends one JSON POST and returns the raw reply.
///
/// Uses `async_trait` so the client can hold an `Arc<dyn Transport>` and
/// tests can swap in a mock.
#[async_trait]
pub trait Transport: Send + Sync {
    /// POST `body` as JSON to `url`.
    ///
    /// # Arguments
    ///
    /// * `url` - Full endpoint URL, without any credentials in the query string.
    /// * `api_key` - Sent as `Authorization: Bearer <key>`.
    /// * `body` - Request payload.
    /// * `timeout` - Deadline for the whole exchange, body included.
    ///
    /// # Errors
    ///
    /// Returns [`EnrichError::Transport`] when no reply was received
    /// (connection failure, DNS, timeout). Any reply that arrives, whatever its
    /// status, is returned as `Ok`.
    async fn post_json(
        &self,
        url: &str,
        api_key: &str,
        body: &serde_json::Value,
        timeout: Duration,
    ) -> Result<HttpReply, EnrichError>;
}

/// `reqwest`-backed transport.
///
/// Holds one `reqwest::Client` so connections are pooled across the tasks of
/// an enrichment run. Timeouts are set per request because text and image
/// models use different deadlines.
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// Create a transport with a default `reqwest` client (rustls TLS, no
    /// global timeout).
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn post_json(
        &self,
        url: &str,
        api_key: &str,
        body: &serde_json::Value,
        timeout: Duration,
    ) -> Result<HttpReply, EnrichError> {
        let resp = self
            .client
            .post(url)
            .header("Authorization", format!("Bearer {api_key}"))
            .header("Content-Type", "application/json")
            .json(body)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    EnrichError::Transport(format!("timed out after {}s", timeout.as_secs()))
                } else {
                    EnrichError::Transport(e.to_string())
                }
            })?;

        // Non-2xx replies are passed through; the parser decides what they mean
        let status = resp.status().as_u16();
        let body = resp
            .text()
            .await
            .map_err(|e| EnrichError::Transport(format!("failed to read response body: {e}")))?;

        Ok(HttpReply { status, body })
    }
}
