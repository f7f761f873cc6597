//! Task client: one method per AI operation.
//!
//! Each method builds its prompt, sends one request and checks the answer has
//! the shape the task needs. Failures are returned untouched; no method
//! retries or recovers on its own.

use super::request::PromptRequest;
use super::response::{parse_reply, AiResponse, Expect};
use super::transport::{HttpTransport, Transport};
use crate::config::{GeminiConfig, PromptConfig};
use crate::error::{EnrichError, EnrichResult};
use crate::prompts::{PriceRange, PromptBuilder};
use crate::types::{GeneratedImage, ImageRef, Price, TaxonomyTerms};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Resolve `${ENV_VAR}` references in config strings.
pub fn resolve_env_var(value: &str) -> Option<String> {
    if value.starts_with("${") && value.ends_with('}') {
        let var_name = &value[2..value.len() - 1];
        std::env::var(var_name).ok().filter(|v| !v.is_empty())
    } else if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Which model and timeout a task runs with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ModelKind {
    Text,
    Image,
}

/// Client for the Gemini `generateContent` endpoint.
///
/// Text tasks go to `text_model` with `text_timeout_secs`; the image task goes
/// to `image_model` with `image_timeout_secs`. The API key is resolved once at
/// construction, so a missing `GEMINI_API_KEY` surfaces as
/// [`EnrichError::MissingApiKey`] on the first call without touching the
/// network.
pub struct GeminiClient {
    transport: Arc<dyn Transport>,
    config: GeminiConfig,
    api_key: Option<String>,
    prompts: PromptBuilder,
}

impl GeminiClient {
    /// Create a client using the HTTP transport.
    pub fn new(config: GeminiConfig, prompts: PromptConfig) -> Self {
        Self::with_transport(config, prompts, Arc::new(HttpTransport::new()))
    }

    /// Create a client with a custom transport.
    pub fn with_transport(
        config: GeminiConfig,
        prompts: PromptConfig,
        transport: Arc<dyn Transport>,
    ) -> Self {
        let api_key = resolve_env_var(&config.api_key);
        Self {
            transport,
            config,
            api_key,
            prompts: PromptBuilder::new(prompts),
        }
    }

    /// Whether an API key is configured.
    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    /// List the distinct sellable objects visible in one photo.
    ///
    /// # Errors
    ///
    /// - [`EnrichError::ImageNotFound`] if `image` is not a readable file
    /// - [`EnrichError::MissingApiKey`] if no key is configured
    /// - Transport, vendor and parse errors from the call itself
    pub async fn identify_objects(&self, image: &ImageRef) -> EnrichResult<Vec<String>> {
        ensure_exists(image).await?;
        let request =
            PromptRequest::new(self.prompts.identify()).with_images(std::slice::from_ref(image));
        match self.send(&request, ModelKind::Text, Expect::Text).await? {
            AiResponse::Text(text) => Ok(split_items(&text)),
            other => Err(unexpected("text", &other)),
        }
    }

    /// Draft a product description from its photos.
    pub async fn generate_description(
        &self,
        product_name: &str,
        images: &[ImageRef],
    ) -> EnrichResult<String> {
        let request =
            PromptRequest::new(self.prompts.description(product_name)).with_images(images);
        match self.send(&request, ModelKind::Text, Expect::Text).await? {
            AiResponse::Text(text) if !text.is_empty() => Ok(text),
            AiResponse::Text(_) => Err(EnrichError::Parse("empty description".to_string())),
            other => Err(unexpected("text", &other)),
        }
    }

    /// Suggest a price. Answers that are not a plain number are rejected.
    pub async fn generate_price(
        &self,
        product_name: &str,
        images: &[ImageRef],
        price_range: Option<PriceRange>,
    ) -> EnrichResult<Price> {
        let request =
            PromptRequest::new(self.prompts.price(product_name, price_range)).with_images(images);
        match self.send(&request, ModelKind::Text, Expect::Text).await? {
            AiResponse::Text(text) => Price::parse(&text)
                .ok_or_else(|| EnrichError::Parse(format!("price is not a number: {text:?}"))),
            other => Err(unexpected("text", &other)),
        }
    }

    /// Suggest a category path and tags.
    pub async fn generate_taxonomy_terms(
        &self,
        product_name: &str,
        images: &[ImageRef],
    ) -> EnrichResult<TaxonomyTerms> {
        let request = PromptRequest::new(self.prompts.taxonomy(product_name))
            .with_images(images)
            .strict_json();
        match self.send(&request, ModelKind::Text, Expect::Json).await? {
            AiResponse::Json(value) => serde_json::from_value(value)
                .map_err(|e| EnrichError::Parse(format!("unexpected taxonomy shape: {e}"))),
            other => Err(unexpected("JSON", &other)),
        }
    }

    /// Generate a clean product photo from a source photo.
    ///
    /// The reply must carry the image in its first usable part. A reply that
    /// leads with a text caption is read as text and rejected with
    /// [`EnrichError::Parse`].
    pub async fn generate_image(&self, image: &ImageRef) -> EnrichResult<GeneratedImage> {
        ensure_exists(image).await?;
        let request = PromptRequest::new(self.prompts.image())
            .with_images(std::slice::from_ref(image))
            .image_output();
        match self.send(&request, ModelKind::Image, Expect::Text).await? {
            AiResponse::Binary { data, mime_type } => Ok(GeneratedImage { data, mime_type }),
            other => Err(unexpected("image data", &other)),
        }
    }

    fn endpoint(&self, model: &str) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            model
        )
    }

    // Picks model and timeout, encodes the request and decodes the reply.
    async fn send(
        &self,
        request: &PromptRequest,
        kind: ModelKind,
        expect: Expect,
    ) -> EnrichResult<AiResponse> {
        let api_key = self.api_key.as_deref().ok_or(EnrichError::MissingApiKey)?;

        let (model, timeout) = match kind {
            ModelKind::Text => (
                self.config.text_model.as_str(),
                Duration::from_secs(self.config.text_timeout_secs),
            ),
            ModelKind::Image => (
                self.config.image_model.as_str(),
                Duration::from_secs(self.config.image_timeout_secs),
            ),
        };

        let payload = request.build().await;
        let body = serde_json::to_value(&payload)
            .map_err(|e| EnrichError::Parse(format!("failed to encode request: {e}")))?;

        let start = Instant::now();
        let reply = self
            .transport
            .post_json(&self.endpoint(model), api_key, &body, timeout)
            .await?;
        tracing::debug!(
            model,
            status = reply.status,
            parts = payload.part_count(),
            latency_ms = start.elapsed().as_millis() as u64,
            "Gemini call finished"
        );

        parse_reply(&reply, expect)
    }
}

async fn ensure_exists(image: &ImageRef) -> EnrichResult<()> {
    match tokio::fs::metadata(&image.path).await {
        Ok(meta) if meta.is_file() => Ok(()),
        _ => Err(EnrichError::ImageNotFound(image.path.clone())),
    }
}

/// Split a comma-separated item list, trimming each entry.
pub fn split_items(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

fn unexpected(wanted: &str, got: &AiResponse) -> EnrichError {
    let got = match got {
        AiResponse::Text(_) => "text",
        AiResponse::Json(_) => "JSON",
        AiResponse::Binary { .. } => "image data",
    };
    EnrichError::Parse(format!("expected {wanted}, got {got}"))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::gemini::transport::HttpReply;
    use async_trait::async_trait;
    use serde_json::json;
    use std::io::Write;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Mutex;

    /// A request seen by [`MockTransport`].
    #[derive(Debug, Clone)]
    pub(crate) struct SeenRequest {
        pub url: String,
        pub api_key: String,
        pub body: serde_json::Value,
        pub timeout: Duration,
    }

    impl SeenRequest {
        pub fn prompt(&self) -> &str {
            self.body["contents"][0]["parts"][0]["text"]
                .as_str()
                .unwrap_or_default()
        }
    }

    type ReplyFn = Box<dyn Fn(u32, &SeenRequest) -> Result<HttpReply, EnrichError> + Send + Sync>;

    /// Transport that answers from a closure and records every request.
    pub(crate) struct MockTransport {
        reply_fn: ReplyFn,
        pub call_count: AtomicU32,
        pub seen: Mutex<Vec<SeenRequest>>,
    }

    impl MockTransport {
        pub fn new(
            reply_fn: impl Fn(u32, &SeenRequest) -> Result<HttpReply, EnrichError>
                + Send
                + Sync
                + 'static,
        ) -> Arc<Self> {
            Arc::new(Self {
                reply_fn: Box::new(reply_fn),
                call_count: AtomicU32::new(0),
                seen: Mutex::new(Vec::new()),
            })
        }

        pub fn replying(body: serde_json::Value) -> Arc<Self> {
            Self::new(move |_, _| {
                Ok(HttpReply {
                    status: 200,
                    body: body.to_string(),
                })
            })
        }

        pub fn calls(&self) -> u32 {
            self.call_count.load(Ordering::SeqCst)
        }

        pub fn last(&self) -> SeenRequest {
            self.seen.lock().unwrap().last().cloned().unwrap()
        }
    }

    #[async_trait]
    impl Transport for MockTransport {
        async fn post_json(
            &self,
            url: &str,
            api_key: &str,
            body: &serde_json::Value,
            timeout: Duration,
        ) -> Result<HttpReply, EnrichError> {
            let idx = self.call_count.fetch_add(1, Ordering::SeqCst);
            let seen = SeenRequest {
                url: url.to_string(),
                api_key: api_key.to_string(),
                body: body.clone(),
                timeout,
            };
            let result = (self.reply_fn)(idx, &seen);
            self.seen.lock().unwrap().push(seen);
            result
        }
    }

    pub(crate) fn text_reply(text: &str) -> serde_json::Value {
        json!({"candidates": [{"content": {"parts": [{"text": text}]}}]})
    }

    pub(crate) fn test_config() -> GeminiConfig {
        GeminiConfig {
            api_key: "test-key".to_string(),
            base_url: "https://gemini.test/".to_string(),
            ..GeminiConfig::default()
        }
    }

    pub(crate) fn fixture_image() -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".jpg").tempfile().unwrap();
        file.write_all(&[0xFF, 0xD8, 0xFF, 0xE0]).unwrap();
        file
    }

    fn client(transport: Arc<MockTransport>) -> GeminiClient {
        GeminiClient::with_transport(test_config(), PromptConfig::default(), transport)
    }

    #[tokio::test]
    async fn test_identify_objects_splits_and_trims() {
        let file = fixture_image();
        let transport = MockTransport::replying(text_reply("chair, lamp, table"));
        let items = client(transport.clone())
            .identify_objects(&ImageRef::new(file.path()))
            .await
            .unwrap();

        assert_eq!(items, vec!["chair", "lamp", "table"]);
        let seen = transport.last();
        assert_eq!(
            seen.url,
            "https://gemini.test/v1beta/models/gemini-2.0-flash:generateContent"
        );
        assert_eq!(seen.api_key, "test-key");
        assert_eq!(seen.timeout, Duration::from_secs(60));
        assert_eq!(seen.body["contents"][0]["parts"].as_array().unwrap().len(), 2);
        assert!(seen.prompt().contains("séparés par des virgules"));
    }

    #[tokio::test]
    async fn test_vendor_error_is_returned_not_raised() {
        let file = fixture_image();
        let transport = MockTransport::replying(json!({"error": {"message": "invalid key"}}));
        let err = client(transport)
            .identify_objects(&ImageRef::new(file.path()))
            .await
            .unwrap_err();
        match err {
            EnrichError::Vendor { message, .. } => assert_eq!(message, "invalid key"),
            other => panic!("Expected vendor error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_missing_api_key_fails_before_network() {
        let file = fixture_image();
        let transport = MockTransport::replying(text_reply("chair"));
        let config = GeminiConfig {
            api_key: "${RELOVIT_TEST_UNSET_KEY_XYZ}".to_string(),
            ..test_config()
        };
        let client =
            GeminiClient::with_transport(config, PromptConfig::default(), transport.clone());
        assert!(!client.is_configured());

        let err = client
            .generate_description("Chaise", &[ImageRef::new(file.path())])
            .await
            .unwrap_err();
        assert!(matches!(err, EnrichError::MissingApiKey));
        assert_eq!(transport.calls(), 0);
    }

    #[tokio::test]
    async fn test_identify_missing_image_is_terminal() {
        let transport = MockTransport::replying(text_reply("chair"));
        let err = client(transport.clone())
            .identify_objects(&ImageRef::new("/no/such/photo.jpg"))
            .await
            .unwrap_err();
        assert!(matches!(err, EnrichError::ImageNotFound(_)));
        assert_eq!(transport.calls(), 0);
    }

    #[tokio::test]
    async fn test_description_substitutes_product_name() {
        let file = fixture_image();
        let transport = MockTransport::replying(text_reply("  Une belle chaise.  "));
        let description = client(transport.clone())
            .generate_description("Chaise Thonet", &[ImageRef::new(file.path())])
            .await
            .unwrap();
        assert_eq!(description, "Une belle chaise.");
        assert!(transport.last().prompt().contains("« Chaise Thonet »"));
    }

    #[tokio::test]
    async fn test_price_rejects_non_numeric_text() {
        let file = fixture_image();
        let transport = MockTransport::replying(text_reply("about fifty euros"));
        let err = client(transport)
            .generate_price("Chaise", &[ImageRef::new(file.path())], None)
            .await
            .unwrap_err();
        assert!(matches!(err, EnrichError::Parse(_)));
    }

    #[tokio::test]
    async fn test_price_uses_requested_range() {
        let file = fixture_image();
        let transport = MockTransport::replying(text_reply("120.00"));
        let price = client(transport.clone())
            .generate_price("Chaise", &[ImageRef::new(file.path())], Some(PriceRange::High))
            .await
            .unwrap();
        assert_eq!(price.amount(), 120.0);
        assert!(transport.last().prompt().contains("fourchette haute"));
    }

    #[tokio::test]
    async fn test_taxonomy_decodes_fenced_json() {
        let file = fixture_image();
        let transport = MockTransport::replying(text_reply(
            "```json\n{\"category\":[\"Home\"],\"tags\":[\"x\"]}\n```",
        ));
        let terms = client(transport.clone())
            .generate_taxonomy_terms("Lampe", &[ImageRef::new(file.path())])
            .await
            .unwrap();
        assert_eq!(
            terms,
            TaxonomyTerms {
                category: vec!["Home".to_string()],
                tags: vec!["x".to_string()],
            }
        );
        assert_eq!(
            transport.last().body["generationConfig"]["responseMimeType"],
            "application/json"
        );
    }

    #[tokio::test]
    async fn test_taxonomy_rejects_wrong_shape() {
        let file = fixture_image();
        let transport = MockTransport::replying(text_reply("{\"category\": \"Home\"}"));
        let err = client(transport)
            .generate_taxonomy_terms("Lampe", &[ImageRef::new(file.path())])
            .await
            .unwrap_err();
        assert!(matches!(err, EnrichError::Parse(_)));
    }

    #[tokio::test]
    async fn test_generate_image_uses_image_model_and_long_timeout() {
        let file = fixture_image();
        let transport = MockTransport::replying(json!({"candidates": [{"content": {"parts": [
            {"inlineData": {"data": "iVBORw0K", "mimeType": "image/png"}}
        ]}}]}));
        let image = client(transport.clone())
            .generate_image(&ImageRef::new(file.path()))
            .await
            .unwrap();
        assert_eq!(image.data, "iVBORw0K");
        assert_eq!(image.mime_type, "image/png");

        let seen = transport.last();
        assert!(seen
            .url
            .contains("gemini-2.0-flash-preview-image-generation:generateContent"));
        assert_eq!(seen.timeout, Duration::from_secs(180));
    }

    #[tokio::test]
    async fn test_generate_image_rejects_text_only_answer() {
        let file = fixture_image();
        let transport = MockTransport::replying(text_reply("I cannot do that."));
        let err = client(transport)
            .generate_image(&ImageRef::new(file.path()))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("expected image data"));
    }

    #[tokio::test]
    async fn test_generate_image_rejects_caption_before_image() {
        let file = fixture_image();
        let transport = MockTransport::replying(json!({"candidates": [{"content": {"parts": [
            {"text": "Here is your product photo."},
            {"inlineData": {"data": "iVBORw0K", "mimeType": "image/png"}}
        ]}}]}));
        let err = client(transport)
            .generate_image(&ImageRef::new(file.path()))
            .await
            .unwrap_err();
        assert!(matches!(err, EnrichError::Parse(msg) if msg == "expected image data, got text"));
    }

    #[tokio::test]
    async fn test_transport_error_passes_through() {
        let file = fixture_image();
        let transport =
            MockTransport::new(|_, _| Err(EnrichError::Transport("connection refused".into())));
        let err = client(transport)
            .generate_description("Chaise", &[ImageRef::new(file.path())])
            .await
            .unwrap_err();
        assert!(matches!(err, EnrichError::Transport(msg) if msg == "connection refused"));
    }

    #[test]
    fn test_split_items() {
        assert_eq!(split_items("a, b ,c"), vec!["a", "b", "c"]);
        assert_eq!(split_items("solo"), vec!["solo"]);
        assert!(split_items(" , ").is_empty());
    }

    #[test]
    fn test_resolve_env_var() {
        assert_eq!(resolve_env_var("plain-key"), Some("plain-key".to_string()));
        assert_eq!(resolve_env_var(""), None);
        assert_eq!(resolve_env_var("${DEFINITELY_NOT_SET_XYZ_123}"), None);
    }
}
