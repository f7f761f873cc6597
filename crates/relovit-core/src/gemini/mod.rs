//! Gemini integration for product enrichment.
//!
//! Layered leaf first: `transport` sends one POST, `request` builds the
//! multimodal payload, `response` normalizes the answer, `client` exposes one
//! method per task, and `enricher` runs several tasks against a product.

pub(crate) mod client;
pub(crate) mod enricher;
pub(crate) mod request;
pub(crate) mod response;
pub(crate) mod retry;
pub(crate) mod transport;

pub use client::{resolve_env_var, split_items, GeminiClient};
pub use enricher::{EnrichOptions, Enricher};
pub use request::{GenerateContentRequest, PromptRequest};
pub use response::{parse_reply, strip_code_fence, AiResponse, Expect};
pub use transport::{HttpReply, HttpTransport, Transport};
