//! Retry utilities for transient Gemini failures.
//!
//! Provides classification of retryable errors and exponential backoff.
//! Retrying is opt-in through `enrichment.retry_attempts`.

use crate::error::EnrichError;
use std::time::Duration;

/// Determine whether an enrichment error is worth retrying.
///
/// Retryable errors: network failures and timeouts, rate limits (429),
/// server errors (5xx). Everything else fails the same way on a second try.
pub fn is_retryable(error: &EnrichError) -> bool {
    match error {
        EnrichError::Transport(_) => true,
        EnrichError::Vendor {
            status_code: Some(code),
            ..
        } => *code == 429 || (500..=599).contains(code),
        _ => false,
    }
}

/// Calculate exponential backoff duration for a given attempt.
///
/// Uses `base_delay * 2^attempt` with a cap at 30 seconds.
pub fn backoff_duration(attempt: u32, base_delay_ms: u64) -> Duration {
    let delay = base_delay_ms.saturating_mul(2u64.saturating_pow(attempt));
    Duration::from_millis(delay.min(30_000))
}
