//! Configuration validation with range checks.

use crate::error::ConfigError;
use crate::prompts::PriceRange;

use super::Config;

impl Config {
    /// Validate configuration values are within acceptable ranges.
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.gemini.base_url.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "gemini.base_url must not be empty".into(),
            ));
        }
        if self.gemini.text_model.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "gemini.text_model must not be empty".into(),
            ));
        }
        if self.gemini.image_model.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "gemini.image_model must not be empty".into(),
            ));
        }
        if self.gemini.text_timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "gemini.text_timeout_secs must be > 0".into(),
            ));
        }
        if self.gemini.image_timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "gemini.image_timeout_secs must be > 0".into(),
            ));
        }
        if PriceRange::parse(&self.prompts.price_range).is_none() {
            return Err(ConfigError::ValidationError(
                "prompts.price_range must be one of: low, medium, high".into(),
            ));
        }
        if self.enrichment.retry_attempts > 10 {
            return Err(ConfigError::ValidationError(
                "enrichment.retry_attempts must be <= 10".into(),
            ));
        }
        Ok(())
    }
}
