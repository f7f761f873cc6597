//! Configuration management for Relovit.
//!
//! Configuration is loaded from the platform config directory with defaults
//! for every field. Nothing reads settings from global state at call time:
//! callers load a [`Config`] once and hand the relevant sections to the
//! client and enricher.

mod types;
mod validate;

pub use types::*;

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Root configuration structure for Relovit.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Gemini API settings
    pub gemini: GeminiConfig,

    /// Prompt wording and templates
    pub prompts: PromptConfig,

    /// Enrichment run settings
    pub enrichment: EnrichmentConfig,

    /// Output settings
    pub output: OutputConfig,

    /// Logging settings
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from the default location.
    ///
    /// Returns default configuration if the file doesn't exist.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default config file path.
    ///
    /// Uses platform-appropriate directories:
    /// - macOS: ~/Library/Application Support/com.relovit.relovit/config.toml
    /// - Linux: ~/.config/relovit/config.toml
    /// - Windows: C:\Users\<User>\AppData\Roaming\relovit\config\config.toml
    ///
    /// Falls back to ~/.relovit/config.toml if directory detection fails.
    pub fn default_path() -> PathBuf {
        directories::ProjectDirs::from("com", "relovit", "relovit")
            .map(|dirs| dirs.config_dir().to_path_buf().join("config.toml"))
            .unwrap_or_else(|| {
                let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
                PathBuf::from(home).join(".relovit").join("config.toml")
            })
    }

    /// Get the resolved directory for generated images (with ~ expansion).
    pub fn image_dir(&self) -> PathBuf {
        let path_str = self.output.image_dir.to_string_lossy();
        let expanded = shellexpand::tilde(&path_str);
        PathBuf::from(expanded.into_owned())
    }

    /// Serialize the config to a pretty TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ValidationError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.gemini.text_timeout_secs, 60);
        assert_eq!(config.gemini.image_timeout_secs, 180);
        assert_eq!(config.enrichment.retry_attempts, 0);
        assert_eq!(config.prompts.price_range, "medium");
    }

    #[test]
    fn test_config_to_toml() {
        let config = Config::default();
        let toml = config.to_toml().unwrap();
        assert!(toml.contains("[gemini]"));
        assert!(toml.contains("[prompts]"));
        assert!(toml.contains("[prompts.templates]"));
    }

    #[test]
    fn test_load_partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[gemini]\ntext_model = \"gemini-test\"\n\n[prompts]\nlanguage = \"English\""
        )
        .unwrap();

        let config = Config::load_from(file.path()).unwrap();
        assert_eq!(config.gemini.text_model, "gemini-test");
        assert_eq!(config.gemini.image_timeout_secs, 180);
        assert_eq!(config.prompts.language, "English");
        assert_eq!(config.prompts.desc_tone, "détaillée, honnête et commerciale");
    }

    #[test]
    fn test_load_rejects_invalid_values() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[gemini]\ntext_timeout_secs = 0").unwrap();

        let err = Config::load_from(file.path()).unwrap_err();
        assert!(err.to_string().contains("text_timeout_secs"));
    }

    #[test]
    fn test_image_dir_expands_tilde() {
        let config = Config::default();
        assert!(!config.image_dir().to_string_lossy().starts_with('~'));
    }
}
