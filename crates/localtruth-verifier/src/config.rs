//! Configuration for the Detector

use serde::{Deserialize, Serialize};

/// Configuration for the detection pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VerifierConfig {
    /// Minimum input length after trimming (characters)
    pub min_text_length: usize,

    /// Maximum input length after trimming (characters)
    pub max_text_length: usize,

    /// Score a verdict must exceed to leave `Inconclusive`
    pub inconclusive_threshold: f64,

    /// Ground classification in web search results
    pub search_enabled: bool,

    /// Maximum search results passed to the classifier
    pub search_results_limit: usize,

    /// Ask the model for a user-facing explanation
    pub explain: bool,

    /// Source recorded when the caller gives none
    pub default_source: String,

    /// Language recorded on new claims
    pub language: String,
}

impl VerifierConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.min_text_length == 0 {
            return Err("min_text_length must be greater than 0".to_string());
        }
        if self.max_text_length < self.min_text_length {
            return Err("max_text_length cannot be less than min_text_length".to_string());
        }
        if !(0.0..1.0).contains(&self.inconclusive_threshold) {
            return Err("inconclusive_threshold must be in [0, 1)".to_string());
        }
        if self.search_enabled && self.search_results_limit == 0 {
            return Err("search_results_limit must be greater than 0 when search is enabled".to_string());
        }
        if self.default_source.trim().is_empty() {
            return Err("default_source cannot be empty".to_string());
        }
        Ok(())
    }

    /// Offline preset: no web search, no explanation call
    pub fn offline() -> Self {
        Self {
            search_enabled: false,
            explain: false,
            ..Self::default()
        }
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}

impl Default for VerifierConfig {
    fn default() -> Self {
        Self {
            min_text_length: 20,
            max_text_length: 10_000,
            inconclusive_threshold: localtruth_domain::DEFAULT_INCONCLUSIVE_THRESHOLD,
            search_enabled: true,
            search_results_limit: 5,
            explain: true,
            default_source: "User Input".to_string(),
            language: "en".to_string(),
        }
    }
}
