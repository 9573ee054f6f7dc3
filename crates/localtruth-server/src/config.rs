//! Configuration file parsing for the server.
//!
//! Loads settings from TOML files including bind address, database path,
//! the LLM endpoint, search credentials and verifier tuning.

use localtruth_verifier::VerifierConfig;
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

/// Server configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Failed to parse TOML
    #[error("Failed to parse config TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Missing required field
    #[error("Missing required configuration field: {0}")]
    MissingField(String),

    /// A field holds an unusable value
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Server configuration loaded from TOML
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Bind address (e.g., "127.0.0.1")
    pub bind_address: String,

    /// Bind port (e.g., 8080)
    pub bind_port: u16,

    /// SQLite database file (":memory:" for a throwaway store)
    pub database_path: String,

    /// Classification model settings
    #[serde(default)]
    pub llm: LlmConfig,

    /// Web search credentials
    #[serde(default)]
    pub search: SearchConfig,

    /// Detection pipeline tuning
    #[serde(default)]
    pub verifier: VerifierConfig,
}

/// Ollama connection settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Ollama API endpoint
    pub endpoint: String,

    /// Model name
    pub model: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,

    /// Attempts per request
    pub max_retries: u32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            endpoint: localtruth_llm::ollama::DEFAULT_ENDPOINT.to_string(),
            model: "llama3".to_string(),
            timeout_secs: localtruth_llm::ollama::DEFAULT_TIMEOUT_SECS,
            max_retries: localtruth_llm::ollama::DEFAULT_MAX_RETRIES,
        }
    }
}

/// Google Custom Search credentials
///
/// When either field is missing the server falls back to the
/// `GOOGLE_SEARCH_API_KEY` and `GOOGLE_CX` environment variables.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchConfig {
    /// API key
    pub api_key: Option<String>,

    /// Search engine id
    pub cx: Option<String>,
}

impl ServerConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: ServerConfig = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Check required fields and nested sections
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.database_path.trim().is_empty() {
            return Err(ConfigError::MissingField("database_path".to_string()));
        }
        if self.llm.model.trim().is_empty() {
            return Err(ConfigError::MissingField("llm.model".to_string()));
        }
        self.verifier.validate().map_err(ConfigError::Invalid)
    }

    /// Create a default configuration for testing
    pub fn default_test_config() -> Self {
        ServerConfig {
            bind_address: "127.0.0.1".to_string(),
            bind_port: 8080,
            database_path: ":memory:".to_string(),
            llm: LlmConfig::default(),
            search: SearchConfig::default(),
            verifier: VerifierConfig::default(),
        }
    }

    /// Get the full bind address (address:port)
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.bind_address, self.bind_port)
    }
}
