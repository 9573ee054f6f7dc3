//! Error types for the CLI application.

use localtruth_llm::{LlmError, SearchError};
use localtruth_store::StoreError;
use localtruth_verifier::{VerifierError, VoteError};
use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Claim store error
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// LLM client error
    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    /// Search client error
    #[error("Search error: {0}")]
    Search(#[from] SearchError),

    /// Detection failed
    #[error("{0}")]
    Verifier(#[from] VerifierError),

    /// Vote was not applied
    #[error("{0}")]
    Vote(#[from] VoteError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// No claim with the given id
    #[error("Claim not found: {0}")]
    NotFound(String),
}
