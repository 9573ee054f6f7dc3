//! Error types for detection and voting

use localtruth_domain::ClaimId;
use thiserror::Error;

/// Errors that can occur while checking a text
#[derive(Error, Debug)]
pub enum VerifierError {
    /// Input is shorter than the configured minimum
    #[error("Text too short: {0} chars (min: {1})")]
    TooShort(usize, usize),

    /// Input is longer than the configured maximum
    #[error("Text too long: {0} chars (max: {1})")]
    TooLong(usize, usize),

    /// LLM provider error
    #[error("LLM error: {0}")]
    Llm(String),

    /// The classifier answered with something other than a verdict
    #[error("Invalid classifier response: {0}")]
    InvalidResponse(String),

    /// Claim store error
    #[error("Store error: {0}")]
    Store(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<serde_json::Error> for VerifierError {
    fn from(e: serde_json::Error) -> Self {
        VerifierError::InvalidResponse(e.to_string())
    }
}

/// Why a vote was not applied
///
/// Nothing is written when either variant is returned.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum VoteError {
    /// The claim does not exist
    #[error("Claim not found: {0}")]
    NotFound(ClaimId),

    /// The store refused or could not complete the transaction
    #[error("Vote on claim {claim_id} rejected: {reason}")]
    Rejected {
        /// Claim being voted on
        claim_id: ClaimId,
        /// Store-reported cause
        reason: String,
    },
}
