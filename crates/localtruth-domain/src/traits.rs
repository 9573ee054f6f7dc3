//! Trait definitions for external interactions
//!
//! These traits define the boundaries between domain logic and infrastructure.
//! Infrastructure implementations live in other crates.

use crate::{Claim, ClaimId, ClaimStatus, VoteTally};
use std::fmt;
use std::future::Future;

/// Trait for storing and retrieving claims
///
/// Implemented by the infrastructure layer (localtruth-store)
pub trait ClaimStore {
    /// Error type for store operations
    type Error;

    /// Insert a newly classified claim
    fn create_claim(&mut self, claim: Claim) -> Result<ClaimId, Self::Error>;

    /// Get a claim by ID
    fn get_claim(&self, id: ClaimId) -> Result<Option<Claim>, Self::Error>;

    /// Query claims matching criteria, newest first
    fn query_claims(&self, query: &ClaimQuery) -> Result<Vec<Claim>, Self::Error>;

    /// Count stored claims
    fn count_claims(&self) -> Result<u64, Self::Error>;

    /// Run a read-modify-write transaction on one claim's tally
    ///
    /// `update` receives the current record and returns the tally to write
    /// together with a value handed back to the caller. Implementations must
    /// commit the write only if the record is unchanged since it was read,
    /// and may call `update` again on a fresh read after a conflict. Nothing
    /// is written when an error is returned.
    fn run_transaction<T, F>(
        &self,
        id: ClaimId,
        update: F,
    ) -> Result<T, TransactionError<Self::Error>>
    where
        F: FnMut(&Claim) -> (VoteTally, T);
}

/// Why a claim transaction did not commit
#[derive(Debug)]
pub enum TransactionError<E> {
    /// The claim does not exist (or vanished mid-transaction)
    NotFound(ClaimId),

    /// Every attempt lost a race with a concurrent writer
    Conflict {
        /// Claim being updated
        claim_id: ClaimId,
        /// Attempts made before giving up
        attempts: u32,
    },

    /// The backing store failed
    Store(E),
}

impl<E: fmt::Display> fmt::Display for TransactionError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransactionError::NotFound(id) => write!(f, "Claim not found: {}", id),
            TransactionError::Conflict { claim_id, attempts } => write!(
                f,
                "Write conflict on claim {} after {} attempt(s)",
                claim_id, attempts
            ),
            TransactionError::Store(e) => write!(f, "Store error: {}", e),
        }
    }
}

impl<E: fmt::Debug + fmt::Display> std::error::Error for TransactionError<E> {}

/// Query criteria for retrieving claims
#[derive(Debug, Clone, Default)]
pub struct ClaimQuery {
    /// Filter by status
    pub status: Option<ClaimStatus>,

    /// Filter by minimum confidence score
    pub min_confidence: Option<f64>,

    /// Maximum results to return
    pub limit: Option<usize>,
}

/// Trait for LLM provider operations
///
/// Implemented by the infrastructure layer (localtruth-llm)
pub trait LlmProvider {
    /// Error type for LLM operations
    type Error;

    /// Generate a text completion
    fn generate(&self, prompt: &str) -> impl Future<Output = Result<String, Self::Error>> + Send;

    /// Generate a completion constrained to JSON output
    fn generate_json(&self, prompt: &str)
        -> impl Future<Output = Result<String, Self::Error>> + Send;
}

/// A single web search hit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    /// Page title
    pub title: String,
    /// Page URL
    pub link: String,
    /// Text excerpt
    pub snippet: String,
}

/// Trait for web search used to ground classification
///
/// Implemented by the infrastructure layer (localtruth-llm)
pub trait SearchProvider {
    /// Error type for search operations
    type Error;

    /// Search the web for `query`
    fn search(&self, query: &str)
        -> impl Future<Output = Result<Vec<SearchResult>, Self::Error>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transaction_error_display() {
        let id = ClaimId::from_value(1);
        let err: TransactionError<String> = TransactionError::Conflict {
            claim_id: id,
            attempts: 5,
        };
        assert!(err.to_string().contains("after 5 attempt(s)"));

        let err: TransactionError<String> = TransactionError::NotFound(id);
        assert!(err.to_string().starts_with("Claim not found"));
    }

    #[test]
    fn test_default_query_is_unfiltered() {
        let query = ClaimQuery::default();
        assert!(query.status.is_none());
        assert!(query.min_confidence.is_none());
        assert!(query.limit.is_none());
    }
}
