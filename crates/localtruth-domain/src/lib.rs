//! LocalTruth Domain Layer
//!
//! Core model for the LocalTruth misinformation dashboard. This crate holds
//! the claim record, the vote arithmetic and the trait seams every other
//! crate plugs into. Its only external dependency is `uuid`.
//!
//! ## Key Concepts
//!
//! - **Claim**: a submitted statement with a verdict and community tallies
//! - **Verdict**: status and confidence derived once from a classifier
//! - **Vote**: a viewer's up/down opinion, nudging confidence by a fixed step
//!
//! ## Architecture
//!
//! - Pure business logic only
//! - Infrastructure implementations live in other crates
//! - Trait definitions for all external interactions

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod claim;
pub mod confidence;
pub mod status;
pub mod traits;
pub mod vote;

// Re-exports for convenience
pub use claim::{Claim, ClaimId};
pub use confidence::{Classification, Verdict, DEFAULT_INCONCLUSIVE_THRESHOLD};
pub use status::ClaimStatus;
pub use vote::{
    clamp_confidence, VoteOutcome, VoteTally, VoteType, MAX_CONFIDENCE, MIN_CONFIDENCE,
    VOTE_IMPACT,
};
