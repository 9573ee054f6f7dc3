//! LocalTruth Verifier
//!
//! Application layer over the domain, store and provider crates.
//!
//! # Architecture
//!
//! ```text
//! Text → Detector → (search) → LLM classifier → Verdict → Claim → ClaimStore
//!                                                   ↑
//!                         VoteTracker → run_transaction
//! ```
//!
//! # Example Usage
//!
//! ```no_run
//! use localtruth_verifier::{record, apply_vote, Detector, VerifierConfig};
//! use localtruth_domain::VoteType;
//! use localtruth_llm::{MockProvider, MockSearch};
//! use localtruth_store::SqliteStore;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let llm = MockProvider::new(r#"{"isMisinformation": true, "confidenceScore": 0.8, "reason": "r"}"#);
//! let detector = Detector::new(llm, MockSearch::default(), VerifierConfig::offline())?;
//! let mut store = SqliteStore::new(":memory:")?;
//!
//! let detection = detector.detect("Drinking seawater cures dehydration.", None).await?;
//! let claim = record(&mut store, &detection)?;
//!
//! let outcome = apply_vote(&store, claim.id, VoteType::Down, None)?;
//! println!("confidence now {:.2}", outcome.tally.confidence_score);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod config;
mod detector;
mod error;
mod parser;
mod prompt;
mod votes;

pub use config::VerifierConfig;
pub use detector::{record, Detection, Detector};
pub use error::{VerifierError, VoteError};
pub use parser::parse_classification;
pub use votes::{apply_vote, VoteTracker};
