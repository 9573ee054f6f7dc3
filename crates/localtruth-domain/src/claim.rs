//! Claim module - one analyzed statement and its community tallies

use crate::status::ClaimStatus;
use crate::vote::VoteTally;
use std::fmt;

/// Unique identifier for a claim based on UUIDv7
///
/// UUIDv7 identifiers sort by creation time, which keeps "newest first"
/// listings cheap for the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClaimId(u128);

impl ClaimId {
    /// Generate a new UUIDv7-based ClaimId
    ///
    /// # Examples
    ///
    /// ```
    /// use localtruth_domain::ClaimId;
    ///
    /// let id = ClaimId::new();
    /// assert!(id.value() > 0);
    /// ```
    pub fn new() -> Self {
        Self(uuid::Uuid::now_v7().as_u128())
    }

    /// Create a ClaimId from a raw u128 value
    ///
    /// This is primarily for storage layer deserialization.
    pub fn from_value(value: u128) -> Self {
        Self(value)
    }

    /// Parse a ClaimId from its hyphenated string form
    ///
    /// # Examples
    ///
    /// ```
    /// use localtruth_domain::ClaimId;
    ///
    /// let id = ClaimId::new();
    /// let parsed = ClaimId::from_string(&id.to_string()).unwrap();
    /// assert_eq!(id, parsed);
    /// ```
    pub fn from_string(s: &str) -> Result<Self, String> {
        uuid::Uuid::parse_str(s)
            .map(|u| Self(u.as_u128()))
            .map_err(|e| format!("Invalid claim id '{}': {}", s, e))
    }

    /// Get the raw u128 value
    pub fn value(&self) -> u128 {
        self.0
    }
}

impl Default for ClaimId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ClaimId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", uuid::Uuid::from_u128(self.0))
    }
}

/// A claim - a submitted statement together with its verdict and votes
///
/// The status is fixed when the claim is created. After creation only the
/// vote tracker mutates the record, and only the tally fields.
#[derive(Debug, Clone, PartialEq)]
pub struct Claim {
    /// Unique identifier
    pub id: ClaimId,

    /// The analyzed text
    pub content: String,

    /// Where the text came from (e.g. "User Input", a URL)
    pub source: String,

    /// Language code the content is written in
    pub language: String,

    /// Verdict derived from the classifier at creation time
    pub status: ClaimStatus,

    /// Certainty in the status, in [0, 1]
    pub confidence_score: f64,

    /// Community agreement count
    pub upvotes: u32,

    /// Community disagreement count
    pub downvotes: u32,

    /// Human-readable explanation of the verdict, if one was generated
    pub explanation: Option<String>,

    /// When the text was submitted (seconds since Unix epoch)
    pub detected_at: u64,

    /// When the verdict was produced (seconds since Unix epoch)
    pub updated_at: u64,
}

impl Claim {
    /// Create a fresh claim with no votes
    pub fn new(
        content: impl Into<String>,
        status: ClaimStatus,
        confidence_score: f64,
        detected_at: u64,
    ) -> Self {
        Self {
            id: ClaimId::new(),
            content: content.into(),
            source: "User Input".to_string(),
            language: "en".to_string(),
            status,
            confidence_score: confidence_score.clamp(0.0, 1.0),
            upvotes: 0,
            downvotes: 0,
            explanation: None,
            detected_at,
            updated_at: detected_at,
        }
    }

    /// Set the source description
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }

    /// Set the content language
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Attach an explanation
    pub fn with_explanation(mut self, explanation: impl Into<String>) -> Self {
        self.explanation = Some(explanation.into());
        self
    }

    /// The vote-tracked fields of this claim
    pub fn tally(&self) -> VoteTally {
        VoteTally {
            upvotes: self.upvotes,
            downvotes: self.downvotes,
            confidence_score: self.confidence_score,
        }
    }

    /// Overwrite the vote-tracked fields
    pub fn set_tally(&mut self, tally: VoteTally) {
        self.upvotes = tally.upvotes;
        self.downvotes = tally.downvotes;
        self.confidence_score = tally.confidence_score;
    }

    /// Minutes between submission and verdict, rounded
    pub fn time_to_verify_minutes(&self) -> Option<u64> {
        let elapsed = self.updated_at.checked_sub(self.detected_at)?;
        Some((elapsed + 30) / 60)
    }

    /// One-line summary of the votes, used when asking for an explanation
    pub fn community_feedback(&self) -> String {
        format!(
            "This claim has received {} positive community votes and {} negative votes.",
            self.upvotes, self.downvotes
        )
    }
}
