//! Turning a classifier result into a stored verdict

use crate::status::ClaimStatus;

/// Default score a verdict must exceed to be anything but Inconclusive
pub const DEFAULT_INCONCLUSIVE_THRESHOLD: f64 = 0.5;

/// Output of the classification engine
///
/// `confidence_score` is the classifier's certainty that the text *is*
/// misinformation, in [0, 1].
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    /// Whether the text was judged to be misinformation
    pub is_misinformation: bool,
    /// Certainty of the misinformation judgement
    pub confidence_score: f64,
    /// Classifier's stated reasoning
    pub reason: String,
}

/// Status and score to store for a freshly classified claim
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Verdict {
    /// Derived status
    pub status: ClaimStatus,
    /// Certainty in `status`, in [0, 1]
    pub confidence_score: f64,
}

impl Classification {
    /// Derive the verdict to store
    ///
    /// The stored score always expresses certainty in the stored status, so
    /// for text judged factual the misinformation score is inverted.
    ///
    /// # Examples
    ///
    /// ```
    /// use localtruth_domain::{Classification, ClaimStatus};
    ///
    /// let c = Classification {
    ///     is_misinformation: false,
    ///     confidence_score: 0.1,
    ///     reason: "Matches published data".into(),
    /// };
    /// let verdict = c.verdict(0.5);
    /// assert_eq!(verdict.status, ClaimStatus::Verified);
    /// assert!((verdict.confidence_score - 0.9).abs() < 1e-9);
    /// ```
    pub fn verdict(&self, inconclusive_threshold: f64) -> Verdict {
        let score = self.confidence_score.clamp(0.0, 1.0);

        if self.is_misinformation {
            let status = if score > inconclusive_threshold {
                ClaimStatus::False
            } else {
                ClaimStatus::Inconclusive
            };
            Verdict {
                status,
                confidence_score: score,
            }
        } else {
            let inverted = 1.0 - score;
            let status = if inverted > inconclusive_threshold {
                ClaimStatus::Verified
            } else {
                ClaimStatus::Inconclusive
            };
            Verdict {
                status,
                confidence_score: inverted,
            }
        }
    }
}
