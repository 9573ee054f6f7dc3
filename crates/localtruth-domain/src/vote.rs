//! Vote arithmetic
//!
//! A viewer's vote nudges a claim's confidence score by [`VOTE_IMPACT`] and
//! moves one of the two tallies. The viewer's previous vote is supplied by
//! the caller; nothing here remembers who voted.
//!
//! | prior | vote | effect |
//! |-------|------|--------|
//! | none  | up   | +1 up, +IMPACT |
//! | up    | up   | -1 up, -IMPACT, viewer vote cleared |
//! | up    | down | -1 up, +1 down, -2 IMPACT |
//!
//! The resulting score is always clamped to [`MIN_CONFIDENCE`, `MAX_CONFIDENCE`].

use std::fmt;

/// Confidence change caused by a single vote
pub const VOTE_IMPACT: f64 = 0.01;

/// Lowest confidence a vote can push a claim to
pub const MIN_CONFIDENCE: f64 = 0.01;

/// Highest confidence a vote can push a claim to
pub const MAX_CONFIDENCE: f64 = 0.99;

/// Direction of a vote
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VoteType {
    /// The viewer agrees with the verdict
    Up,
    /// The viewer disagrees with the verdict
    Down,
}

impl VoteType {
    /// Get the vote name as used on the wire
    pub fn as_str(&self) -> &'static str {
        match self {
            VoteType::Up => "up",
            VoteType::Down => "down",
        }
    }

    /// Parse a vote direction, ignoring case
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "up" => Some(VoteType::Up),
            "down" => Some(VoteType::Down),
            _ => None,
        }
    }

    /// Signed confidence nudge for this direction
    fn nudge(&self) -> f64 {
        match self {
            VoteType::Up => VOTE_IMPACT,
            VoteType::Down => -VOTE_IMPACT,
        }
    }
}

impl fmt::Display for VoteType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for VoteType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid vote: {} (expected 'up' or 'down')", s))
    }
}

/// The three fields of a claim that votes mutate
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VoteTally {
    /// Agreement count
    pub upvotes: u32,
    /// Disagreement count
    pub downvotes: u32,
    /// Confidence score after the last vote
    pub confidence_score: f64,
}

/// Result of applying one vote
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VoteOutcome {
    /// Tally to write back
    pub tally: VoteTally,
    /// The viewer's vote after this operation (`None` after an un-vote)
    pub viewer_vote: Option<VoteType>,
}

impl VoteTally {
    /// Create a tally
    pub fn new(upvotes: u32, downvotes: u32, confidence_score: f64) -> Self {
        Self {
            upvotes,
            downvotes,
            confidence_score,
        }
    }

    /// Apply `vote` from a viewer whose previous vote was `prior`
    ///
    /// Repeating the prior vote withdraws it. Any other vote first reverses
    /// the prior one (if any) and then applies the new one.
    ///
    /// # Examples
    ///
    /// ```
    /// use localtruth_domain::{VoteTally, VoteType};
    ///
    /// let tally = VoteTally::new(10, 2, 0.50);
    /// let outcome = tally.apply(VoteType::Up, None);
    /// assert_eq!(outcome.tally.upvotes, 11);
    /// assert_eq!(outcome.viewer_vote, Some(VoteType::Up));
    ///
    /// let undone = outcome.tally.apply(VoteType::Up, Some(VoteType::Up));
    /// assert_eq!(undone.tally.upvotes, 10);
    /// assert_eq!(undone.viewer_vote, None);
    /// ```
    pub fn apply(&self, vote: VoteType, prior: Option<VoteType>) -> VoteOutcome {
        let mut next = *self;

        let viewer_vote = if prior == Some(vote) {
            next.withdraw(vote);
            None
        } else {
            if let Some(previous) = prior {
                next.withdraw(previous);
            }
            next.cast(vote);
            Some(vote)
        };

        next.confidence_score = clamp_confidence(next.confidence_score);

        VoteOutcome {
            tally: next,
            viewer_vote,
        }
    }

    fn cast(&mut self, vote: VoteType) {
        match vote {
            VoteType::Up => self.upvotes = self.upvotes.saturating_add(1),
            VoteType::Down => self.downvotes = self.downvotes.saturating_add(1),
        }
        self.confidence_score += vote.nudge();
    }

    fn withdraw(&mut self, vote: VoteType) {
        // Counts never go negative even if the caller's prior is stale.
        match vote {
            VoteType::Up => self.upvotes = self.upvotes.saturating_sub(1),
            VoteType::Down => self.downvotes = self.downvotes.saturating_sub(1),
        }
        self.confidence_score -= vote.nudge();
    }
}

/// Clamp a score into the range votes are allowed to produce
///
/// NaN collapses to the midpoint so a corrupted score cannot escape the range.
pub fn clamp_confidence(score: f64) -> f64 {
    if score.is_nan() {
        return 0.5;
    }
    score.clamp(MIN_CONFIDENCE, MAX_CONFIDENCE)
}
