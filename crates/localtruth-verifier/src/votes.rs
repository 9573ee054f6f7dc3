//! Vote-adjusted confidence tracking

use crate::error::VoteError;
use localtruth_domain::traits::{ClaimStore, TransactionError};
use localtruth_domain::{ClaimId, VoteOutcome, VoteType};
use std::fmt::Display;
use tracing::{info, warn};

/// Applies viewer votes to claims through the store's transaction primitive
///
/// The tracker never retries; retry policy belongs to the store.
pub struct VoteTracker<'a, S> {
    store: &'a S,
}

impl<'a, S> VoteTracker<'a, S>
where
    S: ClaimStore,
    S::Error: Display,
{
    /// Track votes against `store`
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Apply one vote atomically
    ///
    /// `prior` is the viewer's current vote on the claim. Repeating it
    /// withdraws it; a different vote replaces it.
    pub fn apply_vote(
        &self,
        claim_id: ClaimId,
        vote: VoteType,
        prior: Option<VoteType>,
    ) -> Result<VoteOutcome, VoteError> {
        let result = self.store.run_transaction(claim_id, |claim| {
            let outcome = claim.tally().apply(vote, prior);
            (outcome.tally, outcome)
        });

        match result {
            Ok(outcome) => {
                info!(
                    %claim_id,
                    vote = %vote,
                    prior = ?prior,
                    upvotes = outcome.tally.upvotes,
                    downvotes = outcome.tally.downvotes,
                    confidence = outcome.tally.confidence_score,
                    "vote applied"
                );
                Ok(outcome)
            }
            Err(TransactionError::NotFound(id)) => {
                warn!(claim_id = %id, "vote on missing claim");
                Err(VoteError::NotFound(id))
            }
            Err(e) => {
                warn!(%claim_id, error = %e, "vote rejected");
                Err(VoteError::Rejected {
                    claim_id,
                    reason: e.to_string(),
                })
            }
        }
    }
}

/// Apply one vote against `store`
pub fn apply_vote<S>(
    store: &S,
    claim_id: ClaimId,
    vote: VoteType,
    prior: Option<VoteType>,
) -> Result<VoteOutcome, VoteError>
where
    S: ClaimStore,
    S::Error: Display,
{
    VoteTracker::new(store).apply_vote(claim_id, vote, prior)
}

#[cfg(test)]
mod tests {
    use super::*;
    use localtruth_domain::{Claim, ClaimStatus, VoteTally};
    use localtruth_store::SqliteStore;

    fn seeded() -> (SqliteStore, ClaimId) {
        let mut store = SqliteStore::new(":memory:").unwrap();
        let mut claim = Claim::new("Seeded claim for voting", ClaimStatus::Inconclusive, 0.5, 0);
        claim.set_tally(VoteTally::new(10, 2, 0.50));
        let id = store.create_claim(claim).unwrap();
        (store, id)
    }

    fn assert_tally(store: &SqliteStore, id: ClaimId, up: u32, down: u32, confidence: f64) {
        let claim = store.get_claim(id).unwrap().unwrap();
        assert_eq!((claim.upvotes, claim.downvotes), (up, down));
        assert!((claim.confidence_score - confidence).abs() < 1e-9);
    }

    #[test]
    fn test_vote_sequence() {
        let (store, id) = seeded();
        let tracker = VoteTracker::new(&store);

        let outcome = tracker.apply_vote(id, VoteType::Up, None).unwrap();
        assert_eq!(outcome.viewer_vote, Some(VoteType::Up));
        assert_tally(&store, id, 11, 2, 0.51);

        let outcome = tracker.apply_vote(id, VoteType::Down, Some(VoteType::Up)).unwrap();
        assert_eq!(outcome.viewer_vote, Some(VoteType::Down));
        assert_tally(&store, id, 10, 3, 0.49);

        let outcome = tracker.apply_vote(id, VoteType::Down, Some(VoteType::Down)).unwrap();
        assert_eq!(outcome.viewer_vote, None);
        assert_tally(&store, id, 10, 2, 0.50);
    }

    #[test]
    fn test_up_twice_restores_tally() {
        let (store, id) = seeded();
        apply_vote(&store, id, VoteType::Up, None).unwrap();
        apply_vote(&store, id, VoteType::Up, Some(VoteType::Up)).unwrap();
        assert_tally(&store, id, 10, 2, 0.50);
    }

    #[test]
    fn test_vote_on_missing_claim() {
        let (store, id) = seeded();
        let missing = ClaimId::new();

        let err = apply_vote(&store, missing, VoteType::Up, None).unwrap_err();
        assert_eq!(err, VoteError::NotFound(missing));
        assert_tally(&store, id, 10, 2, 0.50);
    }

    #[test]
    fn test_status_unchanged_by_votes() {
        let (store, id) = seeded();
        for _ in 0..3 {
            apply_vote(&store, id, VoteType::Up, None).unwrap();
        }
        let claim = store.get_claim(id).unwrap().unwrap();
        assert_eq!(claim.status, ClaimStatus::Inconclusive);
        assert_eq!(claim.updated_at, 0);
    }
}
