//! Integration tests for localtruth-store
//!
//! These tests cover the claim lifecycle and the optimistic vote transaction,
//! including races between separate connections on one database file.

use localtruth_domain::traits::{ClaimQuery, ClaimStore, TransactionError};
use localtruth_domain::{Claim, ClaimId, ClaimStatus, VoteOutcome, VoteType};
use localtruth_store::{SqliteStore, StoreError};
use std::sync::{Arc, Barrier};
use std::thread;

fn sample_claim(content: &str, status: ClaimStatus, confidence: f64, detected_at: u64) -> Claim {
    Claim::new(content, status, confidence, detected_at)
}

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

/// Apply a vote through the store the way the vote tracker does
fn vote(
    store: &SqliteStore,
    id: ClaimId,
    vote: VoteType,
    prior: Option<VoteType>,
) -> Result<VoteOutcome, TransactionError<StoreError>> {
    store.run_transaction(id, |claim| {
        let outcome = claim.tally().apply(vote, prior);
        (outcome.tally, outcome)
    })
}

#[test]
fn test_store_initialization() {
    let store = SqliteStore::new(":memory:");
    assert!(store.is_ok(), "Store should initialize successfully");
}

#[test]
fn test_create_and_get_claim() {
    let mut store = SqliteStore::new(":memory:").unwrap();

    let claim = sample_claim("Vaccines cause autism", ClaimStatus::False, 0.95, 1000)
        .with_source("https://example.com/post")
        .with_explanation("Large cohort studies found no link.");
    let claim_id = claim.id;

    let result = store.create_claim(claim.clone());
    assert_eq!(result.unwrap(), claim_id);

    let retrieved = store.get_claim(claim_id).unwrap().expect("claim should exist");
    assert_eq!(retrieved, claim);
}

#[test]
fn test_duplicate_detection() {
    let mut store = SqliteStore::new(":memory:").unwrap();
    let claim = sample_claim("The earth is flat", ClaimStatus::False, 0.99, 1000);

    assert!(store.create_claim(claim.clone()).is_ok());

    let result = store.create_claim(claim);
    assert!(matches!(result, Err(StoreError::Duplicate)));
}

#[test]
fn test_get_nonexistent_claim() {
    let store = SqliteStore::new(":memory:").unwrap();
    let result = store.get_claim(ClaimId::new()).unwrap();
    assert!(result.is_none(), "Should return None for nonexistent claim");
}

#[test]
fn test_query_claims_by_status() {
    let mut store = SqliteStore::new(":memory:").unwrap();

    let statuses = [
        ClaimStatus::Verified,
        ClaimStatus::False,
        ClaimStatus::False,
        ClaimStatus::Inconclusive,
    ];
    for (i, status) in statuses.iter().enumerate() {
        let claim = sample_claim(&format!("claim number {}", i), *status, 0.7, 1000 + i as u64);
        store.create_claim(claim).unwrap();
    }

    let query = ClaimQuery {
        status: Some(ClaimStatus::False),
        ..Default::default()
    };

    let results = store.query_claims(&query).unwrap();
    assert_eq!(results.len(), 2);
    assert!(results.iter().all(|c| c.status == ClaimStatus::False));
}

#[test]
fn test_query_claims_by_confidence() {
    let mut store = SqliteStore::new(":memory:").unwrap();

    for i in 0..5 {
        let confidence = 0.1 + 0.2 * i as f64;
        let claim = sample_claim(&format!("claim {}", i), ClaimStatus::Verified, confidence, 1000);
        store.create_claim(claim).unwrap();
    }

    let query = ClaimQuery {
        min_confidence: Some(0.5),
        ..Default::default()
    };

    let results = store.query_claims(&query).unwrap();
    assert_eq!(results.len(), 3, "0.5, 0.7 and 0.9 should match");
    assert!(results.iter().all(|c| c.confidence_score >= 0.5));
}

#[test]
fn test_query_claims_newest_first_with_limit() {
    let mut store = SqliteStore::new(":memory:").unwrap();

    for i in 0..10 {
        let claim = sample_claim(&format!("claim {}", i), ClaimStatus::Inconclusive, 0.5, 1000 + i);
        store.create_claim(claim).unwrap();
    }

    let query = ClaimQuery {
        limit: Some(3),
        ..Default::default()
    };

    let results = store.query_claims(&query).unwrap();
    let detected: Vec<u64> = results.iter().map(|c| c.detected_at).collect();
    assert_eq!(detected, vec![1009, 1008, 1007]);
}

#[test]
fn test_count_claims() {
    let mut store = SqliteStore::new(":memory:").unwrap();
    assert_eq!(store.count_claims().unwrap(), 0);

    store
        .create_claim(sample_claim("one claim", ClaimStatus::False, 0.8, 1))
        .unwrap();
    store
        .create_claim(sample_claim("another claim", ClaimStatus::Verified, 0.8, 2))
        .unwrap();

    assert_eq!(store.count_claims().unwrap(), 2);
}

#[test]
fn test_vote_sequence_through_store() {
    let mut store = SqliteStore::new(":memory:").unwrap();

    let mut claim = sample_claim("Drinking bleach cures colds", ClaimStatus::False, 0.50, 1000);
    claim.upvotes = 10;
    claim.downvotes = 2;
    let id = store.create_claim(claim).unwrap();

    let first = vote(&store, id, VoteType::Up, None).unwrap();
    let stored = store.get_claim(id).unwrap().unwrap();
    assert_eq!((stored.upvotes, stored.downvotes), (11, 2));
    assert!(approx(stored.confidence_score, 0.51));
    assert_eq!(first.viewer_vote, Some(VoteType::Up));

    let second = vote(&store, id, VoteType::Down, first.viewer_vote).unwrap();
    let stored = store.get_claim(id).unwrap().unwrap();
    assert_eq!((stored.upvotes, stored.downvotes), (10, 3));
    assert!(approx(stored.confidence_score, 0.49));

    let third = vote(&store, id, VoteType::Down, second.viewer_vote).unwrap();
    let stored = store.get_claim(id).unwrap().unwrap();
    assert_eq!((stored.upvotes, stored.downvotes), (10, 2));
    assert!(approx(stored.confidence_score, 0.50));
    assert_eq!(third.viewer_vote, None);
}

#[test]
fn test_transaction_only_touches_tally() {
    let mut store = SqliteStore::new(":memory:").unwrap();
    let claim = sample_claim("The Great Wall is visible from space", ClaimStatus::False, 0.8, 42)
        .with_explanation("Astronauts report it is not visible to the naked eye.");
    let id = store.create_claim(claim.clone()).unwrap();

    vote(&store, id, VoteType::Down, None).unwrap();

    let stored = store.get_claim(id).unwrap().unwrap();
    assert_eq!(stored.status, claim.status);
    assert_eq!(stored.content, claim.content);
    assert_eq!(stored.explanation, claim.explanation);
    assert_eq!(stored.updated_at, claim.updated_at);
    assert_eq!(stored.downvotes, 1);
}

#[test]
fn test_vote_on_missing_claim_is_not_found() {
    let mut store = SqliteStore::new(":memory:").unwrap();
    let existing = sample_claim("Existing claim text", ClaimStatus::Verified, 0.6, 1);
    let existing_id = store.create_claim(existing.clone()).unwrap();

    let missing = ClaimId::new();
    let result = vote(&store, missing, VoteType::Up, None);

    assert!(matches!(result, Err(TransactionError::NotFound(id)) if id == missing));
    assert_eq!(store.count_claims().unwrap(), 1);
    assert_eq!(store.get_claim(existing_id).unwrap().unwrap(), existing);
}

#[test]
fn test_interleaved_transactions_both_land() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("claims.db");

    let mut store_a = SqliteStore::new(&path).unwrap();
    let store_b = SqliteStore::new(&path).unwrap();

    let claim = sample_claim("Shared claim for racing viewers", ClaimStatus::Verified, 0.5, 1);
    let id = store_a.create_claim(claim).unwrap();

    // Viewer B commits between viewer A's read and A's write.
    let mut calls = 0;
    let outcome = store_a
        .run_transaction(id, |claim| {
            calls += 1;
            if calls == 1 {
                vote(&store_b, id, VoteType::Up, None).unwrap();
            }
            let outcome = claim.tally().apply(VoteType::Up, None);
            (outcome.tally, outcome)
        })
        .unwrap();

    assert_eq!(calls, 2, "stale first attempt should be re-run");
    assert_eq!(outcome.tally.upvotes, 2);

    let stored = store_a.get_claim(id).unwrap().unwrap();
    assert_eq!(stored.upvotes, 2);
    assert!(approx(stored.confidence_score, 0.52));
}

#[test]
fn test_exhausted_attempts_leave_record_unchanged() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("claims.db");

    let mut store_a = SqliteStore::new(&path).unwrap().with_max_attempts(1);
    let store_b = SqliteStore::new(&path).unwrap();

    let claim = sample_claim("Claim that loses its race", ClaimStatus::False, 0.6, 1);
    let id = store_a.create_claim(claim).unwrap();

    let result = store_a.run_transaction(id, |claim| {
        vote(&store_b, id, VoteType::Down, None).unwrap();
        let outcome = claim.tally().apply(VoteType::Up, None);
        (outcome.tally, outcome)
    });

    assert!(matches!(
        result,
        Err(TransactionError::Conflict { attempts: 1, .. })
    ));

    // Only viewer B's vote is visible.
    let stored = store_a.get_claim(id).unwrap().unwrap();
    assert_eq!((stored.upvotes, stored.downvotes), (0, 1));
    assert!(approx(stored.confidence_score, 0.59));
}

#[test]
fn test_claim_deleted_mid_transaction_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("claims.db");

    let mut store = SqliteStore::new(&path).unwrap();
    let other = rusqlite::Connection::open(&path).unwrap();

    let claim = sample_claim("Claim that disappears", ClaimStatus::Inconclusive, 0.5, 1);
    let id = store.create_claim(claim).unwrap();

    let result = store.run_transaction(id, |claim| {
        other.execute("DELETE FROM claims", []).unwrap();
        let outcome = claim.tally().apply(VoteType::Up, None);
        (outcome.tally, outcome)
    });

    assert!(matches!(result, Err(TransactionError::NotFound(_))));
    assert_eq!(store.count_claims().unwrap(), 0);
}

#[test]
fn test_concurrent_viewers_on_separate_threads() {
    const VOTES_PER_THREAD: u32 = 25;

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("claims.db");

    let id = {
        let mut store = SqliteStore::new(&path).unwrap();
        let claim = sample_claim("Claim under heavy voting", ClaimStatus::Verified, 0.5, 1);
        store.create_claim(claim).unwrap()
    };

    let barrier = Arc::new(Barrier::new(2));
    let handles: Vec<_> = [VoteType::Up, VoteType::Down]
        .into_iter()
        .map(|direction| {
            let path = path.clone();
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                let store = SqliteStore::new(&path).unwrap().with_max_attempts(1_000);
                barrier.wait();
                for _ in 0..VOTES_PER_THREAD {
                    // Each iteration is a distinct viewer with no prior vote.
                    vote(&store, id, direction, None).unwrap();
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    let store = SqliteStore::new(&path).unwrap();
    let stored = store.get_claim(id).unwrap().unwrap();
    assert_eq!(stored.upvotes, VOTES_PER_THREAD);
    assert_eq!(stored.downvotes, VOTES_PER_THREAD);
    assert!(approx(stored.confidence_score, 0.5));
}

#[test]
fn test_claims_persist_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("claims.db");

    let id = {
        let mut store = SqliteStore::new(&path).unwrap();
        let id = store
            .create_claim(sample_claim("Persistent claim", ClaimStatus::False, 0.75, 7))
            .unwrap();
        vote(&store, id, VoteType::Up, None).unwrap();
        id
    };

    let store = SqliteStore::new(&path).unwrap();
    let stored = store.get_claim(id).unwrap().unwrap();
    assert_eq!(stored.upvotes, 1);
    assert!(approx(stored.confidence_score, 0.76));
}
