//! LocalTruth Storage Layer
//!
//! Implements the ClaimStore trait on SQLite.
//!
//! # Transactions
//!
//! Vote updates are optimistic: the claim is read together with its
//! `revision`, the caller computes the new tally, and the write only lands if
//! the revision is still the one that was read. A lost race re-reads and
//! re-runs the update, up to `max_attempts` times. Several processes (or
//! several `SqliteStore`s in one process) can therefore vote on the same
//! database file without losing updates.
//!
//! # Examples
//!
//! ```no_run
//! use localtruth_store::SqliteStore;
//!
//! let store = SqliteStore::new(":memory:").unwrap();
//! // Store is now ready for claim operations
//! ```

#![warn(missing_docs)]

use localtruth_domain::traits::{ClaimQuery, ClaimStore, TransactionError};
use localtruth_domain::{Claim, ClaimId, ClaimStatus, VoteTally};
use rusqlite::{params, Connection, ErrorCode, OptionalExtension, Row};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

/// Default number of optimistic attempts per transaction
pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;

/// Default time a connection waits on a locked database before failing
pub const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_secs(5);

const CLAIM_COLUMNS: &str = "id, content, source, language, status, confidence_score, \
     upvotes, downvotes, explanation, detected_at, updated_at, revision";

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Claim not found
    #[error("Claim not found: {0}")]
    NotFound(String),

    /// Invalid data format
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// A claim with the same id already exists
    #[error("Duplicate claim detected")]
    Duplicate,
}

/// SQLite-based implementation of ClaimStore
///
/// # Thread Safety
///
/// SQLite connections are not thread-safe. Each thread should open its own
/// SqliteStore on the same database file; transactions stay correct across
/// connections.
pub struct SqliteStore {
    conn: Connection,
    max_attempts: u32,
}

impl SqliteStore {
    /// Open (or create) a store at the given database path
    ///
    /// Use `:memory:` for an in-memory database (useful for testing).
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use localtruth_store::SqliteStore;
    ///
    /// let store = SqliteStore::new("localtruth.db").unwrap();
    /// ```
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        let mut store = Self {
            conn,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        };
        store.apply_pragmas()?;
        store.initialize_schema()?;
        Ok(store)
    }

    /// Set the number of optimistic attempts per transaction (minimum 1)
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    /// Set how long a connection waits on a locked database
    pub fn with_busy_timeout(self, timeout: Duration) -> Result<Self, StoreError> {
        self.conn.busy_timeout(timeout)?;
        Ok(self)
    }

    /// Number of optimistic attempts per transaction
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Apply connection pragmas
    ///
    /// WAL lets readers proceed while another connection writes. In-memory
    /// databases report "memory" and keep their own journal.
    fn apply_pragmas(&mut self) -> Result<(), StoreError> {
        self.conn.busy_timeout(DEFAULT_BUSY_TIMEOUT)?;
        let mode: String = self
            .conn
            .pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))?;
        debug!(journal_mode = %mode, "sqlite connection opened");
        self.conn.pragma_update(None, "synchronous", "NORMAL")?;
        Ok(())
    }

    /// Initialize the database schema
    fn initialize_schema(&mut self) -> Result<(), StoreError> {
        let schema = include_str!("schema.sql");
        self.conn.execute_batch(schema)?;
        Ok(())
    }

    /// Convert ClaimId to bytes for storage
    fn claim_id_to_bytes(id: ClaimId) -> Vec<u8> {
        id.value().to_be_bytes().to_vec()
    }

    /// Convert bytes to ClaimId
    fn bytes_to_claim_id(bytes: &[u8]) -> Result<ClaimId, StoreError> {
        if bytes.len() != 16 {
            return Err(StoreError::InvalidData(format!(
                "Expected 16 bytes for ClaimId, got {}",
                bytes.len()
            )));
        }
        let mut arr = [0u8; 16];
        arr.copy_from_slice(bytes);
        Ok(ClaimId::from_value(u128::from_be_bytes(arr)))
    }

    /// Map a row selected with `CLAIM_COLUMNS` to a claim and its revision
    fn row_to_claim(row: &Row<'_>) -> rusqlite::Result<(Claim, i64)> {
        let id_bytes: Vec<u8> = row.get(0)?;
        let id = Self::bytes_to_claim_id(&id_bytes).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Blob, Box::new(e))
        })?;

        let status_str: String = row.get(4)?;
        let status = ClaimStatus::parse(&status_str).ok_or_else(|| {
            rusqlite::Error::FromSqlConversionFailure(
                4,
                rusqlite::types::Type::Text,
                Box::new(StoreError::InvalidData(format!(
                    "Unknown claim status: {}",
                    status_str
                ))),
            )
        })?;

        let claim = Claim {
            id,
            content: row.get(1)?,
            source: row.get(2)?,
            language: row.get(3)?,
            status,
            confidence_score: row.get(5)?,
            upvotes: row.get(6)?,
            downvotes: row.get(7)?,
            explanation: row.get(8)?,
            detected_at: row.get::<_, i64>(9)? as u64,
            updated_at: row.get::<_, i64>(10)? as u64,
        };

        Ok((claim, row.get(11)?))
    }

    /// Read a claim together with its current revision
    fn read_versioned(&self, id: ClaimId) -> Result<Option<(Claim, i64)>, StoreError> {
        let id_bytes = Self::claim_id_to_bytes(id);
        let sql = format!("SELECT {} FROM claims WHERE id = ?1", CLAIM_COLUMNS);

        let found = self
            .conn
            .query_row(&sql, params![&id_bytes], Self::row_to_claim)
            .optional()?;

        Ok(found)
    }

    /// Write a tally if the claim is still at `revision`
    ///
    /// Returns false when another writer got there first (or the claim is gone).
    fn write_tally_if_unchanged(
        &self,
        id: ClaimId,
        revision: i64,
        tally: &VoteTally,
    ) -> Result<bool, rusqlite::Error> {
        let id_bytes = Self::claim_id_to_bytes(id);
        let written = self.conn.execute(
            "UPDATE claims
             SET upvotes = ?1, downvotes = ?2, confidence_score = ?3, revision = revision + 1
             WHERE id = ?4 AND revision = ?5",
            params![
                tally.upvotes,
                tally.downvotes,
                tally.confidence_score,
                &id_bytes,
                revision,
            ],
        )?;
        Ok(written == 1)
    }
}

/// Whether SQLite gave up waiting on another connection's lock
fn is_busy(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _)
            if e.code == ErrorCode::DatabaseBusy || e.code == ErrorCode::DatabaseLocked
    )
}

impl ClaimStore for SqliteStore {
    type Error = StoreError;

    fn create_claim(&mut self, claim: Claim) -> Result<ClaimId, Self::Error> {
        let id_bytes = Self::claim_id_to_bytes(claim.id);

        let exists: bool = self
            .conn
            .query_row("SELECT 1 FROM claims WHERE id = ?1", params![&id_bytes], |_| {
                Ok(true)
            })
            .optional()?
            .unwrap_or(false);

        if exists {
            return Err(StoreError::Duplicate);
        }

        self.conn.execute(
            "INSERT INTO claims (id, content, source, language, status, confidence_score,
                                 upvotes, downvotes, explanation, detected_at, updated_at, revision)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, 0)",
            params![
                &id_bytes,
                &claim.content,
                &claim.source,
                &claim.language,
                claim.status.as_str(),
                claim.confidence_score,
                claim.upvotes,
                claim.downvotes,
                &claim.explanation,
                claim.detected_at as i64,
                claim.updated_at as i64,
            ],
        )?;

        debug!(claim_id = %claim.id, status = %claim.status, "claim created");
        Ok(claim.id)
    }

    fn get_claim(&self, id: ClaimId) -> Result<Option<Claim>, Self::Error> {
        Ok(self.read_versioned(id)?.map(|(claim, _)| claim))
    }

    fn query_claims(&self, query: &ClaimQuery) -> Result<Vec<Claim>, Self::Error> {
        let mut sql = format!("SELECT {} FROM claims WHERE 1=1", CLAIM_COLUMNS);
        let mut params: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(status) = query.status {
            sql.push_str(" AND status = ?");
            params.push(Box::new(status.as_str()));
        }

        if let Some(min_conf) = query.min_confidence {
            sql.push_str(" AND confidence_score >= ?");
            params.push(Box::new(min_conf));
        }

        sql.push_str(" ORDER BY detected_at DESC, id DESC");

        if let Some(limit) = query.limit {
            sql.push_str(" LIMIT ?");
            params.push(Box::new(limit as i64));
        }

        let mut stmt = self.conn.prepare(&sql)?;
        let param_refs: Vec<&dyn rusqlite::ToSql> = params.iter().map(|p| p.as_ref()).collect();

        let claims = stmt
            .query_map(&param_refs[..], |row| Self::row_to_claim(row).map(|(claim, _)| claim))?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(claims)
    }

    fn count_claims(&self) -> Result<u64, Self::Error> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM claims", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    fn run_transaction<T, F>(
        &self,
        id: ClaimId,
        mut update: F,
    ) -> Result<T, TransactionError<Self::Error>>
    where
        F: FnMut(&Claim) -> (VoteTally, T),
    {
        for attempt in 1..=self.max_attempts {
            let (claim, revision) = match self.read_versioned(id) {
                Ok(Some(found)) => found,
                Ok(None) => return Err(TransactionError::NotFound(id)),
                Err(StoreError::Database(e)) if is_busy(&e) => {
                    debug!(claim_id = %id, attempt, "database busy on read, retrying");
                    continue;
                }
                Err(e) => return Err(TransactionError::Store(e)),
            };

            let (tally, output) = update(&claim);

            match self.write_tally_if_unchanged(id, revision, &tally) {
                Ok(true) => {
                    debug!(claim_id = %id, attempt, revision = revision + 1, "transaction committed");
                    return Ok(output);
                }
                Ok(false) => {
                    debug!(claim_id = %id, attempt, "stale read, retrying transaction");
                }
                Err(e) if is_busy(&e) => {
                    debug!(claim_id = %id, attempt, "database busy on write, retrying");
                }
                Err(e) => return Err(TransactionError::Store(e.into())),
            }
        }

        // The last miss may have been a deletion rather than a race.
        match self.read_versioned(id) {
            Ok(None) => Err(TransactionError::NotFound(id)),
            _ => {
                warn!(claim_id = %id, attempts = self.max_attempts, "transaction gave up after repeated conflicts");
                Err(TransactionError::Conflict {
                    claim_id: id,
                    attempts: self.max_attempts,
                })
            }
        }
    }
}
