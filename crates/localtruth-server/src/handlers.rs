//! HTTP request handlers for the LocalTruth API.
//!
//! Claim submission, listing, lookup, voting and health check using axum.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router as AxumRouter,
};
use localtruth_domain::traits::{ClaimQuery, ClaimStore, LlmProvider, SearchProvider};
use localtruth_domain::{Claim, ClaimId, ClaimStatus, VoteOutcome, VoteType};
use localtruth_store::{SqliteStore, StoreError};
use localtruth_verifier::{apply_vote, record, Detector, VerifierError, VoteError};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::sync::{Arc, Mutex};
use tracing::{error, info};

/// Listing size when the caller gives no `limit`
pub const DEFAULT_LIST_LIMIT: usize = 50;

/// Shared application state
pub struct AppState<P, S> {
    /// Detection pipeline
    pub detector: Arc<Detector<P, S>>,
    /// Claim store, shared by all requests
    pub store: Arc<Mutex<SqliteStore>>,
}

impl<P, S> AppState<P, S> {
    /// Bundle a detector and a store
    pub fn new(detector: Detector<P, S>, store: SqliteStore) -> Self {
        Self {
            detector: Arc::new(detector),
            store: Arc::new(Mutex::new(store)),
        }
    }
}

impl<P, S> Clone for AppState<P, S> {
    fn clone(&self) -> Self {
        Self {
            detector: Arc::clone(&self.detector),
            store: Arc::clone(&self.store),
        }
    }
}

/// Claim submission request
#[derive(Debug, Deserialize)]
pub struct CreateClaimRequest {
    /// Text to check
    pub text: String,
    /// Where the text came from
    #[serde(default)]
    pub source: Option<String>,
}

/// Claim listing filters
#[derive(Debug, Default, Deserialize)]
pub struct ListClaimsQuery {
    /// Only claims with this status
    pub status: Option<String>,
    /// Only claims at or above this confidence
    pub min_confidence: Option<f64>,
    /// Maximum number of claims
    pub limit: Option<usize>,
}

/// Vote request
#[derive(Debug, Deserialize)]
pub struct VoteRequest {
    /// "up" or "down"
    pub vote: String,
    /// The viewer's current vote, if any
    #[serde(default)]
    pub prior: Option<String>,
}

/// A stored claim
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClaimResponse {
    /// Claim id
    pub id: String,
    /// Analyzed text
    pub content: String,
    /// Where the text came from
    pub source: String,
    /// Language of the text
    pub language: String,
    /// Verified, False or Inconclusive
    pub status: String,
    /// Current confidence score
    pub confidence_score: f64,
    /// Agreement count
    pub upvotes: u32,
    /// Disagreement count
    pub downvotes: u32,
    /// Model-written explanation
    pub explanation: Option<String>,
    /// Submission time (Unix seconds)
    pub detected_at: u64,
    /// Verdict time (Unix seconds)
    pub updated_at: u64,
    /// Minutes between submission and verdict
    pub time_to_verify_minutes: Option<u64>,
}

impl From<&Claim> for ClaimResponse {
    fn from(claim: &Claim) -> Self {
        Self {
            id: claim.id.to_string(),
            content: claim.content.clone(),
            source: claim.source.clone(),
            language: claim.language.clone(),
            status: claim.status.to_string(),
            confidence_score: claim.confidence_score,
            upvotes: claim.upvotes,
            downvotes: claim.downvotes,
            explanation: claim.explanation.clone(),
            detected_at: claim.detected_at,
            updated_at: claim.updated_at,
            time_to_verify_minutes: claim.time_to_verify_minutes(),
        }
    }
}

/// Response to a claim submission
#[derive(Debug, Serialize, Deserialize)]
pub struct CreateClaimResponse {
    /// The recorded claim
    pub claim: ClaimResponse,
    /// Classifier's reasoning
    pub reason: String,
    /// Links the classifier was shown
    pub sources: Vec<String>,
}

/// Response to a vote
#[derive(Debug, Serialize, Deserialize)]
pub struct VoteResponse {
    /// Claim voted on
    pub claim_id: String,
    /// Agreement count after the vote
    pub upvotes: u32,
    /// Disagreement count after the vote
    pub downvotes: u32,
    /// Confidence score after the vote
    pub confidence_score: f64,
    /// The viewer's vote after this operation
    pub viewer_vote: Option<String>,
}

impl VoteResponse {
    fn new(claim_id: ClaimId, outcome: VoteOutcome) -> Self {
        Self {
            claim_id: claim_id.to_string(),
            upvotes: outcome.tally.upvotes,
            downvotes: outcome.tally.downvotes,
            confidence_score: outcome.tally.confidence_score,
            viewer_vote: outcome.viewer_vote.map(|v| v.as_str().to_string()),
        }
    }
}

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthCheckResponse {
    /// Overall health status
    pub status: String,
    /// Number of stored claims
    pub claims: u64,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}

/// Application error type
#[derive(Debug)]
pub enum AppError {
    /// The request itself is unusable
    BadRequest(String),
    /// The claim does not exist
    NotFound(String),
    /// The store rejected a vote transaction
    Conflict(String),
    /// The classifier failed or answered nonsense
    Upstream(String),
    /// Internal server error
    InternalError(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            AppError::Upstream(msg) => (StatusCode::BAD_GATEWAY, msg),
            AppError::InternalError(msg) => {
                error!(error = %msg, "internal error");
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
        };

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}

impl From<VerifierError> for AppError {
    fn from(e: VerifierError) -> Self {
        match e {
            VerifierError::TooShort(..) | VerifierError::TooLong(..) => {
                AppError::BadRequest(e.to_string())
            }
            VerifierError::Llm(_) | VerifierError::InvalidResponse(_) => {
                AppError::Upstream(e.to_string())
            }
            VerifierError::Store(_) | VerifierError::Config(_) => {
                AppError::InternalError(e.to_string())
            }
        }
    }
}

impl From<VoteError> for AppError {
    fn from(e: VoteError) -> Self {
        match e {
            VoteError::NotFound(_) => AppError::NotFound(e.to_string()),
            VoteError::Rejected { .. } => AppError::Conflict(e.to_string()),
        }
    }
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        AppError::InternalError(e.to_string())
    }
}

/// Run blocking store work off the async executor
async fn with_store<T, F>(store: &Arc<Mutex<SqliteStore>>, work: F) -> Result<T, AppError>
where
    F: FnOnce(&mut SqliteStore) -> Result<T, AppError> + Send + 'static,
    T: Send + 'static,
{
    let store = Arc::clone(store);
    tokio::task::spawn_blocking(move || {
        let mut guard = store
            .lock()
            .map_err(|_| AppError::InternalError("store lock poisoned".to_string()))?;
        work(&mut guard)
    })
    .await
    .map_err(|e| AppError::InternalError(e.to_string()))?
}

fn parse_claim_id(raw: &str) -> Result<ClaimId, AppError> {
    ClaimId::from_string(raw).map_err(|e| AppError::BadRequest(format!("Invalid claim id: {}", e)))
}

fn parse_vote(raw: &str, field: &str) -> Result<VoteType, AppError> {
    VoteType::parse(raw)
        .ok_or_else(|| AppError::BadRequest(format!("Invalid {}: '{}' (expected up or down)", field, raw)))
}

/// POST /claims - Check a text and record the claim
async fn create_claim<P, S>(
    State(state): State<AppState<P, S>>,
    Json(request): Json<CreateClaimRequest>,
) -> Result<(StatusCode, Json<CreateClaimResponse>), AppError>
where
    P: LlmProvider + Send + Sync + 'static,
    P::Error: Display + Send,
    S: SearchProvider + Send + Sync + 'static,
    S::Error: Display + Send,
{
    let detection = state
        .detector
        .detect(&request.text, request.source.as_deref())
        .await?;

    let reason = detection.classification.reason.clone();
    let sources = detection.evidence.iter().map(|r| r.link.clone()).collect();

    let claim = with_store(&state.store, move |store| Ok(record(store, &detection)?)).await?;

    info!(claim_id = %claim.id, status = %claim.status, "claim created");

    Ok((
        StatusCode::CREATED,
        Json(CreateClaimResponse {
            claim: ClaimResponse::from(&claim),
            reason,
            sources,
        }),
    ))
}

/// GET /claims - List claims, newest first
async fn list_claims<P, S>(
    State(state): State<AppState<P, S>>,
    Query(params): Query<ListClaimsQuery>,
) -> Result<Json<Vec<ClaimResponse>>, AppError>
where
    P: Send + Sync + 'static,
    S: Send + Sync + 'static,
{
    let status = params
        .status
        .as_deref()
        .map(|s| {
            ClaimStatus::parse(s).ok_or_else(|| AppError::BadRequest(format!("Invalid status: '{}'", s)))
        })
        .transpose()?;

    let query = ClaimQuery {
        status,
        min_confidence: params.min_confidence,
        limit: Some(params.limit.unwrap_or(DEFAULT_LIST_LIMIT)),
    };

    let claims = with_store(&state.store, move |store| Ok(store.query_claims(&query)?)).await?;

    Ok(Json(claims.iter().map(ClaimResponse::from).collect()))
}

/// GET /claims/:id - Fetch one claim
async fn get_claim<P, S>(
    State(state): State<AppState<P, S>>,
    Path(raw_id): Path<String>,
) -> Result<Json<ClaimResponse>, AppError>
where
    P: Send + Sync + 'static,
    S: Send + Sync + 'static,
{
    let id = parse_claim_id(&raw_id)?;

    let claim = with_store(&state.store, move |store| Ok(store.get_claim(id)?)).await?;

    claim
        .map(|c| Json(ClaimResponse::from(&c)))
        .ok_or_else(|| AppError::NotFound(format!("Claim not found: {}", id)))
}

/// POST /claims/:id/vote - Apply one viewer vote
async fn vote_claim<P, S>(
    State(state): State<AppState<P, S>>,
    Path(raw_id): Path<String>,
    Json(request): Json<VoteRequest>,
) -> Result<Json<VoteResponse>, AppError>
where
    P: Send + Sync + 'static,
    S: Send + Sync + 'static,
{
    let id = parse_claim_id(&raw_id)?;
    let vote = parse_vote(&request.vote, "vote")?;
    let prior = request
        .prior
        .as_deref()
        .map(|p| parse_vote(p, "prior"))
        .transpose()?;

    let outcome = with_store(&state.store, move |store| Ok(apply_vote(&*store, id, vote, prior)?)).await?;

    Ok(Json(VoteResponse::new(id, outcome)))
}

/// GET /health - Liveness plus claim count
async fn health_check<P, S>(
    State(state): State<AppState<P, S>>,
) -> Result<Json<HealthCheckResponse>, AppError>
where
    P: Send + Sync + 'static,
    S: Send + Sync + 'static,
{
    let claims = with_store(&state.store, |store| Ok(store.count_claims()?)).await?;

    Ok(Json(HealthCheckResponse {
        status: "healthy".to_string(),
        claims,
    }))
}

/// Create the axum router with all routes
pub fn create_router<P, S>(state: AppState<P, S>) -> AxumRouter
where
    P: LlmProvider + Send + Sync + 'static,
    P::Error: Display + Send,
    S: SearchProvider + Send + Sync + 'static,
    S::Error: Display + Send,
{
    AxumRouter::new()
        .route("/claims", post(create_claim::<P, S>).get(list_claims::<P, S>))
        .route("/claims/:id", get(get_claim::<P, S>))
        .route("/claims/:id/vote", post(vote_claim::<P, S>))
        .route("/health", get(health_check::<P, S>))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use localtruth_llm::{MockProvider, MockSearch};
    use localtruth_verifier::VerifierConfig;
    use tower::ServiceExt; // for oneshot

    fn create_test_state() -> AppState<MockProvider, MockSearch> {
        let mut llm = MockProvider::new("Explanation");
        llm.add_response(
            "isMisinformation",
            r#"{"isMisinformation": true, "confidenceScore": 0.8, "reason": "r"}"#,
        );
        let detector = Detector::new(llm, MockSearch::default(), VerifierConfig::default()).unwrap();
        AppState::new(detector, SqliteStore::new(":memory:").unwrap())
    }

    #[tokio::test]
    async fn test_health_check() {
        let app = create_router(create_test_state());

        let request = Request::builder()
            .uri("/health")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_create_claim() {
        let app = create_router(create_test_state());

        let request = Request::builder()
            .method("POST")
            .uri("/claims")
            .header("content-type", "application/json")
            .body(Body::from(r#"{"text": "Vaccines contain tracking microchips."}"#))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    #[tokio::test]
    async fn test_malformed_id_is_bad_request() {
        let app = create_router(create_test_state());

        let request = Request::builder()
            .uri("/claims/not-a-uuid")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_error_status_mapping() {
        let cases = [
            (AppError::from(VerifierError::TooShort(3, 20)), StatusCode::BAD_REQUEST),
            (AppError::from(VerifierError::Llm("down".into())), StatusCode::BAD_GATEWAY),
            (AppError::from(VoteError::NotFound(ClaimId::new())), StatusCode::NOT_FOUND),
            (
                AppError::from(VoteError::Rejected {
                    claim_id: ClaimId::new(),
                    reason: "conflict".into(),
                }),
                StatusCode::CONFLICT,
            ),
        ];

        for (error, expected) in cases {
            assert_eq!(error.into_response().status(), expected);
        }
    }
}
