//! LocalTruth Server
//!
//! HTTP API for submitting texts for a misinformation check, browsing the
//! recorded claims and voting on them.

#![warn(missing_docs)]

pub mod config;
pub mod handlers;

use config::ServerConfig;
use handlers::{create_router, AppState};
use localtruth_llm::{GoogleSearch, LlmError, OllamaProvider, SearchError};
use localtruth_store::{SqliteStore, StoreError};
use localtruth_verifier::{Detector, VerifierError};
use std::time::Duration;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Server error
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Server binding error
    #[error("Failed to bind server: {0}")]
    Bind(#[from] std::io::Error),

    /// Claim store could not be opened
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// LLM client could not be built
    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    /// Search client could not be built
    #[error("Search error: {0}")]
    Search(#[from] SearchError),

    /// Detection pipeline could not be built
    #[error("Verifier error: {0}")]
    Verifier(#[from] VerifierError),

    /// Server error
    #[error("Server error: {0}")]
    Server(String),
}

/// Install the global tracing subscriber
///
/// Honors `RUST_LOG`, defaulting to `info`. Safe to call more than once.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// Build the search client from config, falling back to the environment
fn build_search(config: &ServerConfig) -> Result<GoogleSearch, SearchError> {
    match (&config.search.api_key, &config.search.cx) {
        (Some(key), Some(cx)) => GoogleSearch::new(key.clone(), cx.clone()),
        _ => GoogleSearch::from_env(),
    }
}

/// Build the application state described by `config`
pub fn build_state(config: &ServerConfig) -> Result<AppState<OllamaProvider, GoogleSearch>, ServerError> {
    let llm = OllamaProvider::with_timeout(
        config.llm.endpoint.clone(),
        config.llm.model.clone(),
        Duration::from_secs(config.llm.timeout_secs),
    )?
    .with_max_retries(config.llm.max_retries);

    let search = build_search(config)?;
    if config.verifier.search_enabled && !search.is_configured() {
        info!("No search credentials configured, classifying without web evidence");
    }

    let detector = Detector::new(llm, search, config.verifier.clone())?;
    let store = SqliteStore::new(&config.database_path)?;

    Ok(AppState::new(detector, store))
}

/// Start the HTTP server
///
/// Opens the store, builds the detection pipeline and serves the API.
pub async fn start_server(config: ServerConfig) -> Result<(), ServerError> {
    init_tracing();

    config.validate()?;

    info!("Starting LocalTruth server");
    info!("Bind address: {}", config.bind_addr());
    info!("Database: {}", config.database_path);
    info!("Model: {} at {}", config.llm.model, config.llm.endpoint);

    let state = build_state(&config)?;
    let app = create_router(state);

    let listener = TcpListener::bind(&config.bind_addr()).await?;
    info!("Server listening on {}", config.bind_addr());

    axum::serve(listener, app)
        .await
        .map_err(|e| ServerError::Server(e.to_string()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_state_from_test_config() {
        let config = ServerConfig::default_test_config();
        let state = build_state(&config).unwrap();
        assert_eq!(state.detector.config().min_text_length, 20);
    }

    #[test]
    fn test_search_credentials_from_config() {
        let mut config = ServerConfig::default_test_config();
        config.search.api_key = Some("key".to_string());
        config.search.cx = Some("cx".to_string());
        assert!(build_search(&config).unwrap().is_configured());
    }
}
