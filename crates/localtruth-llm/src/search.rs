//! Web search providers
//!
//! Classification is grounded in search results when a search provider is
//! configured. `GoogleSearch` wraps the Custom Search JSON API; without
//! credentials it returns no results rather than failing, so detection still
//! works on the model's own knowledge.

use localtruth_domain::traits::{SearchProvider, SearchResult};
use serde::Deserialize;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

/// Custom Search JSON API endpoint
pub const GOOGLE_SEARCH_ENDPOINT: &str = "https://www.googleapis.com/customsearch/v1";

/// Environment variable holding the API key
pub const API_KEY_ENV: &str = "GOOGLE_SEARCH_API_KEY";

/// Environment variable holding the search engine id
pub const ENGINE_ID_ENV: &str = "GOOGLE_CX";

/// Errors that can occur during search
#[derive(Error, Debug)]
pub enum SearchError {
    /// Network or API communication error
    #[error("Search request failed: {0}")]
    Communication(String),

    /// The API answered with a non-success status
    #[error("Search API returned HTTP {status}: {body}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Response body
        body: String,
    },

    /// The response body was not the expected JSON
    #[error("Invalid search response: {0}")]
    InvalidResponse(String),
}

/// Google Custom Search client
#[derive(Debug, Clone)]
pub struct GoogleSearch {
    endpoint: String,
    credentials: Option<(String, String)>,
    client: reqwest::Client,
}

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Deserialize)]
struct SearchItem {
    #[serde(default)]
    title: String,
    #[serde(default)]
    link: String,
    #[serde(default)]
    snippet: String,
}

impl GoogleSearch {
    /// Create a client with an API key and search engine id
    pub fn new(api_key: impl Into<String>, engine_id: impl Into<String>) -> Result<Self, SearchError> {
        Self::build(Some((api_key.into(), engine_id.into())))
    }

    /// Create a client from `GOOGLE_SEARCH_API_KEY` and `GOOGLE_CX`
    ///
    /// Missing variables produce an unconfigured client.
    pub fn from_env() -> Result<Self, SearchError> {
        let credentials = match (std::env::var(API_KEY_ENV), std::env::var(ENGINE_ID_ENV)) {
            (Ok(key), Ok(cx)) if !key.is_empty() && !cx.is_empty() => Some((key, cx)),
            _ => None,
        };
        Self::build(credentials)
    }

    /// Create a client that never searches
    pub fn unconfigured() -> Result<Self, SearchError> {
        Self::build(None)
    }

    /// Point the client at a different endpoint (for proxies and tests)
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Whether credentials are present
    pub fn is_configured(&self) -> bool {
        self.credentials.is_some()
    }

    fn build(credentials: Option<(String, String)>) -> Result<Self, SearchError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(15))
            .build()
            .map_err(|e| SearchError::Communication(e.to_string()))?;

        Ok(Self {
            endpoint: GOOGLE_SEARCH_ENDPOINT.to_string(),
            credentials,
            client,
        })
    }
}

impl SearchProvider for GoogleSearch {
    type Error = SearchError;

    async fn search(&self, query: &str) -> Result<Vec<SearchResult>, Self::Error> {
        let Some((api_key, engine_id)) = &self.credentials else {
            warn!("search API key or engine id not configured, skipping web search");
            return Ok(Vec::new());
        };

        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("key", api_key.as_str()), ("cx", engine_id.as_str()), ("q", query)])
            .send()
            .await
            .map_err(|e| SearchError::Communication(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SearchError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: SearchResponse = response
            .json()
            .await
            .map_err(|e| SearchError::InvalidResponse(e.to_string()))?;

        debug!(query, results = parsed.items.len(), "web search completed");

        Ok(parsed
            .items
            .into_iter()
            .map(|item| SearchResult {
                title: item.title,
                link: item.link,
                snippet: item.snippet,
            })
            .collect())
    }
}

/// Search provider returning canned results
///
/// Records every query it receives.
#[derive(Debug, Clone, Default)]
pub struct MockSearch {
    results: Vec<SearchResult>,
    fail: bool,
    queries: Arc<Mutex<Vec<String>>>,
}

impl MockSearch {
    /// Return `results` for every query
    pub fn new(results: Vec<SearchResult>) -> Self {
        Self {
            results,
            ..Self::default()
        }
    }

    /// Fail every query
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    /// Queries received so far
    pub fn queries(&self) -> Vec<String> {
        self.queries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl SearchProvider for MockSearch {
    type Error = SearchError;

    async fn search(&self, query: &str) -> Result<Vec<SearchResult>, Self::Error> {
        self.queries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(query.to_string());

        if self.fail {
            return Err(SearchError::Communication("Mock search failure".to_string()));
        }
        Ok(self.results.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unconfigured_search_returns_nothing() {
        let search = GoogleSearch::unconfigured().unwrap();
        assert!(!search.is_configured());
        assert!(search.search("anything").await.unwrap().is_empty());
    }

    #[test]
    fn test_configured_search() {
        let search = GoogleSearch::new("key", "cx").unwrap();
        assert!(search.is_configured());
        assert_eq!(search.endpoint, GOOGLE_SEARCH_ENDPOINT);
    }

    #[test]
    fn test_response_without_items_parses_empty() {
        let parsed: SearchResponse = serde_json::from_str(r#"{"kind": "customsearch#search"}"#).unwrap();
        assert!(parsed.items.is_empty());
    }

    #[test]
    fn test_response_items_parse() {
        let body = r#"{"items": [{"title": "NASA", "link": "https://nasa.gov", "snippet": "Apollo 11"}]}"#;
        let parsed: SearchResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.items.len(), 1);
        assert_eq!(parsed.items[0].link, "https://nasa.gov");
    }

    #[tokio::test]
    async fn test_mock_search_records_queries() {
        let result = SearchResult {
            title: "t".into(),
            link: "l".into(),
            snippet: "s".into(),
        };
        let search = MockSearch::new(vec![result.clone()]);

        assert_eq!(search.search("first").await.unwrap(), vec![result]);
        assert_eq!(search.queries(), vec!["first"]);
    }

    #[tokio::test]
    async fn test_mock_search_failure() {
        let search = MockSearch::failing();
        assert!(matches!(
            search.search("q").await,
            Err(SearchError::Communication(_))
        ));
    }
}
