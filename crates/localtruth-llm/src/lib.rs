//! LocalTruth LLM and Search Provider Layer
//!
//! Implementations of the `LlmProvider` and `SearchProvider` traits from
//! `localtruth-domain`.
//!
//! # Providers
//!
//! - `MockProvider`: Deterministic LLM mock for testing
//! - `OllamaProvider`: Local Ollama API integration
//! - `MockSearch`: Canned search results for testing
//! - `GoogleSearch`: Google Custom Search JSON API
//!
//! # Examples
//!
//! ```
//! use localtruth_llm::MockProvider;
//! use localtruth_domain::traits::LlmProvider;
//!
//! # #[tokio::main]
//! # async fn main() {
//! let provider = MockProvider::new("Hello from LLM!");
//! let result = provider.generate("test prompt").await.unwrap();
//! assert_eq!(result, "Hello from LLM!");
//! # }
//! ```

#![warn(missing_docs)]

pub mod ollama;
pub mod search;

use localtruth_domain::traits::LlmProvider;
use std::sync::{Arc, Mutex};
use thiserror::Error;

pub use ollama::OllamaProvider;
pub use search::{GoogleSearch, MockSearch, SearchError};

/// Errors that can occur during LLM operations
#[derive(Error, Debug)]
pub enum LlmError {
    /// Network or API communication error
    #[error("Communication error: {0}")]
    Communication(String),

    /// Invalid response from LLM
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// Model not available
    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    /// Generic error
    #[error("LLM error: {0}")]
    Other(String),
}

/// Mock LLM provider for deterministic testing
///
/// Returns pre-configured responses without making any network calls.
/// Responses can be keyed on a substring of the prompt, which lets a test
/// answer the search-query, classification and explanation prompts
/// differently.
///
/// # Examples
///
/// ```
/// use localtruth_llm::MockProvider;
/// use localtruth_domain::traits::LlmProvider;
///
/// let rt = tokio::runtime::Runtime::new().unwrap();
///
/// let mut provider = MockProvider::new("fallback");
/// provider.add_response("search query", "moon landing 1969");
/// assert_eq!(
///     rt.block_on(provider.generate("Write a search query for ...")).unwrap(),
///     "moon landing 1969"
/// );
/// assert_eq!(rt.block_on(provider.generate("anything else")).unwrap(), "fallback");
/// ```
#[derive(Debug, Clone)]
pub struct MockProvider {
    default_response: String,
    responses: Arc<Mutex<Vec<(String, String)>>>,
    errors: Arc<Mutex<Vec<String>>>,
    prompts: Arc<Mutex<Vec<String>>>,
}

impl MockProvider {
    /// Create a new MockProvider with a fixed response for all prompts
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            default_response: response.into(),
            responses: Arc::new(Mutex::new(Vec::new())),
            errors: Arc::new(Mutex::new(Vec::new())),
            prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Respond with `response` to any prompt containing `needle`
    ///
    /// Earlier registrations win when several needles match.
    pub fn add_response(&mut self, needle: impl Into<String>, response: impl Into<String>) {
        lock(&self.responses).push((needle.into(), response.into()));
    }

    /// Fail any prompt containing `needle`
    pub fn add_error(&mut self, needle: impl Into<String>) {
        lock(&self.errors).push(needle.into());
    }

    /// Get the number of times the provider was called
    pub fn call_count(&self) -> usize {
        lock(&self.prompts).len()
    }

    /// Prompts received so far, in call order
    pub fn prompts(&self) -> Vec<String> {
        lock(&self.prompts).clone()
    }

    /// Reset the call history
    pub fn reset_call_count(&self) {
        lock(&self.prompts).clear();
    }

    fn respond(&self, prompt: &str) -> Result<String, LlmError> {
        lock(&self.prompts).push(prompt.to_string());

        if lock(&self.errors).iter().any(|needle| prompt.contains(needle.as_str())) {
            return Err(LlmError::Other("Mock error".to_string()));
        }

        let responses = lock(&self.responses);
        let matched = responses
            .iter()
            .find(|(needle, _)| prompt.contains(needle.as_str()))
            .map(|(_, response)| response.clone());

        Ok(matched.unwrap_or_else(|| self.default_response.clone()))
    }
}

/// Lock a mock's shared state, recovering from a poisoned lock
fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new("Default mock response")
    }
}

impl LlmProvider for MockProvider {
    type Error = LlmError;

    async fn generate(&self, prompt: &str) -> Result<String, Self::Error> {
        self.respond(prompt)
    }

    async fn generate_json(&self, prompt: &str) -> Result<String, Self::Error> {
        self.respond(prompt)
    }
}
