//! Detection pipeline: validate, search, classify, explain

use crate::config::VerifierConfig;
use crate::error::VerifierError;
use crate::parser::parse_classification;
use crate::prompt::{clean_search_query, explanation_prompt, search_query_prompt, ClassificationPrompt};
use localtruth_domain::traits::{ClaimStore, LlmProvider, SearchProvider, SearchResult};
use localtruth_domain::{Claim, Classification};
use std::fmt::Display;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, info, warn};

/// Outcome of checking one text
///
/// `claim` is ready to store but has not been written anywhere yet.
#[derive(Debug, Clone)]
pub struct Detection {
    /// Claim built from the verdict
    pub claim: Claim,
    /// Raw classifier answer, including its reason
    pub classification: Classification,
    /// Search results the classifier saw
    pub evidence: Vec<SearchResult>,
}

/// Checks submitted text for misinformation
pub struct Detector<P, S> {
    llm: P,
    search: S,
    config: VerifierConfig,
}

impl<P, S> Detector<P, S>
where
    P: LlmProvider + Sync,
    S: SearchProvider + Sync,
    P::Error: Display,
    S::Error: Display,
{
    /// Create a detector, rejecting an invalid configuration
    pub fn new(llm: P, search: S, config: VerifierConfig) -> Result<Self, VerifierError> {
        config.validate().map_err(VerifierError::Config)?;
        Ok(Self { llm, search, config })
    }

    /// Active configuration
    pub fn config(&self) -> &VerifierConfig {
        &self.config
    }

    /// Run the full pipeline on `text`
    ///
    /// Search and explanation failures degrade the result; only validation
    /// and classification failures are errors.
    pub async fn detect(&self, text: &str, source: Option<&str>) -> Result<Detection, VerifierError> {
        let text = self.validate(text)?;

        info!(length = text.chars().count(), "checking text");

        let evidence = self.gather_evidence(text).await;
        let classification = self.classify(text, &evidence).await?;
        let verdict = classification.verdict(self.config.inconclusive_threshold);

        let source = source
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(self.config.default_source.as_str());

        let mut claim = Claim::new(text, verdict.status, verdict.confidence_score, unix_now())
            .with_source(source)
            .with_language(self.config.language.clone());

        if let Some(explanation) = self.explain(&claim).await {
            claim = claim.with_explanation(explanation);
        }

        info!(
            claim_id = %claim.id,
            status = %claim.status,
            confidence = claim.confidence_score,
            evidence = evidence.len(),
            "detection completed"
        );

        Ok(Detection {
            claim,
            classification,
            evidence,
        })
    }

    /// Trim `text` and enforce the configured length bounds
    pub fn validate<'t>(&self, text: &'t str) -> Result<&'t str, VerifierError> {
        let text = text.trim();
        let length = text.chars().count();

        if length < self.config.min_text_length {
            return Err(VerifierError::TooShort(length, self.config.min_text_length));
        }
        if length > self.config.max_text_length {
            return Err(VerifierError::TooLong(length, self.config.max_text_length));
        }
        Ok(text)
    }

    /// Search the web for material about `text`
    ///
    /// Never fails: any error yields no evidence.
    pub async fn gather_evidence(&self, text: &str) -> Vec<SearchResult> {
        if !self.config.search_enabled {
            return Vec::new();
        }

        let query = match self.llm.generate(&search_query_prompt(text)).await {
            Ok(response) => clean_search_query(&response, text),
            Err(e) => {
                warn!(error = %e, "search query generation failed, using text prefix");
                clean_search_query("", text)
            }
        };

        debug!(%query, "searching");

        match self.search.search(&query).await {
            Ok(mut results) => {
                results.truncate(self.config.search_results_limit);
                results
            }
            Err(e) => {
                warn!(error = %e, "web search failed, classifying without evidence");
                Vec::new()
            }
        }
    }

    /// Ask the model whether `text` is misinformation
    pub async fn classify(
        &self,
        text: &str,
        evidence: &[SearchResult],
    ) -> Result<Classification, VerifierError> {
        let prompt = ClassificationPrompt::new(text).with_evidence(evidence).build();
        debug!(prompt_len = prompt.len(), "classifying");

        let response = self
            .llm
            .generate_json(&prompt)
            .await
            .map_err(|e| VerifierError::Llm(e.to_string()))?;

        parse_classification(&response)
    }

    /// Ask the model to explain `claim`'s verdict
    ///
    /// Returns `None` when explanations are disabled or the call fails.
    pub async fn explain(&self, claim: &Claim) -> Option<String> {
        if !self.config.explain {
            return None;
        }

        match self.llm.generate(&explanation_prompt(claim)).await {
            Ok(text) if !text.trim().is_empty() => Some(text.trim().to_string()),
            Ok(_) => {
                warn!(claim_id = %claim.id, "model returned an empty explanation");
                None
            }
            Err(e) => {
                warn!(claim_id = %claim.id, error = %e, "explanation failed, storing claim without one");
                None
            }
        }
    }
}

/// Persist a detected claim
pub fn record<St>(store: &mut St, detection: &Detection) -> Result<Claim, VerifierError>
where
    St: ClaimStore,
    St::Error: Display,
{
    let id = store
        .create_claim(detection.claim.clone())
        .map_err(|e| VerifierError::Store(e.to_string()))?;

    info!(claim_id = %id, status = %detection.claim.status, "claim recorded");
    Ok(detection.claim.clone())
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}
