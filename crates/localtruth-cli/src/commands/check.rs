//! Check command implementation.

use crate::cli::CheckArgs;
use crate::config::Config;
use crate::error::Result;
use crate::output::Formatter;
use localtruth_domain::traits::{LlmProvider, SearchProvider};
use localtruth_llm::{GoogleSearch, OllamaProvider};
use localtruth_store::SqliteStore;
use localtruth_verifier::{record, Detector, VerifierConfig};
use std::fmt::Display;
use std::time::Duration;

/// Build the detector described by `config`.
pub fn build_detector(config: &Config, offline: bool) -> Result<Detector<OllamaProvider, GoogleSearch>> {
    let llm = OllamaProvider::with_timeout(
        config.llm.endpoint.clone(),
        config.llm.model.clone(),
        Duration::from_secs(config.llm.timeout_secs),
    )?;

    let search = match (&config.search.api_key, &config.search.cx) {
        (Some(key), Some(cx)) => GoogleSearch::new(key.clone(), cx.clone())?,
        _ => GoogleSearch::from_env()?,
    };

    let verifier = if offline {
        VerifierConfig {
            search_enabled: false,
            explain: false,
            ..config.verifier.clone()
        }
    } else {
        config.verifier.clone()
    };

    Ok(Detector::new(llm, search, verifier)?)
}

/// Execute the check command.
pub async fn execute_check<P, S>(
    args: CheckArgs,
    detector: &Detector<P, S>,
    store: &mut SqliteStore,
    formatter: &Formatter,
) -> Result<String>
where
    P: LlmProvider + Sync,
    S: SearchProvider + Sync,
    P::Error: Display,
    S::Error: Display,
{
    let text = args.text.join(" ");
    let detection = detector.detect(&text, args.source.as_deref()).await?;
    record(store, &detection)?;

    formatter.format_detection(&detection)
}
