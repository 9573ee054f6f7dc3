//! Parse classifier output

use crate::error::VerifierError;
use localtruth_domain::Classification;
use serde::Deserialize;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ClassificationResponse {
    is_misinformation: bool,
    confidence_score: f64,
    #[serde(default)]
    reason: String,
}

/// Parse the classifier's JSON answer
///
/// The score is clamped to `[0, 1]`; a non-finite score is rejected.
pub fn parse_classification(response: &str) -> Result<Classification, VerifierError> {
    let json_str = extract_json(response)?;
    let parsed: ClassificationResponse = serde_json::from_str(json_str)?;

    if !parsed.confidence_score.is_finite() {
        return Err(VerifierError::InvalidResponse(format!(
            "confidence score is not a number: {}",
            parsed.confidence_score
        )));
    }

    Ok(Classification {
        is_misinformation: parsed.is_misinformation,
        confidence_score: parsed.confidence_score.clamp(0.0, 1.0),
        reason: parsed.reason.trim().to_string(),
    })
}

/// Extract JSON from a response, handling markdown code blocks
fn extract_json(response: &str) -> Result<&str, VerifierError> {
    let trimmed = response.trim();

    if let Some(fenced) = trimmed.strip_prefix("```") {
        // Drop the language tag line, then the closing fence
        let body = fenced
            .split_once('\n')
            .map(|(_, rest)| rest)
            .ok_or_else(|| VerifierError::InvalidResponse("Empty code block".to_string()))?;
        let body = body.trim_end();
        return Ok(body.strip_suffix("```").unwrap_or(body).trim());
    }

    // Models sometimes add prose around the object
    match (trimmed.find('{'), trimmed.rfind('}')) {
        (Some(start), Some(end)) if start < end => Ok(&trimmed[start..=end]),
        _ => Err(VerifierError::InvalidResponse(format!(
            "no JSON object in response: {}",
            trimmed.chars().take(80).collect::<String>()
        ))),
    }
}
