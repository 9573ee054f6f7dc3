//! Prompts for the detection pipeline

use localtruth_domain::traits::SearchResult;
use localtruth_domain::Claim;

/// Fallback length for a search query built from the text itself
pub const FALLBACK_QUERY_CHARS: usize = 200;

/// Prompt asking for a web search query that would fact-check `text`
pub fn search_query_prompt(text: &str) -> String {
    format!(
        "{}\n\nText:\n---\n{}\n---\n\nSearch query:",
        SEARCH_QUERY_INSTRUCTIONS, text
    )
}

/// Clean a model-generated search query
///
/// Falls back to the first characters of `text` when the model produced
/// nothing usable.
pub fn clean_search_query(response: &str, text: &str) -> String {
    let query = response
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .unwrap_or("")
        .trim_matches(|c: char| c == '"' || c == '\'' || c == '`')
        .trim();

    if query.is_empty() {
        text.chars().take(FALLBACK_QUERY_CHARS).collect()
    } else {
        query.to_string()
    }
}

/// Builds the classification prompt
pub struct ClassificationPrompt<'a> {
    text: &'a str,
    evidence: &'a [SearchResult],
}

impl<'a> ClassificationPrompt<'a> {
    /// Create a prompt for `text` with no search evidence
    pub fn new(text: &'a str) -> Self {
        Self { text, evidence: &[] }
    }

    /// Attach web search results
    pub fn with_evidence(mut self, evidence: &'a [SearchResult]) -> Self {
        self.evidence = evidence;
        self
    }

    /// Build the complete prompt
    pub fn build(&self) -> String {
        let mut prompt = String::new();

        prompt.push_str(CLASSIFICATION_INSTRUCTIONS);
        prompt.push_str("\n\nText to analyze:\n---\n");
        prompt.push_str(self.text);
        prompt.push_str("\n---\n\nSearch results:\n");

        if self.evidence.is_empty() {
            prompt.push_str("No information found.\n");
        } else {
            for result in self.evidence {
                prompt.push_str(&format!(
                    "- {} ({})\n  {}\n",
                    result.title, result.link, result.snippet
                ));
            }
        }

        prompt.push('\n');
        prompt.push_str(OUTPUT_FORMAT_REMINDER);
        prompt
    }
}

/// Prompt asking for a short explanation of a stored verdict
pub fn explanation_prompt(claim: &Claim) -> String {
    format!(
        "{}\n\nClaim: {}\nVerification result: {}\nConfidence score: {:.2}\nCommunity feedback: {}\nLanguage: {}\n\nExplanation:",
        EXPLANATION_INSTRUCTIONS,
        claim.content,
        claim.status,
        claim.confidence_score,
        claim.community_feedback(),
        claim.language,
    )
}

const SEARCH_QUERY_INSTRUCTIONS: &str = "Write one concise web search query that would find sources confirming or refuting the following text. Reply with the query only.";

const CLASSIFICATION_INSTRUCTIONS: &str = r#"You are a fact-checking assistant. Decide whether the text below is misinformation.
Use the search results as evidence when they are relevant. If there is no evidence either way, say so and use a low confidence score."#;

const OUTPUT_FORMAT_REMINDER: &str = r#"Output format (JSON object only, no additional text):
{
  "isMisinformation": true or false,
  "confidenceScore": 0.0-1.0 (how likely the text is misinformation),
  "reason": "one or two sentences"
}"#;

const EXPLANATION_INSTRUCTIONS: &str = "Explain to a general reader, in two or three sentences, why this claim received its verification result. Mention the community feedback if it is relevant.";
