//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use colored::*;
use localtruth_domain::{Claim, ClaimId, ClaimStatus, VoteOutcome};
use localtruth_verifier::Detection;
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Content column width in claim tables
const CONTENT_WIDTH: usize = 60;

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Format claims output.
    pub fn format_claims(&self, claims: &[Claim]) -> Result<String> {
        match self.format {
            OutputFormat::Json => self.format_claims_json(claims),
            OutputFormat::Table => self.format_claims_table(claims),
            OutputFormat::Quiet => self.format_claims_quiet(claims),
        }
    }

    /// Format one claim with all of its fields.
    pub fn format_claim_detail(&self, claim: &Claim) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(&claim_json(claim))?),
            OutputFormat::Quiet => Ok(claim.id.to_string()),
            OutputFormat::Table => {
                let mut builder = Builder::default();
                builder.push_record(["Field", "Value"]);
                builder.push_record(["ID".to_string(), claim.id.to_string()]);
                builder.push_record(["Status".to_string(), self.status(claim.status)]);
                builder.push_record(["Confidence".to_string(), format!("{:.2}", claim.confidence_score)]);
                builder.push_record(["Votes".to_string(), format!("+{} / -{}", claim.upvotes, claim.downvotes)]);
                builder.push_record(["Source".to_string(), claim.source.clone()]);
                builder.push_record(["Language".to_string(), claim.language.clone()]);
                builder.push_record(["Detected".to_string(), claim.detected_at.to_string()]);
                if let Some(minutes) = claim.time_to_verify_minutes() {
                    builder.push_record(["Time to verify".to_string(), format!("{} min", minutes)]);
                }
                builder.push_record(["Content".to_string(), claim.content.clone()]);
                if let Some(explanation) = &claim.explanation {
                    builder.push_record(["Explanation".to_string(), explanation.clone()]);
                }

                let mut table = builder.build();
                table
                    .with(Style::rounded())
                    .with(Modify::new(Rows::first()).with(Alignment::center()));
                Ok(table.to_string())
            }
        }
    }

    /// Format the result of a check.
    pub fn format_detection(&self, detection: &Detection) -> Result<String> {
        let claim = &detection.claim;
        match self.format {
            OutputFormat::Json => {
                let value = serde_json::json!({
                    "claim": claim_json(claim),
                    "reason": detection.classification.reason,
                    "sources": detection.evidence.iter().map(|r| &r.link).collect::<Vec<_>>(),
                });
                Ok(serde_json::to_string_pretty(&value)?)
            }
            OutputFormat::Quiet => Ok(claim.id.to_string()),
            OutputFormat::Table => {
                let mut out = self.success(&format!("Claim recorded: {}", claim.id));
                out.push_str(&format!(
                    "\n{} (confidence {:.2})",
                    self.status(claim.status),
                    claim.confidence_score
                ));
                if !detection.classification.reason.is_empty() {
                    out.push_str(&format!("\nReason: {}", detection.classification.reason));
                }
                if let Some(explanation) = &claim.explanation {
                    out.push_str(&format!("\n\n{}", explanation));
                }
                for result in &detection.evidence {
                    out.push_str(&format!("\n  - {} <{}>", result.title, result.link));
                }
                Ok(out)
            }
        }
    }

    /// Format the result of a vote.
    pub fn format_vote(&self, claim_id: &ClaimId, outcome: &VoteOutcome) -> Result<String> {
        let viewer_vote = outcome.viewer_vote.map(|v| v.as_str());
        match self.format {
            OutputFormat::Json => {
                let value = serde_json::json!({
                    "claim_id": claim_id.to_string(),
                    "upvotes": outcome.tally.upvotes,
                    "downvotes": outcome.tally.downvotes,
                    "confidence_score": outcome.tally.confidence_score,
                    "viewer_vote": viewer_vote,
                });
                Ok(serde_json::to_string_pretty(&value)?)
            }
            OutputFormat::Quiet => Ok(viewer_vote.unwrap_or("none").to_string()),
            OutputFormat::Table => {
                let action = match viewer_vote {
                    Some(vote) => format!("Voted {}", vote),
                    None => "Vote withdrawn".to_string(),
                };
                Ok(self.success(&format!(
                    "{} on {}: +{} / -{}, confidence {:.2}",
                    action,
                    claim_id,
                    outcome.tally.upvotes,
                    outcome.tally.downvotes,
                    outcome.tally.confidence_score
                )))
            }
        }
    }

    /// Format claims as JSON.
    fn format_claims_json(&self, claims: &[Claim]) -> Result<String> {
        let json_claims: Vec<serde_json::Value> = claims.iter().map(claim_json).collect();
        Ok(serde_json::to_string_pretty(&json_claims)?)
    }

    /// Format claims as a table.
    fn format_claims_table(&self, claims: &[Claim]) -> Result<String> {
        if claims.is_empty() {
            return Ok(self.colorize("No claims found.", "yellow"));
        }

        let mut builder = Builder::default();
        builder.push_record(["ID", "Status", "Confidence", "Up", "Down", "Content"]);

        for claim in claims {
            let id = claim.id.to_string();
            builder.push_record([
                id[..8].to_string(), // Truncate ID for readability
                self.status(claim.status),
                format!("{:.2}", claim.confidence_score),
                claim.upvotes.to_string(),
                claim.downvotes.to_string(),
                truncate(&claim.content, CONTENT_WIDTH),
            ]);
        }

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));

        Ok(table.to_string())
    }

    /// Format claims in quiet mode (IDs only).
    fn format_claims_quiet(&self, claims: &[Claim]) -> Result<String> {
        let ids: Vec<String> = claims.iter().map(|c| c.id.to_string()).collect();
        Ok(ids.join("\n"))
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Status label, colored by verdict.
    fn status(&self, status: ClaimStatus) -> String {
        let color = match status {
            ClaimStatus::Verified => "green",
            ClaimStatus::False => "red",
            ClaimStatus::Inconclusive => "yellow",
        };
        self.colorize(status.as_str(), color)
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            _ => text.to_string(),
        }
    }
}

fn claim_json(c: &Claim) -> serde_json::Value {
    serde_json::json!({
        "id": c.id.to_string(),
        "content": c.content,
        "source": c.source,
        "language": c.language,
        "status": c.status.as_str(),
        "confidence_score": c.confidence_score,
        "upvotes": c.upvotes,
        "downvotes": c.downvotes,
        "explanation": c.explanation,
        "detected_at": c.detected_at,
        "updated_at": c.updated_at,
        "time_to_verify_minutes": c.time_to_verify_minutes(),
    })
}

/// Shorten `text` to `width` characters, marking the cut.
fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut short: String = text.chars().take(width.saturating_sub(1)).collect();
    short.push('…');
    short
}
