//! List command implementation.

use crate::cli::ListArgs;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use localtruth_domain::traits::{ClaimQuery, ClaimStore};
use localtruth_store::SqliteStore;

/// Execute the list command.
pub fn execute_list(args: ListArgs, store: &SqliteStore, formatter: &Formatter) -> Result<String> {
    if let Some(min_conf) = args.min_confidence {
        if !(0.0..=1.0).contains(&min_conf) {
            return Err(CliError::InvalidInput(
                "Confidence must be between 0.0 and 1.0".to_string(),
            ));
        }
    }

    let query = ClaimQuery {
        status: args.status.map(Into::into),
        min_confidence: args.min_confidence,
        limit: Some(args.limit),
    };

    let claims = store.query_claims(&query)?;
    formatter.format_claims(&claims)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::StatusArg;
    use crate::config::OutputFormat;
    use localtruth_domain::{Claim, ClaimStatus};

    fn seeded_store() -> SqliteStore {
        let mut store = SqliteStore::new(":memory:").unwrap();
        store.create_claim(Claim::new("first claim", ClaimStatus::False, 0.9, 100)).unwrap();
        store.create_claim(Claim::new("second claim", ClaimStatus::Verified, 0.7, 200)).unwrap();
        store.create_claim(Claim::new("third claim", ClaimStatus::False, 0.3, 300)).unwrap();
        store
    }

    #[test]
    fn test_list_filters_by_status() {
        let store = seeded_store();
        let formatter = Formatter::new(OutputFormat::Json, false);
        let args = ListArgs {
            status: Some(StatusArg::False),
            min_confidence: None,
            limit: 20,
        };

        let output = execute_list(args, &store, &formatter).unwrap();
        let parsed: Vec<serde_json::Value> = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0]["content"], "third claim");
    }

    #[test]
    fn test_list_rejects_bad_confidence() {
        let store = seeded_store();
        let formatter = Formatter::new(OutputFormat::Table, false);
        let args = ListArgs {
            status: None,
            min_confidence: Some(1.5),
            limit: 20,
        };

        assert!(matches!(
            execute_list(args, &store, &formatter),
            Err(CliError::InvalidInput(_))
        ));
    }
}
