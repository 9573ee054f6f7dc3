//! Show command implementation.

use crate::cli::ShowArgs;
use crate::commands::parse_claim_id;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use localtruth_domain::traits::ClaimStore;
use localtruth_store::SqliteStore;

/// Execute the show command.
pub fn execute_show(args: ShowArgs, store: &SqliteStore, formatter: &Formatter) -> Result<String> {
    let id = parse_claim_id(&args.id)?;
    let claim = store
        .get_claim(id)?
        .ok_or_else(|| CliError::NotFound(id.to_string()))?;

    formatter.format_claim_detail(&claim)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OutputFormat;
    use localtruth_domain::{Claim, ClaimId, ClaimStatus};

    #[test]
    fn test_show_existing_claim() {
        let mut store = SqliteStore::new(":memory:").unwrap();
        let id = store
            .create_claim(Claim::new("a claim worth showing", ClaimStatus::Verified, 0.8, 0))
            .unwrap();
        let formatter = Formatter::new(OutputFormat::Table, false);

        let output = execute_show(ShowArgs { id: id.to_string() }, &store, &formatter).unwrap();
        assert!(output.contains("a claim worth showing"));
    }

    #[test]
    fn test_show_missing_and_malformed() {
        let store = SqliteStore::new(":memory:").unwrap();
        let formatter = Formatter::new(OutputFormat::Table, false);

        let missing = ShowArgs { id: ClaimId::new().to_string() };
        assert!(matches!(execute_show(missing, &store, &formatter), Err(CliError::NotFound(_))));

        let malformed = ShowArgs { id: "nope".to_string() };
        assert!(matches!(
            execute_show(malformed, &store, &formatter),
            Err(CliError::InvalidInput(_))
        ));
    }
}
