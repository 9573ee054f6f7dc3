//! Vote command implementation.

use crate::cli::VoteArgs;
use crate::commands::parse_claim_id;
use crate::error::Result;
use crate::output::Formatter;
use localtruth_store::SqliteStore;
use localtruth_verifier::VoteTracker;

/// Execute the vote command.
pub fn execute_vote(args: VoteArgs, store: &SqliteStore, formatter: &Formatter) -> Result<String> {
    let id = parse_claim_id(&args.id)?;
    let outcome = VoteTracker::new(store).apply_vote(id, args.vote.into(), args.prior.map(Into::into))?;

    formatter.format_vote(&id, &outcome)
}
