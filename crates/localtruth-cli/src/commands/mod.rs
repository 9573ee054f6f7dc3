//! Command implementations.
//!
//! Each command returns the text to print so callers decide where it goes.

pub mod check;
pub mod config;
pub mod list;
pub mod show;
pub mod vote;

pub use self::check::{build_detector, execute_check};
pub use self::config::execute_config;
pub use self::list::execute_list;
pub use self::show::execute_show;
pub use self::vote::execute_vote;

use crate::error::{CliError, Result};
use localtruth_domain::ClaimId;

/// Parse a claim id argument.
pub(crate) fn parse_claim_id(raw: &str) -> Result<ClaimId> {
    ClaimId::from_string(raw.trim())
        .map_err(|e| CliError::InvalidInput(format!("Invalid claim id '{}': {}", raw, e)))
}
