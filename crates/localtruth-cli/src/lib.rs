//! LocalTruth CLI library.
//!
//! Configuration management, command execution and output formatting for
//! the `localtruth` command-line client. The client works directly against
//! a local claim database.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod output;

pub use cli::{Cli, Command};
pub use config::Config;
pub use error::{CliError, Result};
pub use output::Formatter;
