//! CLI command definitions and argument parsing.

use clap::{Parser, Subcommand};
use localtruth_domain::{ClaimStatus, VoteType};

/// LocalTruth CLI - Check texts for misinformation and vote on the verdicts.
#[derive(Debug, Parser)]
#[command(name = "localtruth")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path
    #[arg(short, long, global = true, env = "LOCALTRUTH_CONFIG")]
    pub config: Option<String>,

    /// Claim database path (overrides the config file)
    #[arg(short, long, global = true, env = "LOCALTRUTH_DATABASE")]
    pub database: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
    /// Quiet format (IDs only)
    Quiet,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Check a text and record the verdict
    Check(CheckArgs),

    /// List recorded claims, newest first
    List(ListArgs),

    /// Show one claim in full
    Show(ShowArgs),

    /// Vote on a claim
    Vote(VoteArgs),

    /// Inspect configuration
    Config(ConfigArgs),
}

/// Arguments for the check command.
#[derive(Debug, Parser)]
pub struct CheckArgs {
    /// Text to check (words are joined with spaces)
    #[arg(required = true)]
    pub text: Vec<String>,

    /// Where the text came from
    #[arg(short, long)]
    pub source: Option<String>,

    /// Skip web search and the explanation call
    #[arg(long)]
    pub offline: bool,
}

/// Arguments for the list command.
#[derive(Debug, Parser)]
pub struct ListArgs {
    /// Filter by status
    #[arg(short, long, value_enum)]
    pub status: Option<StatusArg>,

    /// Minimum confidence score
    #[arg(long)]
    pub min_confidence: Option<f64>,

    /// Maximum number of results
    #[arg(short, long, default_value = "20")]
    pub limit: usize,
}

/// Arguments for the show command.
#[derive(Debug, Parser)]
pub struct ShowArgs {
    /// Claim ID
    pub id: String,
}

/// Arguments for the vote command.
#[derive(Debug, Parser)]
pub struct VoteArgs {
    /// Claim ID
    pub id: String,

    /// Vote direction
    #[arg(value_enum)]
    pub vote: VoteArg,

    /// Your current vote on this claim, if any
    #[arg(short, long, value_enum)]
    pub prior: Option<VoteArg>,
}

/// Arguments for configuration inspection.
#[derive(Debug, Parser)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Configuration actions.
#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Print the effective configuration
    Show,

    /// Print the configuration file path
    Path,

    /// Write the default configuration file if none exists
    Init,
}

/// Status argument.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum StatusArg {
    /// Supported by evidence
    Verified,
    /// Misinformation
    False,
    /// Not enough evidence either way
    Inconclusive,
}

/// Vote argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum VoteArg {
    /// Agree with the verdict
    Up,
    /// Disagree with the verdict
    Down,
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => crate::config::OutputFormat::Table,
            CliFormat::Json => crate::config::OutputFormat::Json,
            CliFormat::Quiet => crate::config::OutputFormat::Quiet,
        }
    }
}

impl From<StatusArg> for ClaimStatus {
    fn from(status: StatusArg) -> Self {
        match status {
            StatusArg::Verified => ClaimStatus::Verified,
            StatusArg::False => ClaimStatus::False,
            StatusArg::Inconclusive => ClaimStatus::Inconclusive,
        }
    }
}

impl From<VoteArg> for VoteType {
    fn from(vote: VoteArg) -> Self {
        match vote {
            VoteArg::Up => VoteType::Up,
            VoteArg::Down => VoteType::Down,
        }
    }
}
