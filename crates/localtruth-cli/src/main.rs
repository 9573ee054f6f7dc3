//! LocalTruth CLI - check texts for misinformation and vote on verdicts.

use clap::Parser;
use localtruth_cli::commands;
use localtruth_cli::{Cli, Command, Config, Formatter};
use localtruth_store::SqliteStore;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> localtruth_cli::Result<()> {
    let cli = Cli::parse();

    let config_path = match &cli.config {
        Some(path) => PathBuf::from(path),
        None => Config::path()?,
    };
    let config = Config::load_from(&config_path)?;

    // Determine output format
    let format = cli
        .format
        .map(Into::into)
        .unwrap_or(config.settings.format);

    // Determine color setting
    let color_enabled = !cli.no_color && config.settings.color;

    let formatter = Formatter::new(format, color_enabled);

    let database = cli
        .database
        .clone()
        .unwrap_or_else(|| config.database.path.clone());

    let output = match cli.command {
        Command::Config(args) => commands::execute_config(args, &config, &config_path, &formatter)?,
        Command::Check(args) => {
            let detector = commands::build_detector(&config, args.offline)?;
            let mut store = open_store(&database)?;
            commands::execute_check(args, &detector, &mut store, &formatter).await?
        }
        Command::List(args) => commands::execute_list(args, &open_store(&database)?, &formatter)?,
        Command::Show(args) => commands::execute_show(args, &open_store(&database)?, &formatter)?,
        Command::Vote(args) => commands::execute_vote(args, &open_store(&database)?, &formatter)?,
    };

    println!("{}", output);
    Ok(())
}

/// Open the claim database, creating its directory if needed.
fn open_store(database: &str) -> localtruth_cli::Result<SqliteStore> {
    if let Some(parent) = Path::new(database).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(SqliteStore::new(database)?)
}
