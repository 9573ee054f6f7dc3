//! LocalTruth server binary
//!
//! Starts the HTTP API.

use localtruth_server::{config::ServerConfig, start_server, ServerError};
use std::env;
use std::process;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

async fn run() -> Result<(), ServerError> {
    let args: Vec<String> = env::args().collect();

    let config = if args.len() > 2 && args[1] == "--config" {
        ServerConfig::from_file(&args[2])?
    } else if args.len() > 1 && args[1] == "--help" {
        print_help();
        process::exit(0);
    } else {
        eprintln!("Warning: No config file specified, using default test configuration (in-memory store)");
        eprintln!("Usage: localtruth-server --config <path-to-config.toml>");
        eprintln!();
        ServerConfig::default_test_config()
    };

    start_server(config).await?;

    Ok(())
}

fn print_help() {
    println!("LocalTruth Server - Misinformation checks and community votes over HTTP");
    println!();
    println!("USAGE:");
    println!("    localtruth-server --config <path-to-config.toml>");
    println!();
    println!("OPTIONS:");
    println!("    --config <file>    Load configuration from TOML file");
    println!("    --help             Print this help message");
    println!();
    println!("CONFIGURATION:");
    println!("    The TOML config file should contain:");
    println!("    - bind_address, bind_port: where to listen");
    println!("    - database_path: SQLite file holding claims");
    println!("    - [llm] endpoint, model, timeout_secs, max_retries");
    println!("    - [search] api_key, cx (or GOOGLE_SEARCH_API_KEY / GOOGLE_CX)");
    println!("    - [verifier] min_text_length, max_text_length, search_enabled, explain, ...");
    println!();
    println!("ENDPOINTS:");
    println!("    POST /claims              Check a text and record the claim");
    println!("    GET  /claims              List claims (status, min_confidence, limit)");
    println!("    GET  /claims/:id          Fetch one claim");
    println!("    POST /claims/:id/vote     Vote up or down");
    println!("    GET  /health              Health check");
    println!();
}
