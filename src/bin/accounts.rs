//! Accounts CLI Binary
//!
//! Command-line interface for the organisation accounts API.

use accounts_client::cli::{self, Cli};
use accounts_client::logging::init_logging;
use clap::Parser;
use std::process;
use tracing::debug;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match cli::build_client_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{:#}", e);
            process::exit(1);
        }
    };

    if let Err(e) = init_logging(Some(&config.logging)) {
        eprintln!("Failed to initialize logging: {}", e);
        process::exit(1);
    }

    debug!(base_url = %config.base_url, "Accounts CLI starting");

    let client = match cli::build_client(&config) {
        Ok(client) => client,
        Err(e) => {
            eprintln!("{:#}", e);
            process::exit(1);
        }
    };

    let ctx = cli::call_context(&cli);
    match cli::execute(&client, &ctx, &cli.command).await {
        Ok(output) => println!("{}", output),
        Err(e) => {
            eprintln!("{:#}", e);
            process::exit(1);
        }
    }
}
