//! Command-line front end: clap types and command execution.

use crate::cancel::CallContext;
use crate::client::{AccountClient, HttpAccountClient};
use crate::config::{ClientConfig, ConfigLoader};
use crate::model::parse_account_document;
use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;
use tracing::debug;
use uuid::Uuid;

/// Accounts CLI - manage organisation accounts over the accounts API
#[derive(Debug, Parser)]
#[command(name = "accounts")]
#[command(about = "Create, fetch and delete organisation accounts")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file path (TOML)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// API base URL (overrides configuration)
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long, global = true)]
    pub log_format: Option<String>,

    /// Abort the call after this many seconds
    #[arg(long, global = true)]
    pub timeout: Option<u64>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Create an account from a JSON file (bare account or {"data": ...})
    Create {
        #[arg(long)]
        file: PathBuf,
    },
    /// Fetch an account by id
    Fetch { id: Uuid },
    /// Delete a specific version of an account
    Delete {
        id: Uuid,
        #[arg(long)]
        version: i64,
    },
}

/// Resolve configuration: file and environment first, then CLI flags on top.
pub fn build_client_config(cli: &Cli) -> anyhow::Result<ClientConfig> {
    let mut config = ConfigLoader::load(cli.config.as_deref())?;

    if let Some(ref base_url) = cli.base_url {
        config.base_url = base_url.clone();
    }
    if let Some(ref level) = cli.log_level {
        config.logging.level = level.clone();
    }
    if let Some(ref format) = cli.log_format {
        config.logging.format = format.clone();
    }

    config.validate()?;
    Ok(config)
}

pub fn call_context(cli: &Cli) -> CallContext {
    match cli.timeout {
        Some(secs) => CallContext::with_timeout(Duration::from_secs(secs)),
        None => CallContext::background(),
    }
}

/// Run one command against `client`, returning the text to print.
pub async fn execute(
    client: &dyn AccountClient,
    ctx: &CallContext,
    command: &Commands,
) -> anyhow::Result<String> {
    match command {
        Commands::Create { file } => {
            let raw = std::fs::read_to_string(file)
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let account = parse_account_document(&raw)
                .with_context(|| format!("Invalid account document {}", file.display()))?;
            let created = client.create(ctx, &account).await?;
            debug!(account_id = %created.id, "Account created");
            Ok(serde_json::to_string_pretty(&created)?)
        }
        Commands::Fetch { id } => {
            let account = client.fetch(ctx, *id).await?;
            Ok(serde_json::to_string_pretty(&account)?)
        }
        Commands::Delete { id, version } => {
            client.delete(ctx, *id, *version).await?;
            debug!(account_id = %id, version, "Account deleted");
            Ok(format!("Deleted account {} (version {})", id, version))
        }
    }
}

/// Build the gateway from resolved configuration.
pub fn build_client(config: &ClientConfig) -> anyhow::Result<HttpAccountClient> {
    Ok(HttpAccountClient::from_config(config)?)
}
