//! CLI command definitions and dispatch.

pub mod blob;
pub mod config;
pub mod health;

use clap::{Parser, Subcommand};

use blobhub_core::config::AppConfig;
use blobhub_core::error::AppError;

/// BlobHub: cache-fronted blob storage
#[derive(Debug, Parser)]
#[command(name = "blobhub", version, about, long_about = None)]
pub struct Cli {
    /// Configuration overlay to load from `config/<env>.toml`
    #[arg(long, env = "BLOBHUB_ENV", default_value = "development")]
    pub config_env: String,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Store a blob
    Put(blob::PutArgs),
    /// Fetch a blob
    Get(blob::GetArgs),
    /// Print the effective configuration
    Config,
    /// Check that the remote object store is reachable
    Health,
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self, config: AppConfig) -> Result<(), AppError> {
        match &self.command {
            Commands::Put(args) => blob::put(args, &config).await,
            Commands::Get(args) => blob::get(args, &config).await,
            Commands::Config => config::show(&config),
            Commands::Health => health::execute(&config).await,
        }
    }
}
