//! Blob put/get CLI commands.

use std::path::PathBuf;

use bytes::Bytes;
use clap::Args;

use blobhub_cache::keys::derive_key;
use blobhub_core::config::AppConfig;
use blobhub_core::error::{AppError, ErrorKind};
use blobhub_core::types::AppId;
use blobhub_service::BlobStore;

/// Arguments for the put command
#[derive(Debug, Args)]
pub struct PutArgs {
    /// Owning application id
    #[arg(long)]
    pub app_id: AppId,

    /// Content tag
    #[arg(long)]
    pub tag: String,

    /// Read the blob from this file
    #[arg(long, conflicts_with = "data", required_unless_present = "data")]
    pub file: Option<PathBuf>,

    /// Blob content as standard base64
    #[arg(long)]
    pub data: Option<String>,
}

/// Arguments for the get command
#[derive(Debug, Args)]
pub struct GetArgs {
    /// Owning application id
    #[arg(long)]
    pub app_id: AppId,

    /// Content tag
    #[arg(long)]
    pub tag: String,

    /// Write the raw blob to this file instead of printing base64
    #[arg(long)]
    pub out: Option<PathBuf>,
}

/// Execute the put command
pub async fn put(args: &PutArgs, config: &AppConfig) -> Result<(), AppError> {
    let store = BlobStore::from_config(config).await?;

    match (&args.file, &args.data) {
        (Some(path), _) => {
            let content = tokio::fs::read(path).await.map_err(|e| {
                AppError::with_source(
                    ErrorKind::Validation,
                    format!("Failed to read '{}'", path.display()),
                    e,
                )
            })?;
            store
                .put_bytes(args.app_id, &args.tag, Bytes::from(content))
                .await?;
        }
        (None, Some(data)) => store.put(args.app_id, &args.tag, data).await?,
        (None, None) => return Err(AppError::validation("Either --file or --data is required")),
    }

    println!("Stored {}", derive_key(args.app_id, &args.tag));
    Ok(())
}

/// Execute the get command
pub async fn get(args: &GetArgs, config: &AppConfig) -> Result<(), AppError> {
    let store = BlobStore::from_config(config).await?;

    match &args.out {
        Some(path) => {
            let data = store.get_bytes(args.app_id, &args.tag).await?;
            tokio::fs::write(path, &data).await?;
            println!("Wrote {} bytes to {}", data.len(), path.display());
        }
        None => println!("{}", store.get(args.app_id, &args.tag).await?),
    }
    Ok(())
}
