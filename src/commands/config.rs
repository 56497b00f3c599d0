//! Configuration display command.

use blobhub_core::config::AppConfig;
use blobhub_core::error::AppError;

/// Print the effective configuration as JSON with credentials masked.
pub fn show(config: &AppConfig) -> Result<(), AppError> {
    let json = serde_json::to_string_pretty(&config.redacted())?;
    println!("{}", json);
    Ok(())
}
