//! Remote object store health command.

use serde_json::json;

use blobhub_core::config::AppConfig;
use blobhub_core::error::AppError;
use blobhub_storage::StorageManager;

/// Check that the configured object store is reachable.
pub async fn execute(config: &AppConfig) -> Result<(), AppError> {
    let manager = StorageManager::new(&config.blob_store).await?;
    let (report, healthy) = check(&manager).await;
    println!("{}", report);

    if !healthy {
        return Err(AppError::storage(format!(
            "Object store '{}' is not reachable",
            manager.provider().provider_type()
        )));
    }
    Ok(())
}

async fn check(manager: &StorageManager) -> (serde_json::Value, bool) {
    let healthy = manager.health_check().await;
    let report = json!({
        "provider": manager.provider().provider_type(),
        "healthy": healthy,
    });
    (report, healthy)
}
