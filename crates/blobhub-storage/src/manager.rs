//! Storage manager: builds the configured remote object store.

use std::sync::Arc;

use tracing::info;

use blobhub_core::config::blob_store::BlobStoreConfig;
use blobhub_core::error::AppError;
use blobhub_core::result::AppResult;
use blobhub_core::traits::storage::ObjectStore;

/// Holds the object store selected by configuration.
#[derive(Debug, Clone)]
pub struct StorageManager {
    /// The inner object store.
    inner: Arc<dyn ObjectStore>,
}

impl StorageManager {
    /// Create the object store named by `config.provider`.
    pub async fn new(config: &BlobStoreConfig) -> AppResult<Self> {
        let inner: Arc<dyn ObjectStore> = match config.provider.as_str() {
            #[cfg(feature = "s3")]
            "s3" => {
                info!("Initializing S3 object store provider");
                Arc::new(crate::providers::S3ObjectStore::new(&config.s3).await?)
            }
            #[cfg(feature = "local")]
            "local" => {
                info!(root = %config.local.root_path, "Initializing local object store provider");
                Arc::new(crate::providers::LocalObjectStore::new(&config.local.root_path).await?)
            }
            other => {
                return Err(AppError::configuration(format!(
                    "Unknown or disabled object store provider: '{other}'"
                )));
            }
        };

        Ok(Self { inner })
    }

    /// Shared handle to the object store.
    pub fn provider(&self) -> Arc<dyn ObjectStore> {
        Arc::clone(&self.inner)
    }

    /// Check the health of the object store, treating errors as unhealthy.
    pub async fn health_check(&self) -> bool {
        self.inner.health_check().await.unwrap_or(false)
    }
}
