//! Remote object store trait for pluggable blob backends.

use async_trait::async_trait;
use bytes::Bytes;

use crate::result::AppResult;

/// Content type attached to every blob written by BlobHub.
pub const BLOB_CONTENT_TYPE: &str = "application/octet-stream";

/// Trait for durable object store backends.
///
/// Implementations exist for S3 and the local filesystem. A provider is
/// bound to one bucket (or root directory) at construction time; keys are
/// opaque path-like strings.
///
/// Error contract: a missing object is reported with
/// [`ErrorKind::NotFound`](crate::error::ErrorKind::NotFound). Every other
/// failure uses [`ErrorKind::Storage`](crate::error::ErrorKind::Storage)
/// with the provider error attached as the source.
#[async_trait]
pub trait ObjectStore: Send + Sync + std::fmt::Debug + 'static {
    /// Return the provider type name (e.g., "local", "s3").
    fn provider_type(&self) -> &str;

    /// Check whether the provider is healthy and reachable.
    async fn health_check(&self) -> AppResult<bool>;

    /// Durably store `data` under `key`, replacing any existing object.
    async fn write(
        &self,
        key: &str,
        data: Bytes,
        content_length: u64,
        content_type: &str,
    ) -> AppResult<()>;

    /// Read the full object stored under `key`.
    async fn read(&self, key: &str) -> AppResult<Bytes>;
}
