//! Blob store configuration: remote provider selection, S3 connection
//! settings, and the local cache budget.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Top-level blob store configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct BlobStoreConfig {
    /// Remote provider backing the store: `"s3"` or `"local"`.
    #[serde(default = "default_provider")]
    pub provider: String,
    /// Capacity of the in-memory blob cache in bytes (0 disables caching).
    #[serde(default = "default_local_cache_size")]
    pub local_cache_size_bytes: u64,
    /// S3 connection settings.
    #[serde(default)]
    #[validate(nested)]
    pub s3: S3Config,
    /// Filesystem-backed provider settings.
    #[serde(default)]
    pub local: LocalStoreConfig,
}

impl Default for BlobStoreConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            local_cache_size_bytes: default_local_cache_size(),
            s3: S3Config::default(),
            local: LocalStoreConfig::default(),
        }
    }
}

/// S3 object storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default, Validate)]
pub struct S3Config {
    /// Custom access key ID. Falls back to the default AWS credential chain.
    #[serde(default)]
    pub access_key_id: Option<String>,
    /// Custom secret access key.
    #[serde(default)]
    pub secret_key: Option<String>,
    /// Bucket holding every blob.
    #[serde(default)]
    #[validate(length(min = 1, max = 63))]
    pub bucket: Option<String>,
    /// Region containing the bucket.
    #[serde(default)]
    #[validate(length(min = 1))]
    pub region: Option<String>,
    /// Endpoint URL for S3-compatible services such as MinIO.
    #[serde(default)]
    pub endpoint: Option<String>,
}

impl S3Config {
    /// Static credentials, when both halves are configured.
    pub fn static_credentials(&self) -> Option<(&str, &str)> {
        match (&self.access_key_id, &self.secret_key) {
            (Some(key), Some(secret)) => Some((key.as_str(), secret.as_str())),
            _ => None,
        }
    }
}

/// Filesystem-backed provider configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocalStoreConfig {
    /// Root directory for stored blobs.
    #[serde(default = "default_local_root")]
    pub root_path: String,
}

impl Default for LocalStoreConfig {
    fn default() -> Self {
        Self {
            root_path: default_local_root(),
        }
    }
}

fn default_provider() -> String {
    "s3".to_string()
}

fn default_local_cache_size() -> u64 {
    268_435_456 // 256 MiB
}

fn default_local_root() -> String {
    "./data/blobs".to_string()
}
