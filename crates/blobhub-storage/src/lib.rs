//! # blobhub-storage
//!
//! Remote object store implementations for BlobHub. Supports S3 (and
//! S3-compatible services) and a local filesystem store for development.

pub mod manager;
pub mod providers;

pub use manager::StorageManager;
