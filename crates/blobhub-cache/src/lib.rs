//! # blobhub-cache
//!
//! Blob cache building blocks for BlobHub:
//!
//! - [`keys`]: canonical storage key derivation from `(application id, tag)`
//! - [`memory`]: a byte-bounded, least-recently-used in-process blob cache
//!
//! The cache is an ordinary value owned by whoever constructs it; there is
//! no process-wide instance.

pub mod keys;
pub mod memory;

pub use keys::{BlobKey, derive_key};
pub use memory::{BlobCache, CacheStats};
