//! In-memory blob cache.

pub mod store;

pub use store::{BlobCache, CacheStats};
