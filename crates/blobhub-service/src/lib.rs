//! # blobhub-service
//!
//! Service layer for BlobHub. [`BlobStore`] combines the remote object
//! store with the bounded blob cache: writes go through to the remote store
//! before they are cached, and reads fall through to the remote store on a
//! cache miss.
//!
//! Services follow constructor injection: all dependencies are provided
//! at construction time via `Arc` references.

pub mod blob;
pub mod event_log;

pub use blob::{BlobGetRequest, BlobPutRequest, BlobStore};
pub use event_log::TracingEventSink;
