//! Observability events emitted by blob store operations.
//!
//! Events are handed to an [`EventSink`](crate::traits::EventSink) on a
//! best-effort basis; nothing in the request path depends on them.

pub mod blob;

pub use blob::BlobEvent;
