//! Core traits defined in `blobhub-core` and implemented by other crates.

pub mod events;
pub mod storage;

pub use events::{EventSink, NoopEventSink};
pub use storage::ObjectStore;
