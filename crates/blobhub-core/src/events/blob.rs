//! Blob read/write events.

use serde::{Deserialize, Serialize};

/// Events describing the progress of a `put` or `get`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum BlobEvent {
    /// A write to the remote store is about to start.
    Put {
        /// Derived storage key.
        key: String,
        /// Payload size in bytes.
        size_bytes: u64,
    },
    /// A write was confirmed by the remote store.
    PutOk {
        /// Derived storage key.
        key: String,
        /// Payload size in bytes.
        size_bytes: u64,
        /// Wall-clock time spent on the remote write.
        elapsed_ms: u64,
    },
    /// A read missed the cache and goes to the remote store.
    Get {
        /// Derived storage key.
        key: String,
    },
    /// A read was served from the local cache.
    GetCached {
        /// Derived storage key.
        key: String,
        /// Payload size in bytes.
        size_bytes: u64,
    },
    /// A remote read completed and populated the cache.
    GetOk {
        /// Derived storage key.
        key: String,
        /// Payload size in bytes.
        size_bytes: u64,
        /// Wall-clock time spent on the remote read.
        elapsed_ms: u64,
    },
}

impl BlobEvent {
    /// The event type name as recorded by sinks.
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::Put { .. } => "put",
            Self::PutOk { .. } => "put-ok",
            Self::Get { .. } => "get",
            Self::GetCached { .. } => "get-cached",
            Self::GetOk { .. } => "get-ok",
        }
    }

    /// The storage key the event refers to.
    pub fn key(&self) -> &str {
        match self {
            Self::Put { key, .. }
            | Self::PutOk { key, .. }
            | Self::Get { key }
            | Self::GetCached { key, .. }
            | Self::GetOk { key, .. } => key,
        }
    }
}
