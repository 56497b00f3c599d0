//! Cache-augmented blob store.

use std::sync::Arc;
use std::time::Instant;

use base64::Engine;
use base64::alphabet;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use bytes::Bytes;
use tracing::{debug, error, trace};

use blobhub_cache::keys::{BlobKey, derive_key};
use blobhub_cache::memory::BlobCache;
use blobhub_core::config::AppConfig;
use blobhub_core::error::AppError;
use blobhub_core::events::BlobEvent;
use blobhub_core::result::AppResult;
use blobhub_core::traits::events::{EventSink, NoopEventSink};
use blobhub_core::traits::storage::{BLOB_CONTENT_TYPE, ObjectStore};
use blobhub_core::types::AppId;
use blobhub_storage::manager::StorageManager;

use crate::blob::request::{BlobGetRequest, BlobPutRequest};
use crate::event_log::TracingEventSink;

/// Reads and writes blobs through a bounded local cache.
///
/// Writes reach the remote store first and are cached only once the remote
/// store confirmed them. Reads are answered from the cache when possible and
/// otherwise fetched remotely, then cached. Missing blobs are never cached.
///
/// Concurrent `put`/`get` calls on the same key are not serialized; a read
/// racing a write may observe either version.
#[derive(Clone)]
pub struct BlobStore {
    /// Durable backing store.
    remote: Arc<dyn ObjectStore>,
    /// Working-set cache owned by this store.
    cache: Arc<BlobCache>,
    /// Best-effort event sink.
    events: Arc<dyn EventSink>,
}

impl std::fmt::Debug for BlobStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlobStore")
            .field("provider", &self.remote.provider_type())
            .field("cache", &self.cache.stats())
            .finish()
    }
}

impl BlobStore {
    /// Creates a new blob store.
    pub fn new(
        remote: Arc<dyn ObjectStore>,
        cache: Arc<BlobCache>,
        events: Arc<dyn EventSink>,
    ) -> Self {
        Self {
            remote,
            cache,
            events,
        }
    }

    /// Creates a blob store that records no events.
    pub fn without_events(remote: Arc<dyn ObjectStore>, cache: Arc<BlobCache>) -> Self {
        Self::new(remote, cache, Arc::new(NoopEventSink))
    }

    /// Builds the remote store, cache and event log described by `config`.
    pub async fn from_config(config: &AppConfig) -> AppResult<Self> {
        let storage = StorageManager::new(&config.blob_store).await?;
        let cache = Arc::new(BlobCache::from_config(&config.blob_store));
        let events = Arc::new(TracingEventSink::from_config(&config.event_log));
        Ok(Self::new(storage.provider(), cache, events))
    }

    /// The cache owned by this store.
    pub fn cache(&self) -> &BlobCache {
        &self.cache
    }

    /// The remote object store.
    pub fn remote(&self) -> &dyn ObjectStore {
        self.remote.as_ref()
    }

    /// Stores a base64-encoded blob.
    pub async fn put(&self, app_id: AppId, tag: &str, data: &str) -> AppResult<()> {
        let key = derive_key(app_id, tag);
        let bytes = decode_blob(data)?;
        self.put_with_key(key, bytes).await
    }

    /// Fetches a blob, returning it base64-encoded.
    pub async fn get(&self, app_id: AppId, tag: &str) -> AppResult<String> {
        let bytes = self.get_bytes(app_id, tag).await?;
        Ok(BASE64.encode(&bytes))
    }

    /// Handles a [`BlobPutRequest`].
    pub async fn put_request(&self, req: &BlobPutRequest) -> AppResult<()> {
        self.put(req.app_id, &req.etag, &req.data).await
    }

    /// Handles a [`BlobGetRequest`].
    pub async fn get_request(&self, req: &BlobGetRequest) -> AppResult<String> {
        self.get(req.app_id, &req.etag).await
    }

    /// Stores raw blob bytes.
    pub async fn put_bytes(&self, app_id: AppId, tag: &str, data: Bytes) -> AppResult<()> {
        self.put_with_key(derive_key(app_id, tag), data).await
    }

    /// Fetches raw blob bytes.
    ///
    /// A cache hit still yields to the scheduler once before completing, so
    /// the returned future never resolves on its first poll.
    pub async fn get_bytes(&self, app_id: AppId, tag: &str) -> AppResult<Bytes> {
        let key = derive_key(app_id, tag);

        if let Some(cached) = self.cache.get(key.as_str()) {
            self.emit(BlobEvent::GetCached {
                key: key.to_string(),
                size_bytes: cached.len() as u64,
            });
            tokio::task::yield_now().await;
            return Ok(cached);
        }

        self.emit(BlobEvent::Get {
            key: key.to_string(),
        });

        let started = Instant::now();
        let data = match self.remote.read(key.as_str()).await {
            Ok(data) => data,
            Err(e) if e.is_not_found() => {
                debug!(key = %key, "Blob not found in remote store");
                return Err(AppError::not_found("Blob not found."));
            }
            Err(e) => {
                error!(key = %key, error = %e, source = ?e.source, "Remote blob read failed");
                return Err(AppError::internal("Cannot read blob from BlobStore."));
            }
        };

        let size_bytes = data.len() as u64;
        self.cache.set(key.clone(), data.clone());
        self.emit(BlobEvent::GetOk {
            key: key.into_string(),
            size_bytes,
            elapsed_ms: elapsed_ms(started),
        });
        Ok(data)
    }

    async fn put_with_key(&self, key: BlobKey, data: Bytes) -> AppResult<()> {
        let size_bytes = data.len() as u64;
        self.emit(BlobEvent::Put {
            key: key.to_string(),
            size_bytes,
        });

        let started = Instant::now();
        if let Err(e) = self
            .remote
            .write(key.as_str(), data.clone(), size_bytes, BLOB_CONTENT_TYPE)
            .await
        {
            error!(key = %key, error = %e, source = ?e.source, "Remote blob write failed");
            return Err(AppError::internal("Cannot save blob to BlobStore."));
        }

        self.cache.set(key.clone(), data);
        self.emit(BlobEvent::PutOk {
            key: key.into_string(),
            size_bytes,
            elapsed_ms: elapsed_ms(started),
        });
        Ok(())
    }

    /// Hand an event to the sink, discarding any failure.
    fn emit(&self, event: BlobEvent) {
        if let Err(e) = self.events.record(&event) {
            trace!(event = event.event_type(), error = %e, "Event sink rejected event");
        }
    }
}

/// Lenient decoder for incoming blob data: padding is optional and
/// leftover bits in the final symbol are ignored.
const LENIENT_BASE64: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

/// Decode base64 blob data, skipping ASCII whitespace such as line breaks.
fn decode_blob(data: &str) -> AppResult<Bytes> {
    let decoded = if data.bytes().any(|b| b.is_ascii_whitespace()) {
        let compact: Vec<u8> = data
            .bytes()
            .filter(|b| !b.is_ascii_whitespace())
            .collect();
        LENIENT_BASE64.decode(compact)
    } else {
        LENIENT_BASE64.decode(data)
    };

    decoded
        .map(Bytes::from)
        .map_err(|e| AppError::validation(format!("Blob data is not valid base64: {e}")))
}

fn elapsed_ms(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
}
