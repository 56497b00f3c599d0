//! Behavioural tests for the cache-augmented blob store.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use bytes::Bytes;

use blobhub_cache::memory::BlobCache;
use blobhub_core::config::AppConfig;
use blobhub_core::error::{AppError, ErrorKind};
use blobhub_core::events::BlobEvent;
use blobhub_core::result::AppResult;
use blobhub_core::traits::events::EventSink;
use blobhub_core::traits::storage::{BLOB_CONTENT_TYPE, ObjectStore};
use blobhub_core::types::AppId;
use blobhub_service::{BlobGetRequest, BlobPutRequest, BlobStore};

/// In-memory object store that counts remote calls.
#[derive(Debug, Default)]
struct CountingStore {
    objects: Mutex<HashMap<String, Bytes>>,
    content_types: Mutex<Vec<String>>,
    reads: AtomicUsize,
    writes: AtomicUsize,
    fail_writes: AtomicBool,
    fail_reads: AtomicBool,
}

impl CountingStore {
    fn seed(&self, key: &str, data: &'static [u8]) {
        self.objects
            .lock()
            .unwrap()
            .insert(key.to_string(), Bytes::from_static(data));
    }

    fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ObjectStore for CountingStore {
    fn provider_type(&self) -> &str {
        "counting"
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }

    async fn write(
        &self,
        key: &str,
        data: Bytes,
        content_length: u64,
        content_type: &str,
    ) -> AppResult<()> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(AppError::storage("AccessDenied: bucket policy forbids writes"));
        }
        assert_eq!(data.len() as u64, content_length);
        self.content_types
            .lock()
            .unwrap()
            .push(content_type.to_string());
        self.objects.lock().unwrap().insert(key.to_string(), data);
        Ok(())
    }

    async fn read(&self, key: &str) -> AppResult<Bytes> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(AppError::storage("connection reset by peer at 10.0.0.7"));
        }
        self.objects
            .lock()
            .unwrap()
            .get(key)
            .cloned()
            .ok_or_else(|| AppError::not_found(format!("Object not found: {key}")))
    }
}

/// Sink that remembers every event type it saw.
#[derive(Debug, Default)]
struct RecordingSink {
    events: Mutex<Vec<BlobEvent>>,
}

impl RecordingSink {
    fn types(&self) -> Vec<&'static str> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .map(BlobEvent::event_type)
            .collect()
    }

    fn take(&self) -> Vec<BlobEvent> {
        std::mem::take(&mut *self.events.lock().unwrap())
    }
}

impl EventSink for RecordingSink {
    fn record(&self, event: &BlobEvent) -> AppResult<()> {
        self.events.lock().unwrap().push(event.clone());
        Ok(())
    }
}

/// Sink that fails on every call.
#[derive(Debug)]
struct BrokenSink;

impl EventSink for BrokenSink {
    fn record(&self, _event: &BlobEvent) -> AppResult<()> {
        Err(AppError::internal("event pipeline is down"))
    }
}

struct Harness {
    store: BlobStore,
    remote: Arc<CountingStore>,
    sink: Arc<RecordingSink>,
}

fn harness(capacity_bytes: u64) -> Harness {
    let remote = Arc::new(CountingStore::default());
    let sink = Arc::new(RecordingSink::default());
    let store = BlobStore::new(
        remote.clone(),
        Arc::new(BlobCache::new(capacity_bytes)),
        sink.clone(),
    );
    Harness {
        store,
        remote,
        sink,
    }
}

const APP: AppId = AppId::new(7);

#[tokio::test]
async fn test_put_then_get_is_served_from_cache() {
    let h = harness(1024);
    let data = Bytes::from_static(&[1, 2, 3, 4, 5]);

    h.store.put_bytes(APP, "x", data.clone()).await.unwrap();
    assert_eq!(h.remote.writes(), 1);
    assert_eq!(
        h.remote.content_types.lock().unwrap().as_slice(),
        [BLOB_CONTENT_TYPE]
    );

    let fetched = h.store.get_bytes(APP, "x").await.unwrap();
    assert_eq!(fetched, data);
    assert_eq!(h.remote.reads(), 0);
}

#[tokio::test]
async fn test_base64_put_get_roundtrip() {
    let h = harness(1024);
    let encoded = BASE64.encode([0u8, 255, 16, 32, 64]);

    h.store.put(APP, "x", &encoded).await.unwrap();
    assert_eq!(h.store.get(APP, "x").await.unwrap(), encoded);
    assert_eq!(h.remote.reads(), 0);
}

#[tokio::test]
async fn test_request_payloads() {
    let h = harness(1024);
    let put: BlobPutRequest =
        serde_json::from_str(r#"{"appId":"007","etag":"sha1:abc/def","data":"aGVsbG8="}"#)
            .unwrap();
    h.store.put_request(&put).await.unwrap();

    let get: BlobGetRequest = serde_json::from_str(r#"{"appId":7,"etag":"sha1:abc/def"}"#).unwrap();
    assert_eq!(h.store.get_request(&get).await.unwrap(), "aGVsbG8=");
    assert!(h.remote.objects.lock().unwrap().contains_key("7/sha1%3Aabc%2Fdef"));
}

#[tokio::test]
async fn test_invalid_base64_is_rejected_before_remote_write() {
    let h = harness(1024);
    let err = h.store.put(APP, "x", "%%% not base64 %%%").await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);
    assert_eq!(h.remote.writes(), 0);
    assert!(h.sink.types().is_empty());
}

#[tokio::test]
async fn test_read_through_populates_cache() {
    let h = harness(1024);
    h.remote.seed("7/x", b"remote");

    let first = h.store.get_bytes(APP, "x").await.unwrap();
    assert_eq!(first, Bytes::from_static(b"remote"));
    assert_eq!(h.remote.reads(), 1);

    let second = h.store.get_bytes(APP, "x").await.unwrap();
    assert_eq!(second, first);
    assert_eq!(h.remote.reads(), 1);
}

#[tokio::test]
async fn test_missing_blob_is_not_found_and_not_cached() {
    let h = harness(1024);

    let err = h.store.get(APP, "missing").await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
    assert_eq!(err.message, "Blob not found.");
    assert!(h.store.cache().is_empty());

    let err = h.store.get(APP, "missing").await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
    assert_eq!(h.remote.reads(), 2);
}

#[tokio::test]
async fn test_remote_read_failure_is_internal_without_details() {
    let h = harness(1024);
    h.remote.seed("7/x", b"data");
    h.remote.fail_reads.store(true, Ordering::SeqCst);

    let err = h.store.get(APP, "x").await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Internal);
    assert!(!err.message.contains("10.0.0.7"));
    assert!(err.source.is_none());
    assert!(h.store.cache().is_empty());
}

#[tokio::test]
async fn test_remote_write_failure_leaves_cache_untouched() {
    let h = harness(1024);
    h.remote.fail_writes.store(true, Ordering::SeqCst);

    let err = h
        .store
        .put_bytes(APP, "x", Bytes::from_static(b"data"))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Internal);
    assert_eq!(err.message, "Cannot save blob to BlobStore.");
    assert!(!err.message.contains("AccessDenied"));
    assert!(h.store.cache().is_empty());
    assert_eq!(h.sink.types(), ["put"]);

    let err = h.store.get(APP, "x").await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
    assert_eq!(h.remote.reads(), 1);
}

#[tokio::test]
async fn test_event_sequence() {
    let h = harness(1024);
    h.remote.seed("7/y", b"abc");

    h.store
        .put_bytes(APP, "x", Bytes::from_static(b"12345"))
        .await
        .unwrap();
    let events = h.sink.take();
    assert_eq!(events.len(), 2);
    assert_eq!(
        events[0],
        BlobEvent::Put {
            key: "7/x".into(),
            size_bytes: 5
        }
    );
    assert!(matches!(
        &events[1],
        BlobEvent::PutOk { key, size_bytes: 5, .. } if key == "7/x"
    ));

    h.store.get_bytes(APP, "x").await.unwrap();
    assert_eq!(
        h.sink.take(),
        [BlobEvent::GetCached {
            key: "7/x".into(),
            size_bytes: 5
        }]
    );

    h.store.get_bytes(APP, "y").await.unwrap();
    let events = h.sink.take();
    assert_eq!(events[0], BlobEvent::Get { key: "7/y".into() });
    assert!(matches!(
        &events[1],
        BlobEvent::GetOk { key, size_bytes: 3, .. } if key == "7/y"
    ));

    let _ = h.store.get_bytes(APP, "nope").await;
    assert_eq!(h.sink.types(), ["get"]);
}

#[tokio::test]
async fn test_failing_event_sink_does_not_affect_operations() {
    let remote = Arc::new(CountingStore::default());
    let store = BlobStore::new(
        remote.clone(),
        Arc::new(BlobCache::new(1024)),
        Arc::new(BrokenSink),
    );

    store
        .put_bytes(APP, "x", Bytes::from_static(b"data"))
        .await
        .unwrap();
    assert_eq!(
        store.get_bytes(APP, "x").await.unwrap(),
        Bytes::from_static(b"data")
    );
    assert_eq!(
        store.get(APP, "other").await.unwrap_err().kind,
        ErrorKind::NotFound
    );
}

#[tokio::test]
async fn test_cache_hit_does_not_complete_on_first_poll() {
    let h = harness(1024);
    h.store
        .put_bytes(APP, "x", Bytes::from_static(b"data"))
        .await
        .unwrap();

    let mut fut = Box::pin(h.store.get_bytes(APP, "x"));
    assert!(futures::poll!(&mut fut).is_pending());
    assert_eq!(fut.await.unwrap(), Bytes::from_static(b"data"));
    assert_eq!(h.remote.reads(), 0);
}

#[tokio::test]
async fn test_lru_eviction_through_store() {
    // Keys "1/a", "1/b", "1/c" with 1-byte blobs cost 4 bytes each.
    let h = harness(10);
    let app = AppId::new(1);
    for tag in ["a", "b", "c"] {
        h.store
            .put_bytes(app, tag, Bytes::from_static(b"z"))
            .await
            .unwrap();
    }

    let cache = h.store.cache();
    assert!(!cache.contains("1/a"));
    assert!(cache.contains("1/b"));
    assert!(cache.contains("1/c"));
    assert!(cache.occupied_bytes() <= 10);

    h.store.get_bytes(app, "a").await.unwrap();
    assert_eq!(h.remote.reads(), 1);
    assert!(!cache.contains("1/b"));
}

#[tokio::test]
async fn test_capacity_bound_across_mixed_operations() {
    let h = harness(64);
    for i in 0..50u8 {
        let tag = format!("t{i}");
        let data = Bytes::from(vec![i; usize::from(i % 20)]);
        h.store
            .put_bytes(AppId::new(i64::from(i % 3)), &tag, data)
            .await
            .unwrap();
        let _ = h
            .store
            .get_bytes(AppId::new(i64::from(i % 3)), &format!("t{}", i / 2))
            .await;
        assert!(h.store.cache().occupied_bytes() <= 64);
    }
}

#[tokio::test]
async fn test_zero_capacity_always_reads_remote() {
    let h = harness(0);
    h.store
        .put_bytes(APP, "x", Bytes::from_static(b"data"))
        .await
        .unwrap();

    for _ in 0..3 {
        h.store.get_bytes(APP, "x").await.unwrap();
    }
    assert_eq!(h.remote.reads(), 3);
    assert!(h.store.cache().is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_gets_share_one_cache() {
    let h = harness(4096);
    for i in 0..16 {
        h.store
            .put_bytes(APP, &format!("k{i}"), Bytes::from(vec![i as u8; 32]))
            .await
            .unwrap();
    }

    let mut tasks = Vec::new();
    for i in 0..64 {
        let store = h.store.clone();
        tasks.push(tokio::spawn(async move {
            let tag = format!("k{}", i % 16);
            store.get_bytes(APP, &tag).await.map(|b| (i % 16, b))
        }));
    }
    for task in tasks {
        let (i, data) = task.await.unwrap().unwrap();
        assert_eq!(data, Bytes::from(vec![i as u8; 32]));
    }
    assert_eq!(h.remote.reads(), 0);
}

#[tokio::test]
async fn test_independent_stores_do_not_share_cache() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("blobs");
    let toml = format!(
        "[blob_store]\nprovider = \"local\"\n[blob_store.local]\nroot_path = {:?}\n",
        root.to_string_lossy()
    );
    let config = AppConfig::from_toml_str(&toml).unwrap();

    let first = BlobStore::from_config(&config).await.unwrap();
    first
        .put_bytes(APP, "shared", Bytes::from_static(b"on disk"))
        .await
        .unwrap();
    assert_eq!(first.cache().len(), 1);

    let second = BlobStore::from_config(&config).await.unwrap();
    assert!(second.cache().is_empty());
    assert_eq!(
        second.get_bytes(APP, "shared").await.unwrap(),
        Bytes::from_static(b"on disk")
    );
    assert_eq!(second.cache().len(), 1);
}

#[tokio::test]
async fn test_put_accepts_unpadded_and_wrapped_base64() {
    let h = harness(1024);

    h.store.put(APP, "x", "aGVsbG8").await.unwrap();
    h.store.put(APP, "y", "aGVs\nbG8=").await.unwrap();

    assert_eq!(h.store.get(APP, "x").await.unwrap(), "aGVsbG8=");
    assert_eq!(h.store.get(APP, "y").await.unwrap(), "aGVsbG8=");
    assert_eq!(h.remote.writes(), 2);
}

#[tokio::test]
async fn test_dot_and_empty_tags_on_local_store() {
    let dir = tempfile::tempdir().unwrap();
    let toml = format!(
        "[blob_store]\nprovider = \"local\"\n[blob_store.local]\nroot_path = {:?}\n",
        dir.path().join("blobs").to_string_lossy()
    );
    let config = AppConfig::from_toml_str(&toml).unwrap();
    let writer = BlobStore::from_config(&config).await.unwrap();

    for tag in ["", ".", ".."] {
        writer
            .put_bytes(APP, tag, Bytes::from(format!("tag {tag:?}")))
            .await
            .unwrap();
    }

    let reader = BlobStore::from_config(&config).await.unwrap();
    for tag in ["", ".", ".."] {
        assert_eq!(
            reader.get_bytes(APP, tag).await.unwrap(),
            Bytes::from(format!("tag {tag:?}"))
        );
        let err = reader.get_bytes(AppId::new(8), tag).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound, "tag {tag:?}");
    }
}
