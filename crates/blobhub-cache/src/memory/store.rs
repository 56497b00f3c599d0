//! Byte-bounded LRU blob cache.

use bytes::Bytes;
use lru::LruCache;
use parking_lot::Mutex;
use tracing::debug;

use blobhub_core::config::blob_store::BlobStoreConfig;

use crate::keys::BlobKey;

/// Point-in-time view of the cache counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CacheStats {
    /// Resident entries.
    pub entries: usize,
    /// Bytes charged against the capacity (`key + blob` per entry).
    pub occupied_bytes: u64,
    /// Configured capacity in bytes.
    pub capacity_bytes: u64,
    /// Lookups that found an entry.
    pub hits: u64,
    /// Lookups that found nothing.
    pub misses: u64,
    /// Entries dropped to honour the capacity.
    pub evictions: u64,
}

/// In-memory blob cache bounded by the total size of its entries.
///
/// Every entry costs `key.len() + blob.len()` bytes. After each insert the
/// least recently used entries are evicted until the total fits the
/// capacity again. The entry just inserted is never evicted, so a single
/// blob larger than the whole capacity stays resident on its own.
///
/// A capacity of zero disables the cache entirely.
///
/// The map and its byte counter sit behind one mutex that is only held for
/// the duration of a single lookup or insert.
#[derive(Debug)]
pub struct BlobCache {
    capacity_bytes: u64,
    inner: Mutex<Inner>,
}

#[derive(Debug)]
struct Inner {
    entries: LruCache<BlobKey, Bytes>,
    occupied_bytes: u64,
    hits: u64,
    misses: u64,
    evictions: u64,
}

impl BlobCache {
    /// Create a cache holding at most `capacity_bytes` bytes.
    pub fn new(capacity_bytes: u64) -> Self {
        Self {
            capacity_bytes,
            inner: Mutex::new(Inner {
                entries: LruCache::unbounded(),
                occupied_bytes: 0,
                hits: 0,
                misses: 0,
                evictions: 0,
            }),
        }
    }

    /// Create a cache sized from the blob store configuration.
    pub fn from_config(config: &BlobStoreConfig) -> Self {
        Self::new(config.local_cache_size_bytes)
    }

    /// Whether caching is switched off (capacity of zero).
    pub fn is_disabled(&self) -> bool {
        self.capacity_bytes == 0
    }

    /// Look up a blob, marking it as most recently used.
    pub fn get(&self, key: &str) -> Option<Bytes> {
        if self.is_disabled() {
            return None;
        }

        let mut inner = self.inner.lock();
        let found = inner.entries.get(key).cloned();
        match found {
            Some(blob) => {
                inner.hits += 1;
                Some(blob)
            }
            None => {
                inner.misses += 1;
                None
            }
        }
    }

    /// Check for a key without touching its recency.
    pub fn contains(&self, key: &str) -> bool {
        self.inner.lock().entries.contains(key)
    }

    /// Insert or replace a blob, then evict down to the capacity.
    pub fn set(&self, key: BlobKey, blob: Bytes) {
        if self.is_disabled() {
            return;
        }

        let cost = entry_cost(&key, &blob);
        let mut inner = self.inner.lock();

        if let Some((old_key, old_blob)) = inner.entries.push(key, blob) {
            inner.occupied_bytes -= entry_cost(&old_key, &old_blob);
        }
        inner.occupied_bytes += cost;

        while inner.occupied_bytes > self.capacity_bytes && inner.entries.len() > 1 {
            let Some((evicted_key, evicted_blob)) = inner.entries.pop_lru() else {
                break;
            };
            inner.occupied_bytes -= entry_cost(&evicted_key, &evicted_blob);
            inner.evictions += 1;
            debug!(key = %evicted_key, bytes = evicted_blob.len(), "Evicted cached blob");
        }
    }

    /// Drop a single entry. Returns the removed blob, if any.
    pub fn remove(&self, key: &str) -> Option<Bytes> {
        let mut inner = self.inner.lock();
        let (removed_key, blob) = inner.entries.pop_entry(key)?;
        inner.occupied_bytes -= entry_cost(&removed_key, &blob);
        Some(blob)
    }

    /// Drop every entry. Counters other than occupancy are kept.
    pub fn clear(&self) {
        let mut inner = self.inner.lock();
        inner.entries.clear();
        inner.occupied_bytes = 0;
    }

    /// Number of resident entries.
    pub fn len(&self) -> usize {
        self.inner.lock().entries.len()
    }

    /// Whether the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Bytes currently charged against the capacity.
    pub fn occupied_bytes(&self) -> u64 {
        self.inner.lock().occupied_bytes
    }

    /// Configured capacity in bytes.
    pub fn capacity_bytes(&self) -> u64 {
        self.capacity_bytes
    }

    /// Resident keys ordered from least to most recently used.
    pub fn keys_by_recency(&self) -> Vec<BlobKey> {
        let inner = self.inner.lock();
        inner.entries.iter().rev().map(|(k, _)| k.clone()).collect()
    }

    /// Snapshot the cache counters.
    pub fn stats(&self) -> CacheStats {
        let inner = self.inner.lock();
        CacheStats {
            entries: inner.entries.len(),
            occupied_bytes: inner.occupied_bytes,
            capacity_bytes: self.capacity_bytes,
            hits: inner.hits,
            misses: inner.misses,
            evictions: inner.evictions,
        }
    }
}

/// Capacity charged for one entry.
fn entry_cost(key: &BlobKey, blob: &Bytes) -> u64 {
    (key.len() + blob.len()) as u64
}
