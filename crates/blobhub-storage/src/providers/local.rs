//! Local filesystem object store.

use std::borrow::Cow;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use bytes::Bytes;
use tokio::fs;
use tracing::debug;

use blobhub_core::error::{AppError, ErrorKind};
use blobhub_core::result::AppResult;
use blobhub_core::traits::storage::ObjectStore;

/// Object store keeping each object as a file below a root directory.
#[derive(Debug, Clone)]
pub struct LocalObjectStore {
    /// Root directory for all stored objects.
    root: PathBuf,
}

impl LocalObjectStore {
    /// Create a new local object store rooted at the given path.
    pub async fn new(root_path: &str) -> AppResult<Self> {
        let root = PathBuf::from(root_path);
        fs::create_dir_all(&root).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to create storage root: {}", root.display()),
                e,
            )
        })?;
        Ok(Self { root })
    }

    /// Root directory of the store.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a key to a file below the root.
    ///
    /// Every `/`-separated segment becomes one path component. Segments the
    /// filesystem would interpret (`""`, `.`, `..`) and segments already
    /// starting with the escape marker are prefixed with `@`, so distinct
    /// keys always map to distinct files and no key leaves the root.
    fn resolve(&self, key: &str) -> AppResult<PathBuf> {
        if key.contains('\0') {
            return Err(AppError::storage(format!(
                "Key cannot be stored on the local filesystem: {key:?}"
            )));
        }

        let mut path = self.root.clone();
        for segment in key.split('/') {
            path.push(escape_segment(segment).as_ref());
        }
        Ok(path)
    }
}

/// Marker prepended to segments that cannot be used as file names verbatim.
const ESCAPE_MARKER: char = '@';

fn escape_segment(segment: &str) -> Cow<'_, str> {
    if matches!(segment, "" | "." | "..") || segment.starts_with(ESCAPE_MARKER) {
        Cow::Owned(format!("{ESCAPE_MARKER}{segment}"))
    } else {
        Cow::Borrowed(segment)
    }
}

/// Name of a not-yet-visible file next to `target`.
///
/// Always starts with the escape marker followed by a segment that
/// [`escape_segment`] never produces, so it cannot clash with a stored key.
fn staging_path(target: &Path) -> PathBuf {
    static NEXT: AtomicU64 = AtomicU64::new(0);
    let n = NEXT.fetch_add(1, Ordering::Relaxed);
    target.with_file_name(format!("{ESCAPE_MARKER}tmp-{}-{n}", std::process::id()))
}

#[async_trait]
impl ObjectStore for LocalObjectStore {
    fn provider_type(&self) -> &str {
        "local"
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(fs::metadata(&self.root)
            .await
            .map(|m| m.is_dir())
            .unwrap_or(false))
    }

    async fn write(
        &self,
        key: &str,
        data: Bytes,
        content_length: u64,
        content_type: &str,
    ) -> AppResult<()> {
        if data.len() as u64 != content_length {
            return Err(AppError::storage(format!(
                "Content length mismatch for '{key}': declared {content_length}, got {}",
                data.len()
            )));
        }

        let full_path = self.resolve(key)?;
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).await.map_err(|e| {
                AppError::with_source(
                    ErrorKind::Storage,
                    format!("Failed to create parent directory: {}", parent.display()),
                    e,
                )
            })?;
        }

        // Readers only ever see a complete file: write aside, then rename.
        let staging = staging_path(&full_path);
        if let Err(e) = fs::write(&staging, &data).await {
            let _ = fs::remove_file(&staging).await;
            return Err(AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to write object: {key}"),
                e,
            ));
        }
        if let Err(e) = fs::rename(&staging, &full_path).await {
            let _ = fs::remove_file(&staging).await;
            return Err(AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to move object into place: {key}"),
                e,
            ));
        }

        debug!(key, bytes = data.len(), content_type, "Wrote object");
        Ok(())
    }

    async fn read(&self, key: &str) -> AppResult<Bytes> {
        let full_path = self.resolve(key)?;
        let data = fs::read(&full_path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                AppError::not_found(format!("Object not found: {key}"))
            } else {
                AppError::with_source(
                    ErrorKind::Storage,
                    format!("Failed to read object: {key}"),
                    e,
                )
            }
        })?;
        Ok(Bytes::from(data))
    }
}
