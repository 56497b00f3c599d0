//! Storage key derivation for blobs.
//!
//! A blob lives at `{app_id}/{encoded tag}`. The application id is rendered
//! in canonical decimal form and the tag is percent-encoded, so the `/`
//! separator appears exactly once in every key and two distinct
//! `(app_id, tag)` pairs never share a key.

use std::borrow::Borrow;
use std::fmt;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

use blobhub_core::types::AppId;

/// Separator between the application id and the encoded tag.
const SEPARATOR: char = '/';

/// Characters left untouched in tags: ASCII alphanumerics plus
/// `- _ . ! ~ * ' ( )`. Everything else, `/` and `%` included, is escaped.
const TAG_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Canonical storage key of a blob.
///
/// Keys are opaque once derived: they are compared, hashed and sent to the
/// remote store verbatim, never split back into their parts.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlobKey(String);

impl BlobKey {
    /// The key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Length of the key in bytes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the key is empty. Derived keys never are.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Consume the key, returning the inner string.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for BlobKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for BlobKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for BlobKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<BlobKey> for String {
    fn from(key: BlobKey) -> String {
        key.0
    }
}

/// Derive the storage key for a blob owned by `app_id` with content tag `tag`.
pub fn derive_key(app_id: AppId, tag: &str) -> BlobKey {
    let encoded = utf8_percent_encode(tag, TAG_ENCODE_SET);
    BlobKey(format!("{app_id}{SEPARATOR}{encoded}"))
}
