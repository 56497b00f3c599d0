//! Shared domain types used across BlobHub crates.

pub mod id;

pub use id::AppId;
