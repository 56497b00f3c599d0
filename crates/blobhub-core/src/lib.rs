//! # blobhub-core
//!
//! Core crate for BlobHub. Contains the collaborator traits (remote object
//! store, event sink), configuration schemas, typed identifiers, blob
//! events, and the unified error system.
//!
//! This crate has **no** internal dependencies on other BlobHub crates.

pub mod config;
pub mod error;
pub mod events;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
