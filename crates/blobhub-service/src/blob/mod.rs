//! Blob put/get use cases.

pub mod request;
pub mod store;

pub use request::{BlobGetRequest, BlobPutRequest};
pub use store::BlobStore;
