//! Port contracts for blob storage.

pub mod blob_store;

pub use blob_store::{BlobStore, BlobStoreError, BlobStoreResult};
