//! Blob store port used by lifecycle services to persist uploaded files.

use crate::storage::domain::{BlobCategory, BlobRef, StoredBlob, Upload};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for blob store operations.
pub type BlobStoreResult<T> = Result<T, BlobStoreError>;

/// Blob persistence contract.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Stores the upload and returns a reference that resolves to it.
    ///
    /// References are unique per call even when file names repeat.
    ///
    /// # Errors
    ///
    /// Returns [`BlobStoreError::Io`] when the content cannot be written.
    async fn store(&self, upload: &Upload, category: BlobCategory) -> BlobStoreResult<BlobRef>;

    /// Deletes a stored blob. Deleting a missing blob is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`BlobStoreError::Io`] when the removal itself fails.
    async fn delete(&self, reference: &BlobRef, category: BlobCategory) -> BlobStoreResult<()>;

    /// Reads a stored blob back together with its content type.
    ///
    /// # Errors
    ///
    /// Returns [`BlobStoreError::NotFound`] when no blob exists under the
    /// reference, or [`BlobStoreError::Io`] when reading fails.
    async fn resolve(
        &self,
        reference: &BlobRef,
        category: BlobCategory,
    ) -> BlobStoreResult<StoredBlob>;
}

/// Errors returned by blob store implementations.
#[derive(Debug, Clone, Error)]
pub enum BlobStoreError {
    /// No blob exists under the reference.
    #[error("blob not found: {category}/{reference}")]
    NotFound {
        /// Reference that failed to resolve.
        reference: BlobRef,
        /// Category that was searched.
        category: BlobCategory,
    },

    /// Underlying storage failure.
    #[error("blob storage error: {0}")]
    Io(Arc<dyn std::error::Error + Send + Sync>),
}

impl BlobStoreError {
    /// Wraps an I/O or runtime error.
    pub fn io(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Io(Arc::new(err))
    }
}
