//! Staging of uploads ahead of an entity mutation.
//!
//! Lifecycle services store uploads before persisting the entity that refers
//! to them. When the entity write fails, the staged blobs are discarded so
//! the operation leaves neither a half-created entity nor orphaned files.

use crate::storage::{
    domain::{BlobCategory, BlobRef, FileAttachment, Upload},
    ports::{BlobStore, BlobStoreResult},
};

/// Blobs written during one operation that have not been committed yet.
#[derive(Debug)]
#[must_use = "staged blobs must be committed or discarded"]
pub struct StagedBlobs<'a, B: BlobStore + ?Sized> {
    store: &'a B,
    staged: Vec<(BlobRef, BlobCategory)>,
}

impl<'a, B: BlobStore + ?Sized> StagedBlobs<'a, B> {
    /// Starts an empty staging set backed by `store`.
    pub const fn new(store: &'a B) -> Self {
        Self {
            store,
            staged: Vec::new(),
        }
    }

    /// Stores `upload` and remembers it for a later discard.
    ///
    /// # Errors
    ///
    /// Propagates the store failure; blobs staged earlier stay staged.
    pub async fn stage(
        &mut self,
        upload: &Upload,
        category: BlobCategory,
    ) -> BlobStoreResult<FileAttachment> {
        let reference = self.store.store(upload, category).await?;
        self.staged.push((reference.clone(), category));
        Ok(upload.attachment(reference))
    }

    /// Stores `upload` when present.
    ///
    /// # Errors
    ///
    /// Propagates the store failure.
    pub async fn stage_optional(
        &mut self,
        upload: Option<&Upload>,
        category: BlobCategory,
    ) -> BlobStoreResult<Option<FileAttachment>> {
        match upload {
            Some(file) => self.stage(file, category).await.map(Some),
            None => Ok(None),
        }
    }

    /// Returns the number of staged blobs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.staged.len()
    }

    /// Returns `true` when nothing has been staged.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.staged.is_empty()
    }

    /// Keeps the staged blobs; the entity now refers to them.
    pub fn commit(self) {
        if !self.staged.is_empty() {
            tracing::debug!(count = self.staged.len(), "committed staged blobs");
        }
    }

    /// Commits on success and discards on failure, passing `result` through.
    ///
    /// # Errors
    ///
    /// Returns `result` unchanged when it is an error.
    pub async fn settle<T, E>(self, result: Result<T, E>) -> Result<T, E> {
        match result {
            Ok(value) => {
                self.commit();
                Ok(value)
            }
            Err(err) => {
                self.discard().await;
                Err(err)
            }
        }
    }

    /// Deletes every staged blob. Failures are logged, not returned.
    pub async fn discard(self) {
        release_blobs(self.store, self.staged).await;
    }
}

/// Deletes blobs that are no longer referenced by any entity.
///
/// Failures are logged at `warn` and otherwise ignored: the owning entity
/// write has already been committed and must not be reported as failed.
pub async fn release_blobs<B>(store: &B, blobs: impl IntoIterator<Item = (BlobRef, BlobCategory)>)
where
    B: BlobStore + ?Sized,
{
    for (reference, category) in blobs {
        if let Err(err) = store.delete(&reference, category).await {
            tracing::warn!(%reference, %category, error = %err, "failed to release blob");
        }
    }
}
