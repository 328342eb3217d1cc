//! In-memory blob store for tests and ephemeral deployments.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::storage::{
    domain::{BlobCategory, BlobRef, StoredBlob, Upload, content_type_for},
    ports::{BlobStore, BlobStoreError, BlobStoreResult},
};

/// Thread-safe in-memory blob store.
#[derive(Debug, Clone, Default)]
pub struct InMemoryBlobStore {
    blobs: Arc<RwLock<HashMap<(BlobCategory, BlobRef), Vec<u8>>>>,
}

impl InMemoryBlobStore {
    /// Creates an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of blobs currently held in `category`.
    ///
    /// # Errors
    ///
    /// Returns [`BlobStoreError::Io`] when the internal lock is poisoned.
    pub fn len(&self, category: BlobCategory) -> BlobStoreResult<usize> {
        let blobs = self
            .blobs
            .read()
            .map_err(|err| BlobStoreError::io(std::io::Error::other(err.to_string())))?;
        Ok(blobs.keys().filter(|(cat, _)| *cat == category).count())
    }

    /// Returns `true` when a blob is stored under the reference.
    ///
    /// # Errors
    ///
    /// Returns [`BlobStoreError::Io`] when the internal lock is poisoned.
    pub fn contains(&self, reference: &BlobRef, category: BlobCategory) -> BlobStoreResult<bool> {
        let blobs = self
            .blobs
            .read()
            .map_err(|err| BlobStoreError::io(std::io::Error::other(err.to_string())))?;
        Ok(blobs.contains_key(&(category, reference.clone())))
    }
}

#[async_trait]
impl BlobStore for InMemoryBlobStore {
    async fn store(&self, upload: &Upload, category: BlobCategory) -> BlobStoreResult<BlobRef> {
        let mut blobs = self
            .blobs
            .write()
            .map_err(|err| BlobStoreError::io(std::io::Error::other(err.to_string())))?;
        let reference = BlobRef::generate(upload.file_name());
        blobs.insert((category, reference.clone()), upload.bytes().to_vec());
        Ok(reference)
    }

    async fn delete(&self, reference: &BlobRef, category: BlobCategory) -> BlobStoreResult<()> {
        let mut blobs = self
            .blobs
            .write()
            .map_err(|err| BlobStoreError::io(std::io::Error::other(err.to_string())))?;
        blobs.remove(&(category, reference.clone()));
        Ok(())
    }

    async fn resolve(
        &self,
        reference: &BlobRef,
        category: BlobCategory,
    ) -> BlobStoreResult<StoredBlob> {
        let blobs = self
            .blobs
            .read()
            .map_err(|err| BlobStoreError::io(std::io::Error::other(err.to_string())))?;
        let bytes = blobs
            .get(&(category, reference.clone()))
            .cloned()
            .ok_or_else(|| BlobStoreError::NotFound {
                reference: reference.clone(),
                category,
            })?;
        Ok(StoredBlob {
            reference: reference.clone(),
            content_type: content_type_for(reference.extension()).to_owned(),
            bytes,
        })
    }
}
