//! Filesystem blob store rooted at a capability-scoped directory.
//!
//! Every category gets its own subdirectory under the root. All access goes
//! through a [`cap_std`] directory handle, so references can never reach
//! outside the upload root.

use async_trait::async_trait;
use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use std::io;
use std::sync::Arc;

use crate::config::StorageSettings;
use crate::storage::{
    domain::{BlobCategory, BlobRef, StoredBlob, Upload, content_type_for},
    ports::{BlobStore, BlobStoreError, BlobStoreResult},
};

/// Blob store writing to a local directory tree.
#[derive(Debug, Clone)]
pub struct FilesystemBlobStore {
    root: Arc<Dir>,
}

impl FilesystemBlobStore {
    /// Opens (creating when needed) the upload root and its category
    /// directories.
    ///
    /// # Errors
    ///
    /// Returns [`BlobStoreError::Io`] when a directory cannot be created or
    /// opened.
    pub fn open(root: &Utf8Path) -> BlobStoreResult<Self> {
        Dir::create_ambient_dir_all(root, ambient_authority()).map_err(BlobStoreError::io)?;
        let dir = Dir::open_ambient_dir(root, ambient_authority()).map_err(BlobStoreError::io)?;
        for category in BlobCategory::ALL {
            dir.create_dir_all(category.directory())
                .map_err(BlobStoreError::io)?;
        }
        tracing::debug!(root = %root, "opened filesystem blob store");
        Ok(Self {
            root: Arc::new(dir),
        })
    }

    /// Opens the store at the configured upload directory.
    ///
    /// # Errors
    ///
    /// Same as [`Self::open`].
    pub fn from_settings(settings: &StorageSettings) -> BlobStoreResult<Self> {
        Self::open(&settings.upload_dir)
    }

    async fn run_blocking<F, T>(&self, f: F) -> BlobStoreResult<T>
    where
        F: FnOnce(&Dir) -> BlobStoreResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let root = Arc::clone(&self.root);
        tokio::task::spawn_blocking(move || f(&root))
            .await
            .map_err(BlobStoreError::io)?
    }
}

fn blob_path(reference: &BlobRef, category: BlobCategory) -> Utf8PathBuf {
    Utf8Path::new(category.directory()).join(reference.as_str())
}

#[async_trait]
impl BlobStore for FilesystemBlobStore {
    async fn store(&self, upload: &Upload, category: BlobCategory) -> BlobStoreResult<BlobRef> {
        let reference = BlobRef::generate(upload.file_name());
        let path = blob_path(&reference, category);
        let bytes = upload.bytes().to_vec();
        self.run_blocking(move |root| root.write(&path, bytes).map_err(BlobStoreError::io))
            .await?;
        tracing::debug!(%category, %reference, "stored blob");
        Ok(reference)
    }

    async fn delete(&self, reference: &BlobRef, category: BlobCategory) -> BlobStoreResult<()> {
        let path = blob_path(reference, category);
        self.run_blocking(move |root| match root.remove_file(&path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(BlobStoreError::io(err)),
        })
        .await
    }

    async fn resolve(
        &self,
        reference: &BlobRef,
        category: BlobCategory,
    ) -> BlobStoreResult<StoredBlob> {
        let path = blob_path(reference, category);
        let missing = BlobStoreError::NotFound {
            reference: reference.clone(),
            category,
        };
        let bytes = self
            .run_blocking(move |root| match root.read(&path) {
                Ok(bytes) => Ok(bytes),
                Err(err) if err.kind() == io::ErrorKind::NotFound => Err(missing),
                Err(err) => Err(BlobStoreError::io(err)),
            })
            .await?;
        Ok(StoredBlob {
            reference: reference.clone(),
            content_type: content_type_for(reference.extension()).to_owned(),
            bytes,
        })
    }
}
