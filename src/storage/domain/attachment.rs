//! Upload payloads and the file metadata kept on entity records.

use super::{BlobDomainError, BlobRef};
use serde::{Deserialize, Serialize};

/// File content handed to the storage layer by a caller.
#[derive(Clone, PartialEq, Eq)]
pub struct Upload {
    file_name: String,
    content_type: Option<String>,
    bytes: Vec<u8>,
}

impl Upload {
    /// Creates an upload from its original file name and content.
    ///
    /// # Errors
    ///
    /// Returns [`BlobDomainError::EmptyUpload`] when `bytes` is empty.
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Result<Self, BlobDomainError> {
        let name = file_name.into();
        if bytes.is_empty() {
            return Err(BlobDomainError::EmptyUpload(name));
        }
        Ok(Self {
            file_name: name,
            content_type: None,
            bytes,
        })
    }

    /// Sets the content type declared by the client.
    #[must_use]
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Returns the original file name.
    #[must_use]
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Returns the declared content type, if any.
    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    /// Returns the file content.
    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Returns the content length in bytes.
    #[must_use]
    pub fn size(&self) -> u64 {
        u64::try_from(self.bytes.len()).unwrap_or(u64::MAX)
    }

    /// Describes this upload once stored under `reference`.
    #[must_use]
    pub fn attachment(&self, reference: BlobRef) -> FileAttachment {
        FileAttachment {
            file_name: self.file_name.clone(),
            reference,
            content_type: self.content_type.clone(),
            size: self.size(),
        }
    }
}

impl std::fmt::Debug for Upload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Upload")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("size", &self.bytes.len())
            .finish()
    }
}

/// Metadata kept on an entity for a stored file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileAttachment {
    /// Name the file was uploaded with.
    pub file_name: String,
    /// Reference under which the blob was stored.
    pub reference: BlobRef,
    /// Content type declared at upload time.
    pub content_type: Option<String>,
    /// Size of the stored content in bytes.
    pub size: u64,
}

/// Blob content returned when a reference is resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredBlob {
    /// Reference that was resolved.
    pub reference: BlobRef,
    /// Content type inferred from the reference extension.
    pub content_type: String,
    /// Stored content.
    pub bytes: Vec<u8>,
}
