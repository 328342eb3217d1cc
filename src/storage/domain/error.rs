//! Error types for blob storage domain values.

use thiserror::Error;

/// Errors returned while constructing blob storage domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BlobDomainError {
    /// The reference is empty or would escape its category directory.
    #[error("invalid blob reference: '{0}'")]
    InvalidReference(String),

    /// The uploaded file carries no content.
    #[error("uploaded file '{0}' is empty")]
    EmptyUpload(String),
}

/// Error returned while parsing a blob category.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown blob category: {0}")]
pub struct ParseBlobCategoryError(pub String);
