//! Storage categories.

use super::ParseBlobCategoryError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Category a blob is stored under.
///
/// Each category maps to its own directory so that references from different
/// workflows never collide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlobCategory {
    /// File attached by a supervisor when creating a task.
    TaskAttachment,
    /// File attached by a student to a task response.
    ResponseAttachment,
    /// CV or motivation letter submitted with an application.
    ApplicationDocument,
    /// Transcript, recommendation, or portfolio submitted after approval.
    IdentityDocument,
}

impl BlobCategory {
    /// Every category, in declaration order.
    pub const ALL: [Self; 4] = [
        Self::TaskAttachment,
        Self::ResponseAttachment,
        Self::ApplicationDocument,
        Self::IdentityDocument,
    ];

    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::TaskAttachment => "task_attachment",
            Self::ResponseAttachment => "response_attachment",
            Self::ApplicationDocument => "application_document",
            Self::IdentityDocument => "identity_document",
        }
    }

    /// Returns the directory name blobs of this category live in.
    #[must_use]
    pub const fn directory(self) -> &'static str {
        match self {
            Self::TaskAttachment => "tasks",
            Self::ResponseAttachment => "responses",
            Self::ApplicationDocument => "applications",
            Self::IdentityDocument => "documents",
        }
    }
}

impl fmt::Display for BlobCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for BlobCategory {
    type Error = ParseBlobCategoryError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase().replace('-', "_");
        match normalized.as_str() {
            "task_attachment" | "task" => Ok(Self::TaskAttachment),
            "response_attachment" | "response" => Ok(Self::ResponseAttachment),
            "application_document" | "application" => Ok(Self::ApplicationDocument),
            "identity_document" | "document" => Ok(Self::IdentityDocument),
            _ => Err(ParseBlobCategoryError(value.to_owned())),
        }
    }
}
