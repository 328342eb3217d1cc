//! Opaque references to stored blobs.

use super::BlobDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Collision-safe name of a stored blob within its category.
///
/// References never contain path separators, so resolving one cannot leave
/// the category directory.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlobRef(String);

impl BlobRef {
    /// Parses a previously issued reference.
    ///
    /// # Errors
    ///
    /// Returns [`BlobDomainError::InvalidReference`] when the value is empty,
    /// is `.` or `..`, or contains a path separator or NUL byte.
    pub fn parse(value: impl Into<String>) -> Result<Self, BlobDomainError> {
        let raw = value.into();
        let is_valid = !raw.is_empty()
            && raw != "."
            && raw != ".."
            && !raw.contains(['/', '\\', '\0']);
        if !is_valid {
            return Err(BlobDomainError::InvalidReference(raw));
        }
        Ok(Self(raw))
    }

    /// Issues a fresh reference derived from an uploaded file name.
    ///
    /// The stem keeps only `[A-Za-z0-9.-]` (everything else becomes `_`) and
    /// a random suffix is inserted before the extension, so two uploads with
    /// the same original name never share a reference.
    #[must_use]
    pub fn generate(original_file_name: &str) -> Self {
        let sanitized: String = original_file_name
            .chars()
            .map(|ch| {
                if ch.is_ascii_alphanumeric() || ch == '.' || ch == '-' {
                    ch
                } else {
                    '_'
                }
            })
            .collect();
        let suffix = Uuid::new_v4().simple();
        let reference = match sanitized.rsplit_once('.') {
            Some((stem, extension)) if !stem.is_empty() && !extension.is_empty() => {
                format!("{stem}_{suffix}.{extension}")
            }
            Some((_, extension)) if !extension.is_empty() => format!("file_{suffix}.{extension}"),
            _ if sanitized.trim_matches('.').is_empty() => format!("file_{suffix}"),
            _ => format!("{}_{suffix}", sanitized.trim_end_matches('.')),
        };
        Self(reference)
    }

    /// Returns the extension of the reference, if any.
    #[must_use]
    pub fn extension(&self) -> Option<&str> {
        self.0
            .rsplit_once('.')
            .map(|(_, extension)| extension)
            .filter(|extension| !extension.is_empty())
    }

    /// Returns the reference as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for BlobRef {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for BlobRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
