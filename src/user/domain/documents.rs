//! Application and completion documents held on student records.

use super::UserDomainError;
use crate::storage::domain::FileAttachment;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Completion document that must be present before a student can be
/// assigned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequiredDocument {
    /// Academic transcript.
    Transcript,
    /// Letter of recommendation.
    Recommendation,
}

impl fmt::Display for RequiredDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Transcript => "transcript",
            Self::Recommendation => "recommendation",
        })
    }
}

/// Checks that both required completion documents are supplied.
///
/// # Errors
///
/// Returns [`UserDomainError::MissingRequiredDocument`] naming the first
/// absent document.
pub const fn require_documents<T>(
    transcript: Option<&T>,
    recommendation: Option<&T>,
) -> Result<(), UserDomainError> {
    if transcript.is_none() {
        return Err(UserDomainError::MissingRequiredDocument(
            RequiredDocument::Transcript,
        ));
    }
    if recommendation.is_none() {
        return Err(UserDomainError::MissingRequiredDocument(
            RequiredDocument::Recommendation,
        ));
    }
    Ok(())
}

/// Files submitted together with an application.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationDocuments {
    /// Curriculum vitae.
    pub cv: Option<FileAttachment>,
    /// Motivation letter.
    pub motivation_letter: Option<FileAttachment>,
}

impl ApplicationDocuments {
    /// Returns `true` when no application file is held.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.cv.is_none() && self.motivation_letter.is_none()
    }

    /// Iterates over the held application files.
    pub fn attachments(&self) -> impl Iterator<Item = &FileAttachment> {
        self.cv.iter().chain(self.motivation_letter.iter())
    }
}

/// Files submitted after the application was approved.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionDocuments {
    /// Academic transcript.
    pub transcript: Option<FileAttachment>,
    /// Letter of recommendation.
    pub recommendation: Option<FileAttachment>,
    /// Optional portfolio.
    pub portfolio: Option<FileAttachment>,
}

impl CompletionDocuments {
    /// Iterates over the held completion files.
    pub fn attachments(&self) -> impl Iterator<Item = &FileAttachment> {
        self.transcript
            .iter()
            .chain(self.recommendation.iter())
            .chain(self.portfolio.iter())
    }
}
