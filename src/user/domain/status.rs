//! User lifecycle status.

use super::ParseUserStatusError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle status of a user.
///
/// Students move `Pending → DocumentsPending → ReadyForAssignment →
/// Approved`, or end in `Rejected` from either of the first two states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserStatus {
    /// Application submitted, awaiting admin review.
    Pending,
    /// Application approved, completion documents outstanding.
    DocumentsPending,
    /// Documents complete, awaiting supervisor assignment.
    ReadyForAssignment,
    /// Assigned to a supervisor; always the status of non-students.
    Approved,
    /// Application rejected.
    Rejected,
}

impl UserStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::DocumentsPending => "documents_pending",
            Self::ReadyForAssignment => "ready_for_assignment",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }

    /// Returns `true` while the application can still be rejected.
    #[must_use]
    pub const fn is_under_review(self) -> bool {
        matches!(self, Self::Pending | Self::DocumentsPending)
    }
}

impl fmt::Display for UserStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for UserStatus {
    type Error = ParseUserStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "pending" => Ok(Self::Pending),
            "documents_pending" => Ok(Self::DocumentsPending),
            "ready_for_assignment" => Ok(Self::ReadyForAssignment),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            _ => Err(ParseUserStatusError(value.to_owned())),
        }
    }
}
