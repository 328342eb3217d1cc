//! Error types for user domain validation and parsing.

use super::{RequiredDocument, Role, UserId, UserStatus};
use std::fmt;
use thiserror::Error;

/// Lifecycle action attempted on a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UserAction {
    /// Admin approval of a pending application.
    Approve,
    /// Admin rejection of an application.
    Reject,
    /// Student submission of completion documents.
    SubmitDocuments,
}

impl fmt::Display for UserAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Approve => "approve",
            Self::Reject => "reject",
            Self::SubmitDocuments => "submit documents for",
        })
    }
}

/// Errors returned while constructing or transitioning users.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UserDomainError {
    /// The action is not valid for the user's current status.
    #[error("cannot {action} user {user_id} while in status {status}")]
    InvalidState {
        /// User the action targeted.
        user_id: UserId,
        /// Status observed when the action was attempted.
        status: UserStatus,
        /// Attempted action.
        action: UserAction,
    },

    /// A required completion document was not supplied.
    #[error("missing required document: {0}")]
    MissingRequiredDocument(RequiredDocument),

    /// The user does not hold the role the operation requires.
    #[error("user {user_id} has role {actual}, expected {expected}")]
    RoleMismatch {
        /// User whose role was checked.
        user_id: UserId,
        /// Role the operation requires.
        expected: Role,
        /// Role the user actually holds.
        actual: Role,
    },

    /// The display name is empty after trimming.
    #[error("user name must not be empty")]
    EmptyName,

    /// The email address is not of the form `local@domain`.
    #[error("invalid email address '{0}'")]
    InvalidEmail(String),

    /// The student number is empty after trimming.
    #[error("student number must not be empty")]
    EmptyStudentNumber,

    /// The supplied password is empty.
    #[error("password must not be empty")]
    EmptyPassword,
}

/// Error returned while parsing roles from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown role: {0}")]
pub struct ParseRoleError(pub String);

/// Error returned while parsing user statuses from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown user status: {0}")]
pub struct ParseUserStatusError(pub String);
