//! Read-only user projection for listings.

use super::{Role, User, UserId, UserStatus};
use serde::Serialize;

/// Presentation view of a user without credentials or document content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserSummary {
    /// User identifier.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Login email.
    pub email: String,
    /// Role held.
    pub role: Role,
    /// Lifecycle status.
    pub status: UserStatus,
    /// Student number, for students.
    pub student_number: Option<String>,
    /// Department, for supervisors.
    pub department: Option<String>,
    /// Assigned supervisor, for approved students.
    pub supervisor_id: Option<UserId>,
    /// Whether the required completion documents are on file.
    pub documents_completed: bool,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id(),
            name: user.name().to_owned(),
            email: user.email().as_str().to_owned(),
            role: user.role(),
            status: user.status(),
            student_number: user
                .student_profile()
                .map(|profile| profile.student_number.as_str().to_owned()),
            department: user.department().map(str::to_owned),
            supervisor_id: user.supervisor_id(),
            documents_completed: user.documents_completed(),
        }
    }
}
