//! Repository port for user persistence, lookup, and filtering.

use crate::user::domain::{EmailAddress, Role, StudentNumber, User, UserId, UserStatus};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for user repository operations.
pub type UserRepositoryResult<T> = Result<T, UserRepositoryError>;

/// Filter over user records. Unset criteria match every user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserQuery {
    role: Option<Role>,
    statuses: Vec<UserStatus>,
    supervisor_id: Option<UserId>,
}

impl UserQuery {
    /// Creates a query matching every user.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Restricts the query to one role.
    #[must_use]
    pub const fn with_role(mut self, role: Role) -> Self {
        self.role = Some(role);
        self
    }

    /// Adds a status to the set of accepted statuses.
    #[must_use]
    pub fn with_status(mut self, status: UserStatus) -> Self {
        if !self.statuses.contains(&status) {
            self.statuses.push(status);
        }
        self
    }

    /// Restricts the query to students assigned to `supervisor_id`.
    #[must_use]
    pub const fn with_supervisor(mut self, supervisor_id: UserId) -> Self {
        self.supervisor_id = Some(supervisor_id);
        self
    }

    /// Returns the role criterion.
    #[must_use]
    pub const fn role(&self) -> Option<Role> {
        self.role
    }

    /// Returns the accepted statuses; empty means any status.
    #[must_use]
    pub fn statuses(&self) -> &[UserStatus] {
        &self.statuses
    }

    /// Returns the supervisor criterion.
    #[must_use]
    pub const fn supervisor_id(&self) -> Option<UserId> {
        self.supervisor_id
    }

    /// Returns `true` when `user` satisfies every criterion.
    #[must_use]
    pub fn matches(&self, user: &User) -> bool {
        self.role.is_none_or(|role| user.role() == role)
            && (self.statuses.is_empty() || self.statuses.contains(&user.status()))
            && self
                .supervisor_id
                .is_none_or(|id| user.supervisor_id() == Some(id))
    }
}

/// User persistence contract.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Stores a new user.
    ///
    /// # Errors
    ///
    /// Returns [`UserRepositoryError::DuplicateUser`] when the ID exists,
    /// [`UserRepositoryError::DuplicateEmail`] when the email is taken, or
    /// [`UserRepositoryError::DuplicateStudentNumber`] when the student
    /// number is taken. Email is checked before student number.
    async fn store(&self, user: &User) -> UserRepositoryResult<()>;

    /// Persists changes to an existing user.
    ///
    /// # Errors
    ///
    /// Returns [`UserRepositoryError::NotFound`] when the user does not exist
    /// or [`UserRepositoryError::DuplicateEmail`] when a changed email is
    /// taken by another user.
    async fn update(&self, user: &User) -> UserRepositoryResult<()>;

    /// Removes a user. References held by other records are left untouched.
    ///
    /// # Errors
    ///
    /// Returns [`UserRepositoryError::NotFound`] when the user does not exist.
    async fn delete(&self, id: UserId) -> UserRepositoryResult<()>;

    /// Finds a user by identifier.
    ///
    /// Returns `None` when the user does not exist.
    async fn find_by_id(&self, id: UserId) -> UserRepositoryResult<Option<User>>;

    /// Finds a user by login email.
    ///
    /// Returns `None` when no user has the email.
    async fn find_by_email(&self, email: &EmailAddress) -> UserRepositoryResult<Option<User>>;

    /// Finds a student by student number.
    ///
    /// Returns `None` when no student has the number.
    async fn find_by_student_number(
        &self,
        student_number: &StudentNumber,
    ) -> UserRepositoryResult<Option<User>>;

    /// Returns the users matching `query`, oldest first.
    async fn list(&self, query: &UserQuery) -> UserRepositoryResult<Vec<User>>;

    /// Counts the users matching `query`.
    async fn count(&self, query: &UserQuery) -> UserRepositoryResult<u64>;
}

/// Errors returned by user repository implementations.
#[derive(Debug, Clone, Error)]
pub enum UserRepositoryError {
    /// A user with the same identifier already exists.
    #[error("duplicate user identifier: {0}")]
    DuplicateUser(UserId),

    /// Another user already uses the email.
    #[error("email already in use: {0}")]
    DuplicateEmail(EmailAddress),

    /// Another student already uses the student number.
    #[error("student number already in use: {0}")]
    DuplicateStudentNumber(StudentNumber),

    /// The user was not found.
    #[error("user not found: {0}")]
    NotFound(UserId),

    /// Persisted data could not be reconstructed into domain types.
    #[error("invalid persisted data: {0}")]
    InvalidPersistedData(Arc<dyn std::error::Error + Send + Sync>),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl UserRepositoryError {
    /// Wraps a data-quality or deserialization error from persisted rows.
    pub fn invalid_persisted_data(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::InvalidPersistedData(Arc::new(err))
    }

    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
