//! Service layer linking ready students to supervisors.

use crate::locks::KeyedLocks;
use crate::user::{
    domain::{Role, User, UserDomainError, UserId, UserStatus, UserSummary},
    ports::{UserQuery, UserRepository, UserRepositoryError},
};
use mockable::Clock;
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;

/// Service-level errors for assignment operations.
#[derive(Debug, Error)]
pub enum AssignmentError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] UserDomainError),
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] UserRepositoryError),
}

/// Result type for assignment operations.
pub type AssignmentResult<T> = Result<T, AssignmentError>;

/// Presentation view of students awaiting or holding an assignment,
/// alongside every supervisor they could be assigned to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssignmentBoard {
    /// Students that are ready for assignment or already approved.
    pub students: Vec<UserSummary>,
    /// All supervisors.
    pub supervisors: Vec<UserSummary>,
}

/// Assignment orchestration service.
pub struct AssignmentCoordinator<R, C>
where
    R: UserRepository,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    clock: Arc<C>,
    locks: Arc<KeyedLocks<UserId>>,
}

impl<R, C> Clone for AssignmentCoordinator<R, C>
where
    R: UserRepository,
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            clock: Arc::clone(&self.clock),
            locks: Arc::clone(&self.locks),
        }
    }
}

impl<R, C> AssignmentCoordinator<R, C>
where
    R: UserRepository,
    C: Clock + Send + Sync,
{
    /// Creates a coordinator with its own per-user lock map.
    #[must_use]
    pub fn new(repository: Arc<R>, clock: Arc<C>) -> Self {
        Self::with_locks(repository, clock, Arc::new(KeyedLocks::new()))
    }

    /// Creates a coordinator that serialises user writes through `locks`.
    ///
    /// Share the map with every other service that mutates users.
    #[must_use]
    pub const fn with_locks(
        repository: Arc<R>,
        clock: Arc<C>,
        locks: Arc<KeyedLocks<UserId>>,
    ) -> Self {
        Self {
            repository,
            clock,
            locks,
        }
    }

    /// Assigns a student to a supervisor and marks the student approved.
    ///
    /// The student side only has to exist: neither its role nor its status
    /// is checked. A later assignment overwrites an earlier one.
    ///
    /// # Errors
    ///
    /// Returns [`AssignmentError::Repository`] with
    /// [`UserRepositoryError::NotFound`] when either user is missing, or
    /// [`AssignmentError::Domain`] with [`UserDomainError::RoleMismatch`]
    /// when the target is not a supervisor.
    pub async fn assign_student_to_supervisor(
        &self,
        student_id: UserId,
        supervisor_id: UserId,
    ) -> AssignmentResult<User> {
        let _guard = self.locks.lock(&student_id).await;
        let mut student = self.find_by_id_or_error(student_id).await?;
        let supervisor = self.find_by_id_or_error(supervisor_id).await?;
        let previous = student.supervisor_id();
        let from = student.status();

        student.assign_supervisor(&supervisor, &*self.clock)?;
        self.repository.update(&student).await?;

        if let Some(replaced) = previous.filter(|id| *id != supervisor_id) {
            tracing::info!(%student_id, %replaced, %supervisor_id, "student reassigned");
        }
        tracing::info!(
            %student_id,
            %supervisor_id,
            %from,
            to = %student.status(),
            "student assigned to supervisor"
        );
        Ok(student)
    }

    /// Returns students that are ready for assignment or approved, paired
    /// with all supervisors.
    ///
    /// # Errors
    ///
    /// Returns [`AssignmentError::Repository`] when a lookup fails.
    pub async fn list_assignments(&self) -> AssignmentResult<AssignmentBoard> {
        let student_query = UserQuery::all()
            .with_role(Role::Student)
            .with_status(UserStatus::ReadyForAssignment)
            .with_status(UserStatus::Approved);
        let students = self.repository.list(&student_query).await?;
        let supervisors = self
            .repository
            .list(&UserQuery::all().with_role(Role::Supervisor))
            .await?;

        Ok(AssignmentBoard {
            students: students.iter().map(UserSummary::from).collect(),
            supervisors: supervisors.iter().map(UserSummary::from).collect(),
        })
    }

    /// Returns the students assigned to a supervisor.
    ///
    /// # Errors
    ///
    /// Returns [`AssignmentError::Repository`] when the lookup fails.
    pub async fn students_of_supervisor(&self, supervisor_id: UserId) -> AssignmentResult<Vec<User>> {
        let query = UserQuery::all()
            .with_role(Role::Student)
            .with_supervisor(supervisor_id);
        Ok(self.repository.list(&query).await?)
    }

    async fn find_by_id_or_error(&self, id: UserId) -> AssignmentResult<User> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| UserRepositoryError::NotFound(id).into())
    }
}
