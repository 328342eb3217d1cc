//! Count queries behind the dashboards.

use super::{AdminStats, StudentStats, SupervisorStats};
use crate::task::{
    domain::TaskStatus,
    ports::{TaskQuery, TaskRepository, TaskRepositoryError},
};
use crate::user::{
    domain::{Role, UserId, UserStatus},
    ports::{UserQuery, UserRepository, UserRepositoryError},
};
use std::sync::Arc;
use thiserror::Error;

/// Errors raised while computing dashboard figures.
#[derive(Debug, Error)]
pub enum DashboardError {
    /// A user count failed.
    #[error(transparent)]
    Users(#[from] UserRepositoryError),
    /// A task count failed.
    #[error(transparent)]
    Tasks(#[from] TaskRepositoryError),
}

/// Result type for dashboard queries.
pub type DashboardResult<T> = Result<T, DashboardError>;

/// Computes dashboard statistics from the entity repositories.
pub struct DashboardService<U, T>
where
    U: UserRepository,
    T: TaskRepository,
{
    users: Arc<U>,
    tasks: Arc<T>,
}

impl<U, T> Clone for DashboardService<U, T>
where
    U: UserRepository,
    T: TaskRepository,
{
    fn clone(&self) -> Self {
        Self {
            users: Arc::clone(&self.users),
            tasks: Arc::clone(&self.tasks),
        }
    }
}

impl<U, T> DashboardService<U, T>
where
    U: UserRepository,
    T: TaskRepository,
{
    /// Creates a dashboard service over the given repositories.
    #[must_use]
    pub const fn new(users: Arc<U>, tasks: Arc<T>) -> Self {
        Self { users, tasks }
    }

    /// Task counts for `student_id`.
    ///
    /// An unknown identifier yields zero counts.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::Tasks`] when a count fails.
    pub async fn student_stats(&self, student_id: UserId) -> DashboardResult<StudentStats> {
        let mine = TaskQuery::all().for_student(student_id);
        let stats = StudentStats {
            active_tasks: self
                .tasks
                .count(
                    &mine
                        .clone()
                        .with_status(TaskStatus::Pending)
                        .with_status(TaskStatus::InProgress),
                )
                .await?,
            completed_tasks: self
                .tasks
                .count(&mine.clone().with_status(TaskStatus::Completed))
                .await?,
            total_tasks: self.tasks.count(&mine).await?,
        };
        tracing::debug!(%student_id, ?stats, "computed student dashboard");
        Ok(stats)
    }

    /// Student and task counts for `supervisor_id`.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError`] when a count fails.
    pub async fn supervisor_stats(
        &self,
        supervisor_id: UserId,
    ) -> DashboardResult<SupervisorStats> {
        let set_by = TaskQuery::all().for_supervisor(supervisor_id);
        let stats = SupervisorStats {
            assigned_students: self
                .users
                .count(
                    &UserQuery::all()
                        .with_role(Role::Student)
                        .with_supervisor(supervisor_id),
                )
                .await?,
            total_tasks: self.tasks.count(&set_by).await?,
            pending_tasks: self
                .tasks
                .count(&set_by.clone().with_status(TaskStatus::Pending))
                .await?,
            completed_tasks: self
                .tasks
                .count(&set_by.clone().with_status(TaskStatus::Completed))
                .await?,
        };
        tracing::debug!(%supervisor_id, ?stats, "computed supervisor dashboard");
        Ok(stats)
    }

    /// Platform-wide counts.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError`] when a count fails.
    pub async fn admin_stats(&self) -> DashboardResult<AdminStats> {
        let stats = AdminStats {
            approved_students: self.count_students(UserStatus::Approved).await?,
            supervisors: self
                .users
                .count(&UserQuery::all().with_role(Role::Supervisor))
                .await?,
            pending_approvals: self.count_students(UserStatus::Pending).await?,
            documents_pending: self.count_students(UserStatus::DocumentsPending).await?,
            ready_for_assignment: self.count_students(UserStatus::ReadyForAssignment).await?,
            completed_tasks: self
                .tasks
                .count(&TaskQuery::all().with_status(TaskStatus::Completed))
                .await?,
        };
        tracing::debug!(?stats, "computed admin dashboard");
        Ok(stats)
    }

    async fn count_students(&self, status: UserStatus) -> DashboardResult<u64> {
        let query = UserQuery::all().with_role(Role::Student).with_status(status);
        Ok(self.users.count(&query).await?)
    }
}
