//! Repository port for task persistence, lookup, and counting.

use crate::task::domain::{Task, TaskId, TaskStatus};
use crate::user::domain::UserId;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for task repository operations.
pub type TaskRepositoryResult<T> = Result<T, TaskRepositoryError>;

/// Filter over task records. Unset criteria match every task.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskQuery {
    student_id: Option<UserId>,
    supervisor_id: Option<UserId>,
    statuses: Vec<TaskStatus>,
}

impl TaskQuery {
    /// Creates a query matching every task.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Restricts the query to tasks of one student.
    #[must_use]
    pub const fn for_student(mut self, student_id: UserId) -> Self {
        self.student_id = Some(student_id);
        self
    }

    /// Restricts the query to tasks set by one supervisor.
    #[must_use]
    pub const fn for_supervisor(mut self, supervisor_id: UserId) -> Self {
        self.supervisor_id = Some(supervisor_id);
        self
    }

    /// Adds a status to the set of accepted statuses.
    #[must_use]
    pub fn with_status(mut self, status: TaskStatus) -> Self {
        if !self.statuses.contains(&status) {
            self.statuses.push(status);
        }
        self
    }

    /// Returns the student criterion.
    #[must_use]
    pub const fn student_id(&self) -> Option<UserId> {
        self.student_id
    }

    /// Returns the supervisor criterion.
    #[must_use]
    pub const fn supervisor_id(&self) -> Option<UserId> {
        self.supervisor_id
    }

    /// Returns the accepted statuses; empty means any status.
    #[must_use]
    pub fn statuses(&self) -> &[TaskStatus] {
        &self.statuses
    }

    /// Returns `true` when `task` satisfies every criterion.
    #[must_use]
    pub fn matches(&self, task: &Task) -> bool {
        self.student_id.is_none_or(|id| task.student_id() == id)
            && self
                .supervisor_id
                .is_none_or(|id| task.supervisor_id() == id)
            && (self.statuses.is_empty() || self.statuses.contains(&task.status()))
    }
}

/// Task persistence contract.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Stores a new task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::DuplicateTask`] when the task ID already
    /// exists.
    async fn store(&self, task: &Task) -> TaskRepositoryResult<()>;

    /// Persists changes to an existing task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the task does not exist.
    async fn update(&self, task: &Task) -> TaskRepositoryResult<()>;

    /// Removes a task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the task does not exist.
    async fn delete(&self, id: TaskId) -> TaskRepositoryResult<()>;

    /// Finds a task by identifier.
    ///
    /// Returns `None` when the task does not exist.
    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>>;

    /// Returns the tasks matching `query`, earliest due date first.
    async fn list(&self, query: &TaskQuery) -> TaskRepositoryResult<Vec<Task>>;

    /// Counts the tasks matching `query`.
    async fn count(&self, query: &TaskQuery) -> TaskRepositoryResult<u64>;
}

/// Errors returned by task repository implementations.
#[derive(Debug, Clone, Error)]
pub enum TaskRepositoryError {
    /// A task with the same identifier already exists.
    #[error("duplicate task identifier: {0}")]
    DuplicateTask(TaskId),

    /// The task was not found.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// Persisted data could not be reconstructed into domain types.
    #[error("invalid persisted data: {0}")]
    InvalidPersistedData(Arc<dyn std::error::Error + Send + Sync>),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl TaskRepositoryError {
    /// Wraps a data-quality or deserialization error from persisted rows.
    pub fn invalid_persisted_data(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::InvalidPersistedData(Arc::new(err))
    }

    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
