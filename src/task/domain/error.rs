//! Error types for task domain validation and parsing.

use super::TaskId;
use crate::user::domain::UserId;
use std::fmt;
use thiserror::Error;

/// Side of a task a user participates on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskParticipant {
    /// The student working on the task.
    Student,
    /// The supervisor who set the task.
    Supervisor,
}

impl fmt::Display for TaskParticipant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Student => "student",
            Self::Supervisor => "supervisor",
        })
    }
}

/// Errors returned while constructing or mutating tasks.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskDomainError {
    /// The priority token is not one of the known priorities.
    #[error("invalid priority '{0}', expected low, medium, high, or urgent")]
    InvalidPriority(String),

    /// The due date is not an ISO `YYYY-MM-DD` calendar date.
    #[error("invalid due date '{0}', expected YYYY-MM-DD")]
    InvalidDueDate(String),

    /// The status token is not one of the known statuses.
    #[error("invalid status '{0}', expected pending, in_progress, completed, or overdue")]
    InvalidStatus(String),

    /// The title is empty after trimming.
    #[error("task title must not be empty")]
    EmptyTitle,

    /// The acting user is not the task's participant on that side.
    #[error("user {user_id} is not the {participant} of task {task_id}")]
    NotOwner {
        /// Task the action targeted.
        task_id: TaskId,
        /// User that attempted the action.
        user_id: UserId,
        /// Side the user claimed to act for.
        participant: TaskParticipant,
    },
}

/// Error returned while parsing task statuses from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task status: {0}")]
pub struct ParseTaskStatusError(pub String);

/// Error returned while parsing task priorities from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task priority: {0}")]
pub struct ParseTaskPriorityError(pub String);
