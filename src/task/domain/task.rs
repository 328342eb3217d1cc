//! Task aggregate root.

use super::{TaskDomainError, TaskId, TaskParticipant, TaskPriority, TaskStatus};
use crate::storage::domain::FileAttachment;
use crate::user::domain::UserId;
use chrono::{DateTime, NaiveDate, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Parameter object for a task set by a supervisor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    /// Short title.
    pub title: String,
    /// Free-form instructions.
    pub description: String,
    /// Free-form grouping label.
    pub category: String,
    /// Urgency.
    pub priority: TaskPriority,
    /// Calendar date the task is due.
    pub due_date: NaiveDate,
    /// Student working on the task.
    pub student_id: UserId,
    /// Supervisor who set the task.
    pub supervisor_id: UserId,
    /// Brief or template handed out with the task.
    pub attachment: Option<FileAttachment>,
}

/// A student's answer to a task.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskResponse {
    /// Response text.
    pub text: String,
    /// Replacement response file; `None` keeps the current file.
    pub file: Option<FileAttachment>,
}

/// Supervisor edits to a task's descriptive fields. Unset fields are kept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskEdits {
    /// New title.
    pub title: Option<String>,
    /// New instructions.
    pub description: Option<String>,
    /// New grouping label.
    pub category: Option<String>,
    /// New urgency.
    pub priority: Option<TaskPriority>,
    /// New due date.
    pub due_date: Option<NaiveDate>,
}

/// Task aggregate root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    title: String,
    description: String,
    category: String,
    priority: TaskPriority,
    due_date: NaiveDate,
    status: TaskStatus,
    student_id: UserId,
    supervisor_id: UserId,
    response: Option<String>,
    response_file: Option<FileAttachment>,
    grade: Option<String>,
    feedback: Option<String>,
    attachment: Option<FileAttachment>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted task aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTaskData {
    /// Persisted task identifier.
    pub id: TaskId,
    /// Persisted title.
    pub title: String,
    /// Persisted description.
    pub description: String,
    /// Persisted category.
    pub category: String,
    /// Persisted priority.
    pub priority: TaskPriority,
    /// Persisted due date.
    pub due_date: NaiveDate,
    /// Persisted lifecycle status.
    pub status: TaskStatus,
    /// Persisted student reference.
    pub student_id: UserId,
    /// Persisted supervisor reference.
    pub supervisor_id: UserId,
    /// Persisted response text.
    pub response: Option<String>,
    /// Persisted response file.
    pub response_file: Option<FileAttachment>,
    /// Persisted grade.
    pub grade: Option<String>,
    /// Persisted feedback.
    pub feedback: Option<String>,
    /// Persisted supervisor attachment.
    pub attachment: Option<FileAttachment>,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest mutation timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Creates a task in [`TaskStatus::Pending`].
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyTitle`] when the title is blank.
    pub fn new(new_task: NewTask, clock: &impl Clock) -> Result<Self, TaskDomainError> {
        let NewTask {
            title,
            description,
            category,
            priority,
            due_date,
            student_id,
            supervisor_id,
            attachment,
        } = new_task;
        let trimmed = title.trim();
        if trimmed.is_empty() {
            return Err(TaskDomainError::EmptyTitle);
        }

        let timestamp = clock.utc();
        Ok(Self {
            id: TaskId::new(),
            title: trimmed.to_owned(),
            description,
            category,
            priority,
            due_date,
            status: TaskStatus::Pending,
            student_id,
            supervisor_id,
            response: None,
            response_file: None,
            grade: None,
            feedback: None,
            attachment,
            created_at: timestamp,
            updated_at: timestamp,
        })
    }

    /// Reconstructs a task from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedTaskData) -> Self {
        Self {
            id: data.id,
            title: data.title,
            description: data.description,
            category: data.category,
            priority: data.priority,
            due_date: data.due_date,
            status: data.status,
            student_id: data.student_id,
            supervisor_id: data.supervisor_id,
            response: data.response,
            response_file: data.response_file,
            grade: data.grade,
            feedback: data.feedback,
            attachment: data.attachment,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the category label.
    #[must_use]
    pub fn category(&self) -> &str {
        &self.category
    }

    /// Returns the priority.
    #[must_use]
    pub const fn priority(&self) -> TaskPriority {
        self.priority
    }

    /// Returns the due date.
    #[must_use]
    pub const fn due_date(&self) -> NaiveDate {
        self.due_date
    }

    /// Returns the lifecycle status.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns the student working on the task.
    #[must_use]
    pub const fn student_id(&self) -> UserId {
        self.student_id
    }

    /// Returns the supervisor who set the task.
    #[must_use]
    pub const fn supervisor_id(&self) -> UserId {
        self.supervisor_id
    }

    /// Returns the latest response text.
    #[must_use]
    pub fn response(&self) -> Option<&str> {
        self.response.as_deref()
    }

    /// Returns the latest response file.
    #[must_use]
    pub const fn response_file(&self) -> Option<&FileAttachment> {
        self.response_file.as_ref()
    }

    /// Returns the grade.
    #[must_use]
    pub fn grade(&self) -> Option<&str> {
        self.grade.as_deref()
    }

    /// Returns the supervisor's feedback.
    #[must_use]
    pub fn feedback(&self) -> Option<&str> {
        self.feedback.as_deref()
    }

    /// Returns the file attached by the supervisor.
    #[must_use]
    pub const fn attachment(&self) -> Option<&FileAttachment> {
        self.attachment.as_ref()
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest mutation timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Iterates over every file the task refers to.
    pub fn files(&self) -> impl Iterator<Item = &FileAttachment> {
        self.attachment.iter().chain(self.response_file.iter())
    }

    /// Fails unless `user_id` is the task's participant on `participant`'s
    /// side.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::NotOwner`] on mismatch.
    pub fn ensure_participant(
        &self,
        participant: TaskParticipant,
        user_id: UserId,
    ) -> Result<(), TaskDomainError> {
        let owner = match participant {
            TaskParticipant::Student => self.student_id,
            TaskParticipant::Supervisor => self.supervisor_id,
        };
        if owner != user_id {
            return Err(TaskDomainError::NotOwner {
                task_id: self.id,
                user_id,
                participant,
            });
        }
        Ok(())
    }

    /// Records a response. A pending task moves to
    /// [`TaskStatus::InProgress`]; any other status is kept.
    ///
    /// Returns the response file that was replaced, if any.
    pub fn submit_response(
        &mut self,
        response: TaskResponse,
        clock: &impl Clock,
    ) -> Option<FileAttachment> {
        let replaced = self.record_response(response);
        if self.status == TaskStatus::Pending {
            self.status = TaskStatus::InProgress;
        }
        self.touch(clock);
        replaced
    }

    /// Records a final response and marks the task
    /// [`TaskStatus::Completed`] whatever its current status.
    ///
    /// Returns the response file that was replaced, if any.
    pub fn complete(&mut self, response: TaskResponse, clock: &impl Clock) -> Option<FileAttachment> {
        let replaced = self.record_response(response);
        self.status = TaskStatus::Completed;
        self.touch(clock);
        replaced
    }

    /// Sets the grade and feedback. No status is required.
    pub fn grade_with(
        &mut self,
        grade: impl Into<String>,
        feedback: impl Into<String>,
        clock: &impl Clock,
    ) {
        self.grade = Some(grade.into());
        self.feedback = Some(feedback.into());
        self.touch(clock);
    }

    /// Applies supervisor edits. Status, response, and grade are untouched.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyTitle`] when a new title is blank; the
    /// task is left unchanged.
    pub fn edit(&mut self, edits: TaskEdits, clock: &impl Clock) -> Result<(), TaskDomainError> {
        let TaskEdits {
            title,
            description,
            category,
            priority,
            due_date,
        } = edits;
        let validated_title = title
            .map(|raw| {
                let trimmed = raw.trim();
                if trimmed.is_empty() {
                    Err(TaskDomainError::EmptyTitle)
                } else {
                    Ok(trimmed.to_owned())
                }
            })
            .transpose()?;

        if let Some(new_title) = validated_title {
            self.title = new_title;
        }
        if let Some(new_description) = description {
            self.description = new_description;
        }
        if let Some(new_category) = category {
            self.category = new_category;
        }
        if let Some(new_priority) = priority {
            self.priority = new_priority;
        }
        if let Some(new_due_date) = due_date {
            self.due_date = new_due_date;
        }
        self.touch(clock);
        Ok(())
    }

    /// Overrides the status without any transition check.
    pub fn set_status(&mut self, status: TaskStatus, clock: &impl Clock) {
        self.status = status;
        self.touch(clock);
    }

    /// Flags the task as [`TaskStatus::Overdue`].
    pub fn mark_overdue(&mut self, clock: &impl Clock) {
        self.set_status(TaskStatus::Overdue, clock);
    }

    fn record_response(&mut self, response: TaskResponse) -> Option<FileAttachment> {
        let TaskResponse { text, file } = response;
        self.response = Some(text);
        file.and_then(|new_file| self.response_file.replace(new_file))
    }

    /// Updates the `updated_at` timestamp to the current clock time.
    fn touch(&mut self, clock: &impl Clock) {
        self.updated_at = clock.utc();
    }
}
