//! Service layer for task creation, responses, grading, and removal.

use crate::locks::KeyedLocks;
use crate::storage::{
    domain::{BlobCategory, BlobRef, FileAttachment, Upload},
    ports::{BlobStore, BlobStoreError},
    services::{StagedBlobs, release_blobs},
};
use crate::task::{
    domain::{
        NewTask, Task, TaskDomainError, TaskEdits, TaskId, TaskParticipant, TaskPriority,
        TaskResponse, TaskStatus, parse_due_date,
    },
    ports::{TaskQuery, TaskRepository, TaskRepositoryError},
};
use crate::user::{
    domain::{Role, UserDomainError, UserId},
    ports::{UserRepository, UserRepositoryError},
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;

/// Request payload for a new task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTaskRequest {
    title: String,
    description: String,
    category: String,
    due_date: String,
    priority: String,
    student_id: UserId,
    supervisor_id: UserId,
    attachment: Option<Upload>,
}

impl CreateTaskRequest {
    /// Creates a request with the required task fields.
    ///
    /// `due_date` is an ISO `YYYY-MM-DD` date and `priority` one of `low`,
    /// `medium`, `high`, or `urgent` in any case.
    #[must_use]
    pub fn new(
        title: impl Into<String>,
        due_date: impl Into<String>,
        priority: impl Into<String>,
        student_id: UserId,
        supervisor_id: UserId,
    ) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
            category: String::new(),
            due_date: due_date.into(),
            priority: priority.into(),
            student_id,
            supervisor_id,
            attachment: None,
        }
    }

    /// Sets the instructions.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the grouping label.
    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    /// Attaches a brief or template.
    #[must_use]
    pub fn with_attachment(mut self, attachment: Upload) -> Self {
        self.attachment = Some(attachment);
        self
    }
}

/// Request payload for editing a task. Unset fields are unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateTaskRequest {
    task_id: TaskId,
    title: Option<String>,
    description: Option<String>,
    category: Option<String>,
    due_date: Option<String>,
    priority: Option<String>,
}

impl UpdateTaskRequest {
    /// Creates a request that changes nothing yet.
    #[must_use]
    pub const fn new(task_id: TaskId) -> Self {
        Self {
            task_id,
            title: None,
            description: None,
            category: None,
            due_date: None,
            priority: None,
        }
    }

    /// Replaces the title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Replaces the instructions.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Replaces the grouping label.
    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Moves the due date. Takes an ISO `YYYY-MM-DD` date.
    #[must_use]
    pub fn with_due_date(mut self, due_date: impl Into<String>) -> Self {
        self.due_date = Some(due_date.into());
        self
    }

    /// Changes the priority token.
    #[must_use]
    pub fn with_priority(mut self, priority: impl Into<String>) -> Self {
        self.priority = Some(priority.into());
        self
    }
}

/// Request payload for a student response or completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskResponseRequest {
    task_id: TaskId,
    text: String,
    file: Option<Upload>,
    acting_student: Option<UserId>,
}

impl TaskResponseRequest {
    /// Creates a text-only response.
    #[must_use]
    pub fn new(task_id: TaskId, text: impl Into<String>) -> Self {
        Self {
            task_id,
            text: text.into(),
            file: None,
            acting_student: None,
        }
    }

    /// Replaces the response file.
    #[must_use]
    pub fn with_file(mut self, file: Upload) -> Self {
        self.file = Some(file);
        self
    }

    /// Requires the task to belong to `student_id`.
    #[must_use]
    pub const fn acting_as(mut self, student_id: UserId) -> Self {
        self.acting_student = Some(student_id);
        self
    }
}

/// Request payload for grading a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GradeTaskRequest {
    task_id: TaskId,
    grade: String,
    feedback: String,
    acting_supervisor: Option<UserId>,
}

impl GradeTaskRequest {
    /// Creates a grading request.
    #[must_use]
    pub fn new(task_id: TaskId, grade: impl Into<String>, feedback: impl Into<String>) -> Self {
        Self {
            task_id,
            grade: grade.into(),
            feedback: feedback.into(),
            acting_supervisor: None,
        }
    }

    /// Requires the task to have been set by `supervisor_id`.
    #[must_use]
    pub const fn acting_as(mut self, supervisor_id: UserId) -> Self {
        self.acting_supervisor = Some(supervisor_id);
        self
    }
}

/// Service-level errors for task lifecycle operations.
#[derive(Debug, Error)]
pub enum TaskLifecycleError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] TaskDomainError),
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] TaskRepositoryError),
    /// A referenced user does not exist.
    #[error("unknown {participant} {user_id}")]
    UnknownParticipant {
        /// Side the user was named for.
        participant: TaskParticipant,
        /// Identifier that did not resolve.
        user_id: UserId,
    },
    /// A referenced user holds the wrong role.
    #[error(transparent)]
    Participant(#[from] UserDomainError),
    /// User lookup failed.
    #[error(transparent)]
    Users(#[from] UserRepositoryError),
    /// Blob storage failed.
    #[error(transparent)]
    Storage(#[from] BlobStoreError),
}

/// Result type for task lifecycle service operations.
pub type TaskLifecycleResult<T> = Result<T, TaskLifecycleError>;

/// Task lifecycle orchestration service.
pub struct TaskLifecycleService<R, U, B, C>
where
    R: TaskRepository,
    U: UserRepository,
    B: BlobStore,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    users: Arc<U>,
    blobs: Arc<B>,
    clock: Arc<C>,
    locks: Arc<KeyedLocks<TaskId>>,
}

impl<R, U, B, C> Clone for TaskLifecycleService<R, U, B, C>
where
    R: TaskRepository,
    U: UserRepository,
    B: BlobStore,
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            users: Arc::clone(&self.users),
            blobs: Arc::clone(&self.blobs),
            clock: Arc::clone(&self.clock),
            locks: Arc::clone(&self.locks),
        }
    }
}

impl<R, U, B, C> TaskLifecycleService<R, U, B, C>
where
    R: TaskRepository,
    U: UserRepository,
    B: BlobStore,
    C: Clock + Send + Sync,
{
    /// Creates a new task lifecycle service.
    #[must_use]
    pub fn new(repository: Arc<R>, users: Arc<U>, blobs: Arc<B>, clock: Arc<C>) -> Self {
        Self {
            repository,
            users,
            blobs,
            clock,
            locks: Arc::new(KeyedLocks::new()),
        }
    }

    /// Creates a task in the pending state.
    ///
    /// The attachment is stored first and removed again when the task
    /// cannot be persisted.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidPriority`],
    /// [`TaskDomainError::InvalidDueDate`], or [`TaskDomainError::EmptyTitle`]
    /// for malformed input, [`TaskLifecycleError::UnknownParticipant`] or
    /// [`TaskLifecycleError::Participant`] when the student or supervisor
    /// does not resolve to a user of that role, and
    /// [`TaskLifecycleError::Storage`] when the attachment cannot be stored.
    pub async fn create_task(&self, request: CreateTaskRequest) -> TaskLifecycleResult<Task> {
        let CreateTaskRequest {
            title,
            description,
            category,
            due_date,
            priority,
            student_id,
            supervisor_id,
            attachment,
        } = request;
        let parsed_priority = TaskPriority::parse(&priority)?;
        let parsed_due_date = parse_due_date(&due_date)?;
        self.ensure_participant(TaskParticipant::Student, student_id)
            .await?;
        self.ensure_participant(TaskParticipant::Supervisor, supervisor_id)
            .await?;

        let mut staged = StagedBlobs::new(&*self.blobs);
        let result: TaskLifecycleResult<Task> = async {
            let stored_attachment = staged
                .stage_optional(attachment.as_ref(), BlobCategory::TaskAttachment)
                .await?;
            let new_task = NewTask {
                title,
                description,
                category,
                priority: parsed_priority,
                due_date: parsed_due_date,
                student_id,
                supervisor_id,
                attachment: stored_attachment,
            };
            let task = Task::new(new_task, &*self.clock)?;
            self.repository.store(&task).await?;
            Ok(task)
        }
        .await;
        let task = staged.settle(result).await?;

        tracing::info!(
            task_id = %task.id(),
            %student_id,
            %supervisor_id,
            priority = %task.priority(),
            "task created"
        );
        Ok(task)
    }

    /// Records a student response. A pending task moves to in progress.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] for an unknown task,
    /// [`TaskDomainError::NotOwner`] when the named student does not own the
    /// task, and [`TaskLifecycleError::Storage`] when the file cannot be
    /// stored.
    pub async fn submit_response(
        &self,
        request: TaskResponseRequest,
    ) -> TaskLifecycleResult<Task> {
        self.respond(request, "task response submitted", |task, response, clock| {
            task.submit_response(response, clock)
        })
        .await
    }

    /// Records a final response and marks the task completed, whatever its
    /// current status.
    ///
    /// # Errors
    ///
    /// Same as [`Self::submit_response`].
    pub async fn complete_task(&self, request: TaskResponseRequest) -> TaskLifecycleResult<Task> {
        self.respond(request, "task completed", |task, response, clock| {
            task.complete(response, clock)
        })
        .await
    }

    /// Sets the grade and feedback. The task status is not checked.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] for an unknown task and
    /// [`TaskDomainError::NotOwner`] when the named supervisor did not set
    /// the task.
    pub async fn grade_task(&self, request: GradeTaskRequest) -> TaskLifecycleResult<Task> {
        let GradeTaskRequest {
            task_id,
            grade,
            feedback,
            acting_supervisor,
        } = request;
        let _guard = self.locks.lock(&task_id).await;
        let mut task = self.find_by_id_or_error(task_id).await?;
        if let Some(supervisor_id) = acting_supervisor {
            task.ensure_participant(TaskParticipant::Supervisor, supervisor_id)?;
        }
        task.grade_with(grade, feedback, &*self.clock);
        self.repository.update(&task).await?;
        tracing::info!(%task_id, status = %task.status(), "task graded");
        Ok(task)
    }

    /// Edits a task's title, instructions, category, priority, or due date.
    ///
    /// Priority and due date are validated as in [`Self::create_task`]; an
    /// invalid field leaves the task unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] for an unknown task and
    /// [`TaskDomainError::InvalidPriority`],
    /// [`TaskDomainError::InvalidDueDate`], or [`TaskDomainError::EmptyTitle`]
    /// for malformed input.
    pub async fn update_task(&self, request: UpdateTaskRequest) -> TaskLifecycleResult<Task> {
        let UpdateTaskRequest {
            task_id,
            title,
            description,
            category,
            due_date,
            priority,
        } = request;
        let _guard = self.locks.lock(&task_id).await;
        let mut task = self.find_by_id_or_error(task_id).await?;
        let edits = TaskEdits {
            title,
            description,
            category,
            priority: priority.as_deref().map(TaskPriority::parse).transpose()?,
            due_date: due_date.as_deref().map(parse_due_date).transpose()?,
        };
        task.edit(edits, &*self.clock)?;
        self.repository.update(&task).await?;
        tracing::info!(
            %task_id,
            priority = %task.priority(),
            due_date = %task.due_date(),
            "task updated"
        );
        Ok(task)
    }

    /// Overrides a task's status with any known status token.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidStatus`] for an unknown token and
    /// [`TaskRepositoryError::NotFound`] for an unknown task.
    pub async fn set_status(&self, task_id: TaskId, status: &str) -> TaskLifecycleResult<Task> {
        let parsed = TaskStatus::parse(status)?;
        let _guard = self.locks.lock(&task_id).await;
        let mut task = self.find_by_id_or_error(task_id).await?;
        let from = task.status();
        task.set_status(parsed, &*self.clock);
        self.repository.update(&task).await?;
        tracing::info!(%task_id, %from, to = %task.status(), "task status set");
        Ok(task)
    }

    /// Flags a task as overdue.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] for an unknown task.
    pub async fn mark_overdue(&self, task_id: TaskId) -> TaskLifecycleResult<Task> {
        let _guard = self.locks.lock(&task_id).await;
        let mut task = self.find_by_id_or_error(task_id).await?;
        let from = task.status();
        task.mark_overdue(&*self.clock);
        self.repository.update(&task).await?;
        tracing::info!(%task_id, %from, to = %task.status(), "task marked overdue");
        Ok(task)
    }

    /// Deletes a task and releases its files.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] for an unknown task.
    pub async fn delete_task(&self, task_id: TaskId) -> TaskLifecycleResult<()> {
        let _guard = self.locks.lock(&task_id).await;
        let task = self.find_by_id_or_error(task_id).await?;
        self.repository.delete(task_id).await?;
        release_blobs(&*self.blobs, task_files(&task)).await;
        tracing::info!(%task_id, "task deleted");
        Ok(())
    }

    /// Retrieves a task by identifier.
    ///
    /// Returns `Ok(None)` when the task does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Repository`] when the lookup fails.
    pub async fn find(&self, task_id: TaskId) -> TaskLifecycleResult<Option<Task>> {
        Ok(self.repository.find_by_id(task_id).await?)
    }

    /// Lists every task, earliest due date first.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Repository`] when the lookup fails.
    pub async fn list_tasks(&self) -> TaskLifecycleResult<Vec<Task>> {
        Ok(self.repository.list(&TaskQuery::all()).await?)
    }

    /// Lists a student's tasks, earliest due date first.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Repository`] when the lookup fails.
    pub async fn tasks_for_student(&self, student_id: UserId) -> TaskLifecycleResult<Vec<Task>> {
        let query = TaskQuery::all().for_student(student_id);
        Ok(self.repository.list(&query).await?)
    }

    /// Lists the tasks a supervisor has set, earliest due date first.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Repository`] when the lookup fails.
    pub async fn tasks_for_supervisor(
        &self,
        supervisor_id: UserId,
    ) -> TaskLifecycleResult<Vec<Task>> {
        let query = TaskQuery::all().for_supervisor(supervisor_id);
        Ok(self.repository.list(&query).await?)
    }

    async fn respond<F>(
        &self,
        request: TaskResponseRequest,
        event: &'static str,
        apply: F,
    ) -> TaskLifecycleResult<Task>
    where
        F: FnOnce(&mut Task, TaskResponse, &C) -> Option<FileAttachment> + Send,
    {
        let TaskResponseRequest {
            task_id,
            text,
            file,
            acting_student,
        } = request;
        let _guard = self.locks.lock(&task_id).await;
        let mut task = self.find_by_id_or_error(task_id).await?;
        if let Some(student_id) = acting_student {
            task.ensure_participant(TaskParticipant::Student, student_id)?;
        }
        let from = task.status();

        let mut staged = StagedBlobs::new(&*self.blobs);
        let result: TaskLifecycleResult<Option<FileAttachment>> = async {
            let stored_file = staged
                .stage_optional(file.as_ref(), BlobCategory::ResponseAttachment)
                .await?;
            let response = TaskResponse {
                text,
                file: stored_file,
            };
            let replaced = apply(&mut task, response, &*self.clock);
            self.repository.update(&task).await?;
            Ok(replaced)
        }
        .await;
        let replaced = staged.settle(result).await?;

        release_blobs(
            &*self.blobs,
            replaced.map(|old| (old.reference, BlobCategory::ResponseAttachment)),
        )
        .await;
        tracing::info!(%task_id, %from, to = %task.status(), "{event}");
        Ok(task)
    }

    async fn ensure_participant(
        &self,
        participant: TaskParticipant,
        user_id: UserId,
    ) -> TaskLifecycleResult<()> {
        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or(TaskLifecycleError::UnknownParticipant {
                participant,
                user_id,
            })?;
        let role = match participant {
            TaskParticipant::Student => Role::Student,
            TaskParticipant::Supervisor => Role::Supervisor,
        };
        user.ensure_role(role)?;
        Ok(())
    }

    async fn find_by_id_or_error(&self, id: TaskId) -> TaskLifecycleResult<Task> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| TaskRepositoryError::NotFound(id).into())
    }
}

fn task_files(task: &Task) -> Vec<(BlobRef, BlobCategory)> {
    task.attachment()
        .map(|file| (file.reference.clone(), BlobCategory::TaskAttachment))
        .into_iter()
        .chain(
            task.response_file()
                .map(|file| (file.reference.clone(), BlobCategory::ResponseAttachment)),
        )
        .collect()
}
