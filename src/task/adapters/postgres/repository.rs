//! `PostgreSQL` repository implementation for task storage.

use super::{
    models::{NewTaskRow, TaskRow},
    schema::tasks,
};
use crate::storage::domain::FileAttachment;
use crate::task::{
    domain::{PersistedTaskData, Task, TaskId, TaskPriority, TaskStatus},
    ports::{TaskQuery, TaskRepository, TaskRepositoryError, TaskRepositoryResult},
};
use crate::user::domain::UserId;
use async_trait::async_trait;
use diesel::pg::{Pg, PgConnection};
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use serde_json::Value;

/// `PostgreSQL` connection pool type used by task adapters.
pub type TaskPgPool = Pool<ConnectionManager<PgConnection>>;

/// `PostgreSQL`-backed task repository.
#[derive(Debug, Clone)]
pub struct PostgresTaskRepository {
    pool: TaskPgPool,
}

impl PostgresTaskRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: TaskPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> TaskRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> TaskRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(TaskRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(TaskRepositoryError::persistence)?
    }
}

#[async_trait]
impl TaskRepository for PostgresTaskRepository {
    async fn store(&self, task: &Task) -> TaskRepositoryResult<()> {
        let task_id = task.id();
        let new_row = to_row(task)?;

        self.run_blocking(move |connection| {
            diesel::insert_into(tasks::table)
                .values(&new_row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        TaskRepositoryError::DuplicateTask(task_id)
                    }
                    _ => TaskRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn update(&self, task: &Task) -> TaskRepositoryResult<()> {
        let task_id = task.id();
        let row = to_row(task)?;

        self.run_blocking(move |connection| {
            let updated = diesel::update(tasks::table.filter(tasks::id.eq(task_id.into_inner())))
                .set(&row)
                .execute(connection)
                .map_err(TaskRepositoryError::persistence)?;
            if updated == 0 {
                return Err(TaskRepositoryError::NotFound(task_id));
            }
            Ok(())
        })
        .await
    }

    async fn delete(&self, id: TaskId) -> TaskRepositoryResult<()> {
        self.run_blocking(move |connection| {
            let deleted = diesel::delete(tasks::table.filter(tasks::id.eq(id.into_inner())))
                .execute(connection)
                .map_err(TaskRepositoryError::persistence)?;
            if deleted == 0 {
                return Err(TaskRepositoryError::NotFound(id));
            }
            Ok(())
        })
        .await
    }

    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        self.run_blocking(move |connection| {
            let row = tasks::table
                .filter(tasks::id.eq(id.into_inner()))
                .select(TaskRow::as_select())
                .first::<TaskRow>(connection)
                .optional()
                .map_err(TaskRepositoryError::persistence)?;
            row.map(row_to_task).transpose()
        })
        .await
    }

    async fn list(&self, query: &TaskQuery) -> TaskRepositoryResult<Vec<Task>> {
        let filter = query.clone();
        self.run_blocking(move |connection| {
            let rows = filtered(&filter)
                .order((
                    tasks::due_date.asc(),
                    tasks::created_at.asc(),
                    tasks::id.asc(),
                ))
                .select(TaskRow::as_select())
                .load::<TaskRow>(connection)
                .map_err(TaskRepositoryError::persistence)?;
            rows.into_iter().map(row_to_task).collect()
        })
        .await
    }

    async fn count(&self, query: &TaskQuery) -> TaskRepositoryResult<u64> {
        let filter = query.clone();
        self.run_blocking(move |connection| {
            let total = filtered(&filter)
                .count()
                .get_result::<i64>(connection)
                .map_err(TaskRepositoryError::persistence)?;
            u64::try_from(total).map_err(TaskRepositoryError::invalid_persisted_data)
        })
        .await
    }
}

fn filtered(query: &TaskQuery) -> tasks::BoxedQuery<'static, Pg> {
    let mut statement = tasks::table.into_boxed();
    if let Some(student_id) = query.student_id() {
        statement = statement.filter(tasks::student_id.eq(student_id.into_inner()));
    }
    if let Some(supervisor_id) = query.supervisor_id() {
        statement = statement.filter(tasks::supervisor_id.eq(supervisor_id.into_inner()));
    }
    if !query.statuses().is_empty() {
        let statuses: Vec<String> = query
            .statuses()
            .iter()
            .map(|status| status.as_str().to_owned())
            .collect();
        statement = statement.filter(tasks::status.eq_any(statuses));
    }
    statement
}

fn file_to_value(file: Option<&FileAttachment>) -> TaskRepositoryResult<Option<Value>> {
    file.map(serde_json::to_value)
        .transpose()
        .map_err(TaskRepositoryError::persistence)
}

fn value_to_file(value: Option<Value>) -> TaskRepositoryResult<Option<FileAttachment>> {
    value
        .map(serde_json::from_value)
        .transpose()
        .map_err(TaskRepositoryError::invalid_persisted_data)
}

fn to_row(task: &Task) -> TaskRepositoryResult<NewTaskRow> {
    Ok(NewTaskRow {
        id: task.id().into_inner(),
        title: task.title().to_owned(),
        description: task.description().to_owned(),
        category: task.category().to_owned(),
        priority: task.priority().as_str().to_owned(),
        due_date: task.due_date(),
        status: task.status().as_str().to_owned(),
        student_id: task.student_id().into_inner(),
        supervisor_id: task.supervisor_id().into_inner(),
        response: task.response().map(str::to_owned),
        response_file: file_to_value(task.response_file())?,
        grade: task.grade().map(str::to_owned),
        feedback: task.feedback().map(str::to_owned),
        attachment: file_to_value(task.attachment())?,
        created_at: task.created_at(),
        updated_at: task.updated_at(),
    })
}

fn row_to_task(row: TaskRow) -> TaskRepositoryResult<Task> {
    let TaskRow {
        id,
        title,
        description,
        category,
        priority: persisted_priority,
        due_date,
        status: persisted_status,
        student_id,
        supervisor_id,
        response,
        response_file: persisted_response_file,
        grade,
        feedback,
        attachment: persisted_attachment,
        created_at,
        updated_at,
    } = row;

    let priority = TaskPriority::try_from(persisted_priority.as_str())
        .map_err(TaskRepositoryError::invalid_persisted_data)?;
    let status = TaskStatus::try_from(persisted_status.as_str())
        .map_err(TaskRepositoryError::invalid_persisted_data)?;

    let data = PersistedTaskData {
        id: TaskId::from_uuid(id),
        title,
        description,
        category,
        priority,
        due_date,
        status,
        student_id: UserId::from_uuid(student_id),
        supervisor_id: UserId::from_uuid(supervisor_id),
        response,
        response_file: value_to_file(persisted_response_file)?,
        grade,
        feedback,
        attachment: value_to_file(persisted_attachment)?,
        created_at,
        updated_at,
    };
    Ok(Task::from_persisted(data))
}
