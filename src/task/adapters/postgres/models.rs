//! Diesel row models for task persistence.

use super::schema::tasks;
use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use serde_json::Value;

/// Query result row for task records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = tasks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TaskRow {
    /// Internal task identifier.
    pub id: uuid::Uuid,
    /// Task title.
    pub title: String,
    /// Task instructions.
    pub description: String,
    /// Grouping label.
    pub category: String,
    /// Task priority.
    pub priority: String,
    /// Calendar due date.
    pub due_date: NaiveDate,
    /// Lifecycle status.
    pub status: String,
    /// Student reference.
    pub student_id: uuid::Uuid,
    /// Supervisor reference.
    pub supervisor_id: uuid::Uuid,
    /// Latest response text.
    pub response: Option<String>,
    /// Response file JSON payload.
    pub response_file: Option<Value>,
    /// Grade.
    pub grade: Option<String>,
    /// Supervisor feedback.
    pub feedback: Option<String>,
    /// Attachment JSON payload.
    pub attachment: Option<Value>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Insert and update model for task records.
#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = tasks)]
#[diesel(treat_none_as_null = true)]
pub struct NewTaskRow {
    /// Internal task identifier.
    pub id: uuid::Uuid,
    /// Task title.
    pub title: String,
    /// Task instructions.
    pub description: String,
    /// Grouping label.
    pub category: String,
    /// Task priority.
    pub priority: String,
    /// Calendar due date.
    pub due_date: NaiveDate,
    /// Lifecycle status.
    pub status: String,
    /// Student reference.
    pub student_id: uuid::Uuid,
    /// Supervisor reference.
    pub supervisor_id: uuid::Uuid,
    /// Latest response text.
    pub response: Option<String>,
    /// Response file JSON payload.
    pub response_file: Option<Value>,
    /// Grade.
    pub grade: Option<String>,
    /// Supervisor feedback.
    pub feedback: Option<String>,
    /// Attachment JSON payload.
    pub attachment: Option<Value>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}
