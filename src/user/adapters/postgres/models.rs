//! Diesel row models for user persistence.

use super::schema::users;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde_json::Value;

/// Query result row for user records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UserRow {
    /// Internal user identifier.
    pub id: uuid::Uuid,
    /// Display name.
    pub name: String,
    /// Normalised login email.
    pub email: String,
    /// Credential PHC string.
    pub credential: String,
    /// User role.
    pub role: String,
    /// Lifecycle status.
    pub status: String,
    /// Student number, for students.
    pub student_number: Option<String>,
    /// Student details JSON payload.
    pub student_profile: Option<Value>,
    /// Application files JSON payload.
    pub application_documents: Value,
    /// Completion files JSON payload.
    pub completion_documents: Value,
    /// Completion flag.
    pub documents_completed: bool,
    /// Department, for supervisors.
    pub department: Option<String>,
    /// Assigned supervisor.
    pub supervisor_id: Option<uuid::Uuid>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Insert and update model for user records.
#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = users)]
#[diesel(treat_none_as_null = true)]
pub struct NewUserRow {
    /// Internal user identifier.
    pub id: uuid::Uuid,
    /// Display name.
    pub name: String,
    /// Normalised login email.
    pub email: String,
    /// Credential PHC string.
    pub credential: String,
    /// User role.
    pub role: String,
    /// Lifecycle status.
    pub status: String,
    /// Student number, for students.
    pub student_number: Option<String>,
    /// Student details JSON payload.
    pub student_profile: Option<Value>,
    /// Application files JSON payload.
    pub application_documents: Value,
    /// Completion files JSON payload.
    pub completion_documents: Value,
    /// Completion flag.
    pub documents_completed: bool,
    /// Department, for supervisors.
    pub department: Option<String>,
    /// Assigned supervisor.
    pub supervisor_id: Option<uuid::Uuid>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}
