//! Diesel schema for task persistence.

diesel::table! {
    /// Supervisor-assigned task records.
    tasks (id) {
        /// Internal task identifier.
        id -> Uuid,
        /// Task title.
        #[max_length = 255]
        title -> Varchar,
        /// Task instructions.
        description -> Text,
        /// Grouping label.
        #[max_length = 255]
        category -> Varchar,
        /// Task priority.
        #[max_length = 50]
        priority -> Varchar,
        /// Calendar due date.
        due_date -> Date,
        /// Task lifecycle status.
        #[max_length = 50]
        status -> Varchar,
        /// Student working on the task.
        student_id -> Uuid,
        /// Supervisor who set the task.
        supervisor_id -> Uuid,
        /// Latest response text.
        response -> Nullable<Text>,
        /// Latest response file metadata.
        response_file -> Nullable<Jsonb>,
        /// Grade.
        #[max_length = 100]
        grade -> Nullable<Varchar>,
        /// Supervisor feedback.
        feedback -> Nullable<Text>,
        /// Supervisor attachment metadata.
        attachment -> Nullable<Jsonb>,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}
