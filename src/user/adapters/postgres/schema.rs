//! Diesel schema for user persistence.

diesel::table! {
    /// User records for every role.
    users (id) {
        /// Internal user identifier.
        id -> Uuid,
        /// Display name.
        #[max_length = 255]
        name -> Varchar,
        /// Normalised login email.
        #[max_length = 320]
        email -> Varchar,
        /// Argon2 PHC credential string.
        credential -> Text,
        /// User role.
        #[max_length = 50]
        role -> Varchar,
        /// Lifecycle status.
        #[max_length = 50]
        status -> Varchar,
        /// Student number, for students.
        #[max_length = 100]
        student_number -> Nullable<Varchar>,
        /// Remaining student details.
        student_profile -> Nullable<Jsonb>,
        /// Application files still on record.
        application_documents -> Jsonb,
        /// Completion files on record.
        completion_documents -> Jsonb,
        /// Whether the required completion files are stored.
        documents_completed -> Bool,
        /// Department, for supervisors.
        #[max_length = 255]
        department -> Nullable<Varchar>,
        /// Assigned supervisor, for students.
        supervisor_id -> Nullable<Uuid>,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}
