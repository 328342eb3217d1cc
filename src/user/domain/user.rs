//! User aggregate root and the student application state machine.

use super::{
    ApplicationDocuments, CompletionDocuments, CredentialHash, EmailAddress, Role, StudentNumber,
    UserAction, UserDomainError, UserId, UserStatus, require_documents,
};
use crate::storage::domain::FileAttachment;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Academic details collected from a student applicant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentProfile {
    /// Unique student number.
    pub student_number: StudentNumber,
    /// Contact phone number.
    pub phone: String,
    /// Home university.
    pub university: String,
    /// Field of study.
    pub major: String,
    /// Current academic year.
    pub academic_year: String,
}

/// Parameter object for a new student application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudentRegistration {
    /// Display name.
    pub name: String,
    /// Login email.
    pub email: EmailAddress,
    /// Academic details.
    pub profile: StudentProfile,
    /// Files submitted with the application.
    pub documents: ApplicationDocuments,
}

/// Parameter object for a supervisor created by an admin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSupervisor {
    /// Display name.
    pub name: String,
    /// Login email.
    pub email: EmailAddress,
    /// Department the supervisor belongs to.
    pub department: Option<String>,
}

/// Changes applied to a supervisor record; `None` keeps the current value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SupervisorChanges {
    /// New display name.
    pub name: Option<String>,
    /// New login email.
    pub email: Option<EmailAddress>,
    /// New department.
    pub department: Option<String>,
}

/// User aggregate root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    id: UserId,
    name: String,
    email: EmailAddress,
    credential: CredentialHash,
    role: Role,
    status: UserStatus,
    student_profile: Option<StudentProfile>,
    application_documents: ApplicationDocuments,
    completion_documents: CompletionDocuments,
    documents_completed: bool,
    department: Option<String>,
    supervisor_id: Option<UserId>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted user aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedUserData {
    /// Persisted user identifier.
    pub id: UserId,
    /// Persisted display name.
    pub name: String,
    /// Persisted login email.
    pub email: EmailAddress,
    /// Persisted credential hash.
    pub credential: CredentialHash,
    /// Persisted role.
    pub role: Role,
    /// Persisted lifecycle status.
    pub status: UserStatus,
    /// Persisted student details, for students.
    pub student_profile: Option<StudentProfile>,
    /// Persisted application files.
    pub application_documents: ApplicationDocuments,
    /// Persisted completion files.
    pub completion_documents: CompletionDocuments,
    /// Persisted completion flag.
    pub documents_completed: bool,
    /// Persisted department, for supervisors.
    pub department: Option<String>,
    /// Persisted supervisor assignment.
    pub supervisor_id: Option<UserId>,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest mutation timestamp.
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Creates a student applicant in [`UserStatus::Pending`].
    ///
    /// # Errors
    ///
    /// Returns [`UserDomainError::EmptyName`] when the name is blank.
    pub fn register_student(
        registration: StudentRegistration,
        credential: CredentialHash,
        clock: &impl Clock,
    ) -> Result<Self, UserDomainError> {
        let StudentRegistration {
            name,
            email,
            profile,
            documents,
        } = registration;
        let mut user = Self::new(name, email, credential, Role::Student, clock)?;
        user.status = UserStatus::Pending;
        user.student_profile = Some(profile);
        user.application_documents = documents;
        Ok(user)
    }

    /// Creates a supervisor directly in [`UserStatus::Approved`].
    ///
    /// # Errors
    ///
    /// Returns [`UserDomainError::EmptyName`] when the name is blank.
    pub fn new_supervisor(
        supervisor: NewSupervisor,
        credential: CredentialHash,
        clock: &impl Clock,
    ) -> Result<Self, UserDomainError> {
        let NewSupervisor {
            name,
            email,
            department,
        } = supervisor;
        let mut user = Self::new(name, email, credential, Role::Supervisor, clock)?;
        user.department = department;
        Ok(user)
    }

    /// Creates an admin directly in [`UserStatus::Approved`].
    ///
    /// # Errors
    ///
    /// Returns [`UserDomainError::EmptyName`] when the name is blank.
    pub fn new_admin(
        name: impl Into<String>,
        email: EmailAddress,
        credential: CredentialHash,
        clock: &impl Clock,
    ) -> Result<Self, UserDomainError> {
        Self::new(name.into(), email, credential, Role::Admin, clock)
    }

    fn new(
        name: String,
        email: EmailAddress,
        credential: CredentialHash,
        role: Role,
        clock: &impl Clock,
    ) -> Result<Self, UserDomainError> {
        let timestamp = clock.utc();
        Ok(Self {
            id: UserId::new(),
            name: validated_name(name)?,
            email,
            credential,
            role,
            status: UserStatus::Approved,
            student_profile: None,
            application_documents: ApplicationDocuments::default(),
            completion_documents: CompletionDocuments::default(),
            documents_completed: false,
            department: None,
            supervisor_id: None,
            created_at: timestamp,
            updated_at: timestamp,
        })
    }

    /// Reconstructs a user from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedUserData) -> Self {
        Self {
            id: data.id,
            name: data.name,
            email: data.email,
            credential: data.credential,
            role: data.role,
            status: data.status,
            student_profile: data.student_profile,
            application_documents: data.application_documents,
            completion_documents: data.completion_documents,
            documents_completed: data.documents_completed,
            department: data.department,
            supervisor_id: data.supervisor_id,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the user identifier.
    #[must_use]
    pub const fn id(&self) -> UserId {
        self.id
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the login email.
    #[must_use]
    pub const fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Returns the stored credential hash.
    #[must_use]
    pub const fn credential(&self) -> &CredentialHash {
        &self.credential
    }

    /// Returns the user role.
    #[must_use]
    pub const fn role(&self) -> Role {
        self.role
    }

    /// Returns the lifecycle status.
    #[must_use]
    pub const fn status(&self) -> UserStatus {
        self.status
    }

    /// Returns the student details, for students.
    #[must_use]
    pub const fn student_profile(&self) -> Option<&StudentProfile> {
        self.student_profile.as_ref()
    }

    /// Returns the application files still on record.
    #[must_use]
    pub const fn application_documents(&self) -> &ApplicationDocuments {
        &self.application_documents
    }

    /// Returns the completion files on record.
    #[must_use]
    pub const fn completion_documents(&self) -> &CompletionDocuments {
        &self.completion_documents
    }

    /// Returns `true` once the required completion documents are stored.
    #[must_use]
    pub const fn documents_completed(&self) -> bool {
        self.documents_completed
    }

    /// Returns the department, for supervisors.
    #[must_use]
    pub fn department(&self) -> Option<&str> {
        self.department.as_deref()
    }

    /// Returns the assigned supervisor, if any.
    #[must_use]
    pub const fn supervisor_id(&self) -> Option<UserId> {
        self.supervisor_id
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

    /// Fails unless the user holds `expected`.
    ///
    /// # Errors
    ///
    /// Returns [`UserDomainError::RoleMismatch`] for any other role.
    pub fn ensure_role(&self, expected: Role) -> Result<(), UserDomainError> {
        if self.role != expected {
            return Err(UserDomainError::RoleMismatch {
                user_id: self.id,
                expected,
                actual: self.role,
            });
        }
        Ok(())
    }

    /// Approves a pending application, moving it to
    /// [`UserStatus::DocumentsPending`].
    ///
    /// # Errors
    ///
    /// Returns [`UserDomainError::RoleMismatch`] for non-students and
    /// [`UserDomainError::InvalidState`] unless the status is
    /// [`UserStatus::Pending`].
    pub fn approve(&mut self, clock: &impl Clock) -> Result<(), UserDomainError> {
        self.ensure_role(Role::Student)?;
        if self.status != UserStatus::Pending {
            return Err(self.invalid_state(UserAction::Approve));
        }
        self.status = UserStatus::DocumentsPending;
        self.touch(clock);
        Ok(())
    }

    /// Rejects an application that is still under review.
    ///
    /// # Errors
    ///
    /// Returns [`UserDomainError::InvalidState`] unless the status is
    /// [`UserStatus::Pending`] or [`UserStatus::DocumentsPending`].
    pub fn reject(&mut self, clock: &impl Clock) -> Result<(), UserDomainError> {
        if !self.status.is_under_review() {
            return Err(self.invalid_state(UserAction::Reject));
        }
        self.status = UserStatus::Rejected;
        self.touch(clock);
        Ok(())
    }

    /// Fails unless the user may currently submit completion documents.
    ///
    /// # Errors
    ///
    /// Returns [`UserDomainError::InvalidState`] unless the status is
    /// [`UserStatus::DocumentsPending`].
    pub fn ensure_accepts_documents(&self) -> Result<(), UserDomainError> {
        if self.status != UserStatus::DocumentsPending {
            return Err(self.invalid_state(UserAction::SubmitDocuments));
        }
        Ok(())
    }

    /// Records the completion documents and moves the student to
    /// [`UserStatus::ReadyForAssignment`].
    ///
    /// The application files are retired from the record and returned so
    /// that their blobs can be released.
    ///
    /// # Errors
    ///
    /// Returns [`UserDomainError::InvalidState`] unless the status is
    /// [`UserStatus::DocumentsPending`], or
    /// [`UserDomainError::MissingRequiredDocument`] when the transcript or
    /// recommendation is absent. The record is unchanged on error.
    pub fn submit_documents(
        &mut self,
        documents: CompletionDocuments,
        clock: &impl Clock,
    ) -> Result<ApplicationDocuments, UserDomainError> {
        self.ensure_accepts_documents()?;
        require_documents::<FileAttachment>(
            documents.transcript.as_ref(),
            documents.recommendation.as_ref(),
        )?;
        self.completion_documents = documents;
        self.documents_completed = true;
        self.status = UserStatus::ReadyForAssignment;
        self.touch(clock);
        Ok(std::mem::take(&mut self.application_documents))
    }

    /// Links this user to `supervisor` and marks it
    /// [`UserStatus::Approved`].
    ///
    /// Only the target's role is checked; the link is ignored for users
    /// that are not students. A second assignment overwrites the first.
    ///
    /// # Errors
    ///
    /// Returns [`UserDomainError::RoleMismatch`] when `supervisor` is not a
    /// supervisor.
    pub fn assign_supervisor(
        &mut self,
        supervisor: &Self,
        clock: &impl Clock,
    ) -> Result<(), UserDomainError> {
        supervisor.ensure_role(Role::Supervisor)?;
        self.supervisor_id = Some(supervisor.id);
        self.status = UserStatus::Approved;
        self.touch(clock);
        Ok(())
    }

    /// Applies administrative edits to a supervisor record.
    ///
    /// # Errors
    ///
    /// Returns [`UserDomainError::RoleMismatch`] for non-supervisors and
    /// [`UserDomainError::EmptyName`] when the new name is blank.
    pub fn update_supervisor(
        &mut self,
        changes: SupervisorChanges,
        clock: &impl Clock,
    ) -> Result<(), UserDomainError> {
        self.ensure_role(Role::Supervisor)?;
        let SupervisorChanges {
            name,
            email,
            department,
        } = changes;
        let validated = name.map(validated_name).transpose()?;
        if let Some(new_name) = validated {
            self.name = new_name;
        }
        if let Some(new_email) = email {
            self.email = new_email;
        }
        if department.is_some() {
            self.department = department;
        }
        self.touch(clock);
        Ok(())
    }

    const fn invalid_state(&self, action: UserAction) -> UserDomainError {
        UserDomainError::InvalidState {
            user_id: self.id,
            status: self.status,
            action,
        }
    }

    /// Updates the `updated_at` timestamp to the current clock time.
    fn touch(&mut self, clock: &impl Clock) {
        self.updated_at = clock.utc();
    }
}

fn validated_name(name: String) -> Result<String, UserDomainError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(UserDomainError::EmptyName);
    }
    Ok(trimmed.to_owned())
}
