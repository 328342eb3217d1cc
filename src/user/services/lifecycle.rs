//! Service layer for student applications, document submission, and
//! administrative user management.

use super::AssignmentCoordinator;
use crate::locks::KeyedLocks;
use crate::storage::{
    domain::{BlobCategory, Upload},
    ports::{BlobStore, BlobStoreError},
    services::{StagedBlobs, release_blobs},
};
use crate::user::{
    domain::{
        ApplicationDocuments, CompletionDocuments, CredentialHash, EmailAddress, NewSupervisor,
        Role, StudentNumber, StudentProfile, StudentRegistration, SupervisorChanges, User,
        UserDomainError, UserId, UserStatus, require_documents,
    },
    ports::{CredentialError, CredentialHasher, UserQuery, UserRepository, UserRepositoryError},
};
use mockable::Clock;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Plaintext password held only until it is hashed or verified.
#[derive(Clone, PartialEq, Eq)]
struct Password(String);

impl Password {
    fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password([redacted])")
    }
}

/// Request payload for a new student application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterApplicationRequest {
    name: String,
    email: String,
    password: Password,
    student_number: String,
    phone: String,
    university: String,
    major: String,
    academic_year: String,
    cv: Option<Upload>,
    motivation_letter: Option<Upload>,
}

impl RegisterApplicationRequest {
    /// Creates a request with the identifying fields of an applicant.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
        student_number: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            password: Password::new(password),
            student_number: student_number.into(),
            phone: String::new(),
            university: String::new(),
            major: String::new(),
            academic_year: String::new(),
            cv: None,
            motivation_letter: None,
        }
    }

    /// Sets the contact phone number.
    #[must_use]
    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = phone.into();
        self
    }

    /// Sets the home university.
    #[must_use]
    pub fn with_university(mut self, university: impl Into<String>) -> Self {
        self.university = university.into();
        self
    }

    /// Sets the field of study.
    #[must_use]
    pub fn with_major(mut self, major: impl Into<String>) -> Self {
        self.major = major.into();
        self
    }

    /// Sets the current academic year.
    #[must_use]
    pub fn with_academic_year(mut self, academic_year: impl Into<String>) -> Self {
        self.academic_year = academic_year.into();
        self
    }

    /// Attaches a curriculum vitae.
    #[must_use]
    pub fn with_cv(mut self, cv: Upload) -> Self {
        self.cv = Some(cv);
        self
    }

    /// Attaches a motivation letter.
    #[must_use]
    pub fn with_motivation_letter(mut self, letter: Upload) -> Self {
        self.motivation_letter = Some(letter);
        self
    }
}

/// Request payload for completion document submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitDocumentsRequest {
    user_id: UserId,
    transcript: Option<Upload>,
    recommendation: Option<Upload>,
    portfolio: Option<Upload>,
}

impl SubmitDocumentsRequest {
    /// Creates an empty submission for `user_id`.
    #[must_use]
    pub const fn new(user_id: UserId) -> Self {
        Self {
            user_id,
            transcript: None,
            recommendation: None,
            portfolio: None,
        }
    }

    /// Sets the academic transcript.
    #[must_use]
    pub fn with_transcript(mut self, transcript: Upload) -> Self {
        self.transcript = Some(transcript);
        self
    }

    /// Sets the letter of recommendation.
    #[must_use]
    pub fn with_recommendation(mut self, recommendation: Upload) -> Self {
        self.recommendation = Some(recommendation);
        self
    }

    /// Sets the optional portfolio.
    #[must_use]
    pub fn with_portfolio(mut self, portfolio: Upload) -> Self {
        self.portfolio = Some(portfolio);
        self
    }
}

/// Request payload for an admin-created supervisor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateSupervisorRequest {
    name: String,
    email: String,
    password: Password,
    department: Option<String>,
}

impl CreateSupervisorRequest {
    /// Creates a request with the supervisor's login details.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            password: Password::new(password),
            department: None,
        }
    }

    /// Sets the department.
    #[must_use]
    pub fn with_department(mut self, department: impl Into<String>) -> Self {
        self.department = Some(department.into());
        self
    }
}

/// Request payload for editing a supervisor. Unset fields are unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateSupervisorRequest {
    id: UserId,
    name: Option<String>,
    email: Option<String>,
    department: Option<String>,
}

impl UpdateSupervisorRequest {
    /// Creates a request that changes nothing yet.
    #[must_use]
    pub const fn new(id: UserId) -> Self {
        Self {
            id,
            name: None,
            email: None,
            department: None,
        }
    }

    /// Sets a new display name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets a new login email.
    #[must_use]
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Sets a new department.
    #[must_use]
    pub fn with_department(mut self, department: impl Into<String>) -> Self {
        self.department = Some(department.into());
        self
    }
}

/// Request payload for an admin account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateAdminRequest {
    name: String,
    email: String,
    password: Password,
}

impl CreateAdminRequest {
    /// Creates a request with the admin's login details.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            password: Password::new(password),
        }
    }
}

/// Service-level errors for user lifecycle operations.
#[derive(Debug, Error)]
pub enum UserLifecycleError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] UserDomainError),
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] UserRepositoryError),
    /// Blob storage failed.
    #[error(transparent)]
    Storage(#[from] BlobStoreError),
    /// Credential hashing failed.
    #[error(transparent)]
    Credential(#[from] CredentialError),
    /// Email and password do not identify a user.
    #[error("invalid email or password")]
    InvalidCredentials,
}

/// Result type for user lifecycle service operations.
pub type UserLifecycleResult<T> = Result<T, UserLifecycleError>;

/// User lifecycle orchestration service.
pub struct UserLifecycleService<R, B, H, C>
where
    R: UserRepository,
    B: BlobStore,
    H: CredentialHasher + 'static,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    blobs: Arc<B>,
    hasher: Arc<H>,
    clock: Arc<C>,
    locks: Arc<KeyedLocks<UserId>>,
}

impl<R, B, H, C> Clone for UserLifecycleService<R, B, H, C>
where
    R: UserRepository,
    B: BlobStore,
    H: CredentialHasher + 'static,
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            blobs: Arc::clone(&self.blobs),
            hasher: Arc::clone(&self.hasher),
            clock: Arc::clone(&self.clock),
            locks: Arc::clone(&self.locks),
        }
    }
}

impl<R, B, H, C> UserLifecycleService<R, B, H, C>
where
    R: UserRepository,
    B: BlobStore,
    H: CredentialHasher + 'static,
    C: Clock + Send + Sync,
{
    /// Creates a new user lifecycle service with its own per-user lock map.
    #[must_use]
    pub fn new(repository: Arc<R>, blobs: Arc<B>, hasher: Arc<H>, clock: Arc<C>) -> Self {
        Self::with_locks(repository, blobs, hasher, clock, Arc::new(KeyedLocks::new()))
    }

    /// Creates a service that serialises user writes through `locks`.
    #[must_use]
    pub const fn with_locks(
        repository: Arc<R>,
        blobs: Arc<B>,
        hasher: Arc<H>,
        clock: Arc<C>,
        locks: Arc<KeyedLocks<UserId>>,
    ) -> Self {
        Self {
            repository,
            blobs,
            hasher,
            clock,
            locks,
        }
    }

    /// Returns an assignment coordinator sharing this service's repository,
    /// clock, and lock map.
    #[must_use]
    pub fn assignment_coordinator(&self) -> AssignmentCoordinator<R, C> {
        AssignmentCoordinator::with_locks(
            Arc::clone(&self.repository),
            Arc::clone(&self.clock),
            Arc::clone(&self.locks),
        )
    }

    /// Registers a student application in [`UserStatus::Pending`].
    ///
    /// Supplied application files are stored first and removed again when
    /// the user cannot be persisted.
    ///
    /// # Errors
    ///
    /// Returns [`UserLifecycleError::Repository`] with
    /// [`UserRepositoryError::DuplicateEmail`] or
    /// [`UserRepositoryError::DuplicateStudentNumber`] when either is taken,
    /// [`UserLifecycleError::Domain`] for malformed input, and
    /// [`UserLifecycleError::Storage`] when a file cannot be stored.
    pub async fn register_application(
        &self,
        request: RegisterApplicationRequest,
    ) -> UserLifecycleResult<User> {
        let RegisterApplicationRequest {
            name,
            email,
            password,
            student_number,
            phone,
            university,
            major,
            academic_year,
            cv,
            motivation_letter,
        } = request;
        let email_address = EmailAddress::new(email)?;
        let number = StudentNumber::new(student_number)?;
        self.ensure_email_free(&email_address).await?;
        if self.repository.find_by_student_number(&number).await?.is_some() {
            return Err(UserRepositoryError::DuplicateStudentNumber(number).into());
        }
        let credential = self.hash_password(password).await?;

        let mut staged = StagedBlobs::new(&*self.blobs);
        let result: UserLifecycleResult<User> = async {
            let documents = ApplicationDocuments {
                cv: staged
                    .stage_optional(cv.as_ref(), BlobCategory::ApplicationDocument)
                    .await?,
                motivation_letter: staged
                    .stage_optional(motivation_letter.as_ref(), BlobCategory::ApplicationDocument)
                    .await?,
            };
            let registration = StudentRegistration {
                name,
                email: email_address,
                profile: StudentProfile {
                    student_number: number,
                    phone,
                    university,
                    major,
                    academic_year,
                },
                documents,
            };
            let user = User::register_student(registration, credential, &*self.clock)?;
            self.repository.store(&user).await?;
            Ok(user)
        }
        .await;
        let user = staged.settle(result).await?;

        tracing::info!(user_id = %user.id(), email = %user.email(), "student application registered");
        Ok(user)
    }

    /// Approves a pending application.
    ///
    /// # Errors
    ///
    /// Returns [`UserRepositoryError::NotFound`] for an unknown user and
    /// [`UserDomainError::InvalidState`] unless the user is
    /// [`UserStatus::Pending`]. The record is unchanged on error.
    pub async fn approve(&self, user_id: UserId) -> UserLifecycleResult<User> {
        self.transition(user_id, "application approved", |user, clock| {
            user.approve(clock)
        })
        .await
    }

    /// Rejects an application under review.
    ///
    /// # Errors
    ///
    /// Returns [`UserRepositoryError::NotFound`] for an unknown user and
    /// [`UserDomainError::InvalidState`] unless the user is
    /// [`UserStatus::Pending`] or [`UserStatus::DocumentsPending`].
    pub async fn reject(&self, user_id: UserId) -> UserLifecycleResult<User> {
        self.transition(user_id, "application rejected", |user, clock| {
            user.reject(clock)
        })
        .await
    }

    /// Stores the completion documents and moves the student to
    /// [`UserStatus::ReadyForAssignment`].
    ///
    /// The application files are released once the update is committed.
    ///
    /// # Errors
    ///
    /// Returns [`UserRepositoryError::NotFound`] for an unknown user,
    /// [`UserDomainError::InvalidState`] unless the user is
    /// [`UserStatus::DocumentsPending`],
    /// [`UserDomainError::MissingRequiredDocument`] when the transcript or
    /// recommendation is missing, and [`UserLifecycleError::Storage`] when a
    /// file cannot be stored. Nothing is stored or changed on error.
    pub async fn submit_documents(
        &self,
        request: SubmitDocumentsRequest,
    ) -> UserLifecycleResult<User> {
        let SubmitDocumentsRequest {
            user_id,
            transcript,
            recommendation,
            portfolio,
        } = request;
        let _guard = self.locks.lock(&user_id).await;
        let mut user = self.find_by_id_or_error(user_id).await?;
        user.ensure_accepts_documents()?;
        require_documents(transcript.as_ref(), recommendation.as_ref())?;

        let mut staged = StagedBlobs::new(&*self.blobs);
        let result: UserLifecycleResult<ApplicationDocuments> = async {
            let category = BlobCategory::IdentityDocument;
            let documents = CompletionDocuments {
                transcript: staged.stage_optional(transcript.as_ref(), category).await?,
                recommendation: staged
                    .stage_optional(recommendation.as_ref(), category)
                    .await?,
                portfolio: staged.stage_optional(portfolio.as_ref(), category).await?,
            };
            let retired = user.submit_documents(documents, &*self.clock)?;
            self.repository.update(&user).await?;
            Ok(retired)
        }
        .await;
        let retired = staged.settle(result).await?;

        release_blobs(
            &*self.blobs,
            retired
                .attachments()
                .map(|file| (file.reference.clone(), BlobCategory::ApplicationDocument)),
        )
        .await;
        tracing::info!(
            %user_id,
            from = %UserStatus::DocumentsPending,
            to = %user.status(),
            "completion documents submitted"
        );
        Ok(user)
    }

    /// Creates a supervisor directly in [`UserStatus::Approved`].
    ///
    /// # Errors
    ///
    /// Returns [`UserRepositoryError::DuplicateEmail`] when the email is
    /// taken and [`UserLifecycleError::Domain`] for malformed input.
    pub async fn create_supervisor(
        &self,
        request: CreateSupervisorRequest,
    ) -> UserLifecycleResult<User> {
        let CreateSupervisorRequest {
            name,
            email,
            password,
            department,
        } = request;
        let email_address = EmailAddress::new(email)?;
        self.ensure_email_free(&email_address).await?;
        let credential = self.hash_password(password).await?;
        let supervisor = NewSupervisor {
            name,
            email: email_address,
            department,
        };
        let user = User::new_supervisor(supervisor, credential, &*self.clock)?;
        self.repository.store(&user).await?;
        tracing::info!(user_id = %user.id(), "supervisor created");
        Ok(user)
    }

    /// Applies administrative edits to a supervisor.
    ///
    /// # Errors
    ///
    /// Returns [`UserRepositoryError::NotFound`] for an unknown user,
    /// [`UserDomainError::RoleMismatch`] when the user is not a supervisor,
    /// and [`UserRepositoryError::DuplicateEmail`] when the new email is
    /// taken by another user.
    pub async fn update_supervisor(
        &self,
        request: UpdateSupervisorRequest,
    ) -> UserLifecycleResult<User> {
        let UpdateSupervisorRequest {
            id,
            name,
            email,
            department,
        } = request;
        let changes = SupervisorChanges {
            name,
            email: email.map(EmailAddress::new).transpose()?,
            department,
        };
        let _guard = self.locks.lock(&id).await;
        let mut user = self.find_by_id_or_error(id).await?;
        user.update_supervisor(changes, &*self.clock)?;
        self.repository.update(&user).await?;
        tracing::info!(user_id = %id, "supervisor updated");
        Ok(user)
    }

    /// Deletes a supervisor.
    ///
    /// Students and tasks that reference the supervisor keep the identifier.
    ///
    /// # Errors
    ///
    /// Returns [`UserRepositoryError::NotFound`] for an unknown user and
    /// [`UserDomainError::RoleMismatch`] when the user is not a supervisor.
    pub async fn delete_supervisor(&self, id: UserId) -> UserLifecycleResult<()> {
        let _guard = self.locks.lock(&id).await;
        let user = self.find_by_id_or_error(id).await?;
        user.ensure_role(Role::Supervisor)?;
        let dangling = self
            .repository
            .count(&UserQuery::all().with_role(Role::Student).with_supervisor(id))
            .await?;
        self.repository.delete(id).await?;
        if dangling > 0 {
            tracing::warn!(user_id = %id, students = dangling, "deleted supervisor still referenced by students");
        }
        tracing::info!(user_id = %id, "supervisor deleted");
        Ok(())
    }

    /// Creates an admin account directly in [`UserStatus::Approved`].
    ///
    /// # Errors
    ///
    /// Returns [`UserRepositoryError::DuplicateEmail`] when the email is
    /// taken and [`UserLifecycleError::Domain`] for malformed input.
    pub async fn create_admin(&self, request: CreateAdminRequest) -> UserLifecycleResult<User> {
        let CreateAdminRequest {
            name,
            email,
            password,
        } = request;
        let email_address = EmailAddress::new(email)?;
        self.ensure_email_free(&email_address).await?;
        let credential = self.hash_password(password).await?;
        let user = User::new_admin(name, email_address, credential, &*self.clock)?;
        self.repository.store(&user).await?;
        tracing::info!(user_id = %user.id(), "admin created");
        Ok(user)
    }

    /// Returns the user identified by `email` when `password` matches.
    ///
    /// # Errors
    ///
    /// Returns [`UserLifecycleError::InvalidCredentials`] for a malformed or
    /// unknown email and for a wrong password alike.
    pub async fn authenticate(&self, email: &str, password: &str) -> UserLifecycleResult<User> {
        let Ok(email_address) = EmailAddress::new(email) else {
            return Err(UserLifecycleError::InvalidCredentials);
        };
        let Some(user) = self.repository.find_by_email(&email_address).await? else {
            tracing::debug!(email = %email_address, "authentication for unknown email");
            return Err(UserLifecycleError::InvalidCredentials);
        };
        let verified = self
            .verify_password(Password::new(password), user.credential().clone())
            .await?;
        if !verified {
            tracing::debug!(user_id = %user.id(), "authentication with wrong password");
            return Err(UserLifecycleError::InvalidCredentials);
        }
        Ok(user)
    }

    /// Retrieves a user by identifier.
    ///
    /// Returns `Ok(None)` when the user does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`UserLifecycleError::Repository`] when the lookup fails.
    pub async fn find_by_id(&self, id: UserId) -> UserLifecycleResult<Option<User>> {
        Ok(self.repository.find_by_id(id).await?)
    }

    /// Retrieves a user by login email.
    ///
    /// Returns `Ok(None)` when no user has the email.
    ///
    /// # Errors
    ///
    /// Returns [`UserLifecycleError::Repository`] when the lookup fails.
    pub async fn find_by_email(&self, email: &EmailAddress) -> UserLifecycleResult<Option<User>> {
        Ok(self.repository.find_by_email(email).await?)
    }

    /// Lists every user holding `role`, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`UserLifecycleError::Repository`] when the lookup fails.
    pub async fn list_by_role(&self, role: Role) -> UserLifecycleResult<Vec<User>> {
        Ok(self.repository.list(&UserQuery::all().with_role(role)).await?)
    }

    /// Lists every user holding `role` in `status`, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`UserLifecycleError::Repository`] when the lookup fails.
    pub async fn list_by_role_and_status(
        &self,
        role: Role,
        status: UserStatus,
    ) -> UserLifecycleResult<Vec<User>> {
        let query = UserQuery::all().with_role(role).with_status(status);
        Ok(self.repository.list(&query).await?)
    }

    async fn transition<F>(
        &self,
        user_id: UserId,
        event: &'static str,
        apply: F,
    ) -> UserLifecycleResult<User>
    where
        F: FnOnce(&mut User, &C) -> Result<(), UserDomainError> + Send,
    {
        let _guard = self.locks.lock(&user_id).await;
        let mut user = self.find_by_id_or_error(user_id).await?;
        let from = user.status();
        apply(&mut user, &*self.clock)?;
        self.repository.update(&user).await?;
        tracing::info!(%user_id, %from, to = %user.status(), "{event}");
        Ok(user)
    }

    async fn ensure_email_free(&self, email: &EmailAddress) -> UserLifecycleResult<()> {
        if self.repository.find_by_email(email).await?.is_some() {
            return Err(UserRepositoryError::DuplicateEmail(email.clone()).into());
        }
        Ok(())
    }

    async fn hash_password(&self, password: Password) -> UserLifecycleResult<CredentialHash> {
        if password.expose().is_empty() {
            return Err(UserDomainError::EmptyPassword.into());
        }
        let hasher = Arc::clone(&self.hasher);
        let hash = tokio::task::spawn_blocking(move || hasher.hash(password.expose()))
            .await
            .map_err(|err| CredentialError::Worker(err.to_string()))??;
        Ok(hash)
    }

    async fn verify_password(
        &self,
        password: Password,
        credential: CredentialHash,
    ) -> UserLifecycleResult<bool> {
        let hasher = Arc::clone(&self.hasher);
        let verified =
            tokio::task::spawn_blocking(move || hasher.verify(password.expose(), &credential))
                .await
                .map_err(|err| CredentialError::Worker(err.to_string()))??;
        Ok(verified)
    }

    async fn find_by_id_or_error(&self, id: UserId) -> UserLifecycleResult<User> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| UserRepositoryError::NotFound(id).into())
    }
}
