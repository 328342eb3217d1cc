//! Shared wiring for the in-memory integration tests.

use std::sync::Arc;

use camino::Utf8Path;
use cohort::{
    config::CredentialSettings,
    dashboard::DashboardService,
    storage::{adapters::filesystem::FilesystemBlobStore, domain::Upload},
    task::{adapters::memory::InMemoryTaskRepository, services::TaskLifecycleService},
    user::{
        adapters::{hashing::Argon2CredentialHasher, memory::InMemoryUserRepository},
        domain::UserId,
        services::{
            AssignmentCoordinator, CreateSupervisorRequest, RegisterApplicationRequest,
            SubmitDocumentsRequest, UserLifecycleService,
        },
    },
};
use mockable::DefaultClock;
use rstest::fixture;
use tempfile::TempDir;

/// User lifecycle service over the shared adapters.
pub type Users = UserLifecycleService<
    InMemoryUserRepository,
    FilesystemBlobStore,
    Argon2CredentialHasher,
    DefaultClock,
>;

/// Task lifecycle service over the shared adapters.
pub type Tasks = TaskLifecycleService<
    InMemoryTaskRepository,
    InMemoryUserRepository,
    FilesystemBlobStore,
    DefaultClock,
>;

/// Every service wired to one set of repositories and an upload directory.
pub struct Campus {
    pub users: Users,
    pub assignments: AssignmentCoordinator<InMemoryUserRepository, DefaultClock>,
    pub tasks: Tasks,
    pub dashboard: DashboardService<InMemoryUserRepository, InMemoryTaskRepository>,
    pub blobs: Arc<FilesystemBlobStore>,
    pub upload_dir: TempDir,
}

/// Builds a campus whose uploads land in a fresh temporary directory.
///
/// # Errors
///
/// Returns an error when the temporary directory or blob store cannot be
/// created.
#[fixture]
pub fn campus() -> eyre::Result<Campus> {
    let upload_dir = tempfile::tempdir()?;
    let root = Utf8Path::from_path(upload_dir.path())
        .ok_or_else(|| eyre::eyre!("temporary directory is not UTF-8"))?;
    let blobs = Arc::new(FilesystemBlobStore::open(root)?);
    let user_repository = Arc::new(InMemoryUserRepository::new());
    let task_repository = Arc::new(InMemoryTaskRepository::new());
    let clock = Arc::new(DefaultClock);
    let hasher = Arc::new(Argon2CredentialHasher::from_settings(&CredentialSettings {
        memory_kib: 8,
        iterations: 1,
        parallelism: 1,
    })?);

    let users = UserLifecycleService::new(
        Arc::clone(&user_repository),
        Arc::clone(&blobs),
        hasher,
        Arc::clone(&clock),
    );
    let assignments = users.assignment_coordinator();
    let tasks = TaskLifecycleService::new(
        Arc::clone(&task_repository),
        Arc::clone(&user_repository),
        Arc::clone(&blobs),
        clock,
    );
    let dashboard = DashboardService::new(user_repository, task_repository);
    Ok(Campus {
        users,
        assignments,
        tasks,
        dashboard,
        blobs,
        upload_dir,
    })
}

/// Builds a small upload named `name`.
///
/// # Errors
///
/// Returns an error when the upload is rejected.
pub fn upload(name: &str) -> eyre::Result<Upload> {
    Ok(Upload::new(name, format!("content of {name}").into_bytes())?)
}

impl Campus {
    /// Runs an applicant through approval and document submission.
    ///
    /// # Errors
    ///
    /// Returns an error when any onboarding step fails.
    pub async fn ready_student(&self, email: &str, number: &str) -> eyre::Result<UserId> {
        let request = RegisterApplicationRequest::new("Ada Student", email, "s3cret", number)
            .with_cv(upload("cv.pdf")?);
        let student = self.users.register_application(request).await?;
        self.users.approve(student.id()).await?;
        let documents = SubmitDocumentsRequest::new(student.id())
            .with_transcript(upload("transcript.pdf")?)
            .with_recommendation(upload("recommendation.pdf")?);
        self.users.submit_documents(documents).await?;
        Ok(student.id())
    }

    /// Creates a supervisor account.
    ///
    /// # Errors
    ///
    /// Returns an error when the account cannot be created.
    pub async fn supervisor(&self, email: &str) -> eyre::Result<UserId> {
        let request = CreateSupervisorRequest::new("Grace Supervisor", email, "mentor-pass")
            .with_department("Computing");
        Ok(self.users.create_supervisor(request).await?.id())
    }

    /// Creates a student assigned to a new supervisor.
    ///
    /// # Errors
    ///
    /// Returns an error when onboarding or assignment fails.
    pub async fn assigned_pair(&self) -> eyre::Result<(UserId, UserId)> {
        let student_id = self.ready_student("ada@example.com", "S-100").await?;
        let supervisor_id = self.supervisor("grace@example.com").await?;
        self.assignments
            .assign_student_to_supervisor(student_id, supervisor_id)
            .await?;
        Ok((student_id, supervisor_id))
    }
}
