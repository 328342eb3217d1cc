//! Shared world state for task lifecycle BDD scenarios.

use std::sync::Arc;

use cohort::{
    storage::adapters::memory::InMemoryBlobStore,
    task::{
        adapters::memory::InMemoryTaskRepository,
        domain::{Task, TaskId},
        services::{TaskLifecycleError, TaskLifecycleService},
    },
    user::{adapters::memory::InMemoryUserRepository, domain::UserId},
};
use mockable::DefaultClock;
use rstest::fixture;

/// Service type used by the BDD world.
pub type TestTaskService = TaskLifecycleService<
    InMemoryTaskRepository,
    InMemoryUserRepository,
    InMemoryBlobStore,
    DefaultClock,
>;

/// Scenario world for task lifecycle behaviour tests.
pub struct TaskWorld {
    pub service: TestTaskService,
    pub users: Arc<InMemoryUserRepository>,
    pub student_id: Option<UserId>,
    pub supervisor_id: Option<UserId>,
    pub task_id: Option<TaskId>,
    pub last_result: Option<Result<Task, TaskLifecycleError>>,
}

impl TaskWorld {
    /// Creates a world over empty in-memory stores.
    #[must_use]
    pub fn new() -> Self {
        let users = Arc::new(InMemoryUserRepository::new());
        let service = TaskLifecycleService::new(
            Arc::new(InMemoryTaskRepository::new()),
            Arc::clone(&users),
            Arc::new(InMemoryBlobStore::new()),
            Arc::new(DefaultClock),
        );
        Self {
            service,
            users,
            student_id: None,
            supervisor_id: None,
            task_id: None,
            last_result: None,
        }
    }

    /// Returns the participants seeded by the background step.
    ///
    /// # Errors
    ///
    /// Returns an error when no participants were seeded.
    pub fn participants(&self) -> eyre::Result<(UserId, UserId)> {
        self.student_id
            .zip(self.supervisor_id)
            .ok_or_else(|| eyre::eyre!("missing participants in scenario world"))
    }

    /// Returns the task created by a given step.
    ///
    /// # Errors
    ///
    /// Returns an error when no task has been created.
    pub fn task(&self) -> eyre::Result<TaskId> {
        self.task_id
            .ok_or_else(|| eyre::eyre!("missing task in scenario world"))
    }

    /// Returns the outcome of the latest when step.
    ///
    /// # Errors
    ///
    /// Returns an error when no outcome has been recorded.
    pub fn last_result(&self) -> eyre::Result<&Result<Task, TaskLifecycleError>> {
        self.last_result
            .as_ref()
            .ok_or_else(|| eyre::eyre!("missing result in scenario world"))
    }
}

impl Default for TaskWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> TaskWorld {
    TaskWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
