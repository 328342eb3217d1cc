//! Shared world state for onboarding BDD scenarios.

use std::sync::Arc;

use cohort::{
    config::CredentialSettings,
    storage::adapters::memory::InMemoryBlobStore,
    user::{
        adapters::{hashing::Argon2CredentialHasher, memory::InMemoryUserRepository},
        domain::{User, UserId},
        services::{AssignmentCoordinator, UserLifecycleError, UserLifecycleService},
    },
};
use mockable::DefaultClock;
use rstest::fixture;

/// Service type used by the BDD world.
pub type TestUserService = UserLifecycleService<
    InMemoryUserRepository,
    InMemoryBlobStore,
    Argon2CredentialHasher,
    DefaultClock,
>;

/// Scenario world for onboarding behaviour tests.
pub struct OnboardingWorld {
    pub service: TestUserService,
    pub assignments: AssignmentCoordinator<InMemoryUserRepository, DefaultClock>,
    pub student_id: Option<UserId>,
    pub supervisor_id: Option<UserId>,
    pub last_result: Option<Result<User, UserLifecycleError>>,
}

impl OnboardingWorld {
    /// Creates a world over empty in-memory stores.
    ///
    /// # Panics
    ///
    /// Panics when the minimal Argon2 parameters are rejected.
    #[must_use]
    pub fn new() -> Self {
        let hasher = Argon2CredentialHasher::from_settings(&CredentialSettings {
            memory_kib: 8,
            iterations: 1,
            parallelism: 1,
        })
        .expect("minimal argon2 parameters are valid");
        let service = UserLifecycleService::new(
            Arc::new(InMemoryUserRepository::new()),
            Arc::new(InMemoryBlobStore::new()),
            Arc::new(hasher),
            Arc::new(DefaultClock),
        );
        let assignments = service.assignment_coordinator();
        Self {
            service,
            assignments,
            student_id: None,
            supervisor_id: None,
            last_result: None,
        }
    }

    /// Returns the applicant registered by a given step.
    ///
    /// # Errors
    ///
    /// Returns an error when no applicant has been registered yet.
    pub fn student(&self) -> eyre::Result<UserId> {
        self.student_id
            .ok_or_else(|| eyre::eyre!("missing applicant in scenario world"))
    }

    /// Returns the supervisor created by a given step.
    ///
    /// # Errors
    ///
    /// Returns an error when no supervisor has been created yet.
    pub fn supervisor(&self) -> eyre::Result<UserId> {
        self.supervisor_id
            .ok_or_else(|| eyre::eyre!("missing supervisor in scenario world"))
    }

    /// Returns the outcome of the latest when step.
    ///
    /// # Errors
    ///
    /// Returns an error when no outcome has been recorded.
    pub fn last_result(&self) -> eyre::Result<&Result<User, UserLifecycleError>> {
        self.last_result
            .as_ref()
            .ok_or_else(|| eyre::eyre!("missing result in scenario world"))
    }
}

impl Default for OnboardingWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> OnboardingWorld {
    OnboardingWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
