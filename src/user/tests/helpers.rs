//! Fixtures shared by the user unit tests.

use std::sync::Arc;

use crate::config::CredentialSettings;
use crate::storage::{adapters::memory::InMemoryBlobStore, domain::Upload};
use crate::user::{
    adapters::{hashing::Argon2CredentialHasher, memory::InMemoryUserRepository},
    domain::{
        ApplicationDocuments, CredentialHash, EmailAddress, NewSupervisor, StudentNumber,
        StudentProfile, StudentRegistration, User,
    },
    services::{RegisterApplicationRequest, UserLifecycleService},
};
use mockable::DefaultClock;
use rstest::fixture;

pub type TestService =
    UserLifecycleService<InMemoryUserRepository, InMemoryBlobStore, Argon2CredentialHasher, DefaultClock>;

/// Service wired to in-memory adapters, with handles on both stores.
pub struct Harness {
    pub service: TestService,
    pub repository: Arc<InMemoryUserRepository>,
    pub blobs: Arc<InMemoryBlobStore>,
}

/// Argon2id with the smallest accepted cost so tests stay fast.
pub fn fast_hasher() -> Argon2CredentialHasher {
    Argon2CredentialHasher::from_settings(&CredentialSettings {
        memory_kib: 8,
        iterations: 1,
        parallelism: 1,
    })
    .expect("minimal argon2 parameters are valid")
}

#[fixture]
pub fn harness() -> Harness {
    let repository = Arc::new(InMemoryUserRepository::new());
    let blobs = Arc::new(InMemoryBlobStore::new());
    let service = UserLifecycleService::new(
        Arc::clone(&repository),
        Arc::clone(&blobs),
        Arc::new(fast_hasher()),
        Arc::new(DefaultClock),
    );
    Harness {
        service,
        repository,
        blobs,
    }
}

pub fn upload(name: &str) -> Upload {
    Upload::new(name, format!("content of {name}").into_bytes()).expect("non-empty upload")
}

pub fn application(email: &str, student_number: &str) -> RegisterApplicationRequest {
    RegisterApplicationRequest::new("Ada Student", email, "s3cret-pass", student_number)
        .with_phone("+44 20 7946 0000")
        .with_university("Example University")
        .with_major("Mathematics")
        .with_academic_year("2")
}

pub fn pending_student(email: &str, number: &str) -> User {
    let registration = StudentRegistration {
        name: "Ada Student".to_owned(),
        email: EmailAddress::new(email).expect("valid email"),
        profile: StudentProfile {
            student_number: StudentNumber::new(number).expect("valid student number"),
            phone: String::new(),
            university: "Example University".to_owned(),
            major: "Mathematics".to_owned(),
            academic_year: "2".to_owned(),
        },
        documents: ApplicationDocuments::default(),
    };
    User::register_student(registration, CredentialHash::from_encoded("hash"), &DefaultClock)
        .expect("valid registration")
}

pub fn supervisor(email: &str) -> User {
    let supervisor = NewSupervisor {
        name: "Grace Supervisor".to_owned(),
        email: EmailAddress::new(email).expect("valid email"),
        department: Some("Computing".to_owned()),
    };
    User::new_supervisor(supervisor, CredentialHash::from_encoded("hash"), &DefaultClock)
        .expect("valid supervisor")
}
