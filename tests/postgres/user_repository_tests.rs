//! `PostgreSQL` user repository behaviour.

use crate::postgres::helpers::{TestDatabase, test_database};
use cohort::storage::domain::{BlobRef, FileAttachment};
use cohort::user::{
    adapters::postgres::PostgresUserRepository,
    domain::{
        ApplicationDocuments, CredentialHash, EmailAddress, NewSupervisor, Role, StudentNumber,
        StudentProfile, StudentRegistration, User, UserStatus, UserSummary,
    },
    ports::{UserQuery, UserRepository, UserRepositoryError},
};
use mockable::DefaultClock;
use rstest::rstest;

fn applicant(email: &str, number: &str) -> eyre::Result<User> {
    let registration = StudentRegistration {
        name: "Ada Student".to_owned(),
        email: EmailAddress::new(email)?,
        profile: StudentProfile {
            student_number: StudentNumber::new(number)?,
            phone: "+44 20 7946 0000".to_owned(),
            university: "Example University".to_owned(),
            major: "Physics".to_owned(),
            academic_year: "3".to_owned(),
        },
        documents: ApplicationDocuments {
            cv: Some(FileAttachment {
                file_name: "cv.pdf".to_owned(),
                reference: BlobRef::generate("cv.pdf"),
                content_type: Some("application/pdf".to_owned()),
                size: 42,
            }),
            motivation_letter: None,
        },
    };
    Ok(User::register_student(
        registration,
        CredentialHash::from_encoded("$argon2id$placeholder"),
        &DefaultClock,
    )?)
}

fn mentor(email: &str) -> eyre::Result<User> {
    let supervisor = NewSupervisor {
        name: "Grace Supervisor".to_owned(),
        email: EmailAddress::new(email)?,
        department: Some("Physics".to_owned()),
    };
    Ok(User::new_supervisor(
        supervisor,
        CredentialHash::from_encoded("$argon2id$placeholder"),
        &DefaultClock,
    )?)
}

#[rstest]
fn users_survive_a_round_trip(test_database: eyre::Result<TestDatabase>) -> eyre::Result<()> {
    let database = test_database?;
    let repository = PostgresUserRepository::new(database.pool());
    database.block_on(async {
        let mut student = applicant("ada@example.com", "S-1")?;
        let supervisor = mentor("grace@example.com")?;
        repository.store(&student).await?;
        repository.store(&supervisor).await?;

        student.approve(&DefaultClock)?;
        student.assign_supervisor(&supervisor, &DefaultClock)?;
        repository.update(&student).await?;

        let loaded = repository.find_by_id(student.id()).await?;
        let by_number = repository
            .find_by_student_number(&StudentNumber::new("S-1")?)
            .await?;
        let stored = loaded.ok_or_else(|| eyre::eyre!("student should be stored"))?;
        // Timestamps lose sub-microsecond precision in the database.
        eyre::ensure!(UserSummary::from(&stored) == UserSummary::from(&student));
        eyre::ensure!(stored.student_profile() == student.student_profile());
        eyre::ensure!(stored.application_documents() == student.application_documents());
        eyre::ensure!(by_number.map(|user| user.id()) == Some(student.id()));
        Ok(())
    })
}

#[rstest]
fn unique_indexes_map_to_duplicate_errors(
    test_database: eyre::Result<TestDatabase>,
) -> eyre::Result<()> {
    let database = test_database?;
    let repository = PostgresUserRepository::new(database.pool());
    database.block_on(async {
        repository.store(&applicant("ada@example.com", "S-1")?).await?;

        let same_email = repository.store(&applicant("ada@example.com", "S-2")?).await;
        let same_number = repository.store(&applicant("eve@example.com", "S-1")?).await;

        eyre::ensure!(matches!(same_email, Err(UserRepositoryError::DuplicateEmail(_))));
        eyre::ensure!(matches!(
            same_number,
            Err(UserRepositoryError::DuplicateStudentNumber(_))
        ));
        Ok(())
    })
}

#[rstest]
fn queries_filter_and_count(test_database: eyre::Result<TestDatabase>) -> eyre::Result<()> {
    let database = test_database?;
    let repository = PostgresUserRepository::new(database.pool());
    database.block_on(async {
        let supervisor = mentor("grace@example.com")?;
        let mut assigned = applicant("ada@example.com", "S-1")?;
        assigned.assign_supervisor(&supervisor, &DefaultClock)?;
        for user in [&supervisor, &assigned, &applicant("eve@example.com", "S-2")?] {
            repository.store(user).await?;
        }

        let pending = repository
            .count(&UserQuery::all().with_role(Role::Student).with_status(UserStatus::Pending))
            .await?;
        let roster = repository
            .list(&UserQuery::all().with_supervisor(supervisor.id()))
            .await?;

        eyre::ensure!(pending == 1);
        eyre::ensure!(roster.iter().map(User::id).eq([assigned.id()]));
        Ok(())
    })
}

#[rstest]
fn delete_reports_missing_users(test_database: eyre::Result<TestDatabase>) -> eyre::Result<()> {
    let database = test_database?;
    let repository = PostgresUserRepository::new(database.pool());
    database.block_on(async {
        let supervisor = mentor("grace@example.com")?;
        repository.store(&supervisor).await?;

        repository.delete(supervisor.id()).await?;
        let again = repository.delete(supervisor.id()).await;

        eyre::ensure!(matches!(again, Err(UserRepositoryError::NotFound(_))));
        Ok(())
    })
}
