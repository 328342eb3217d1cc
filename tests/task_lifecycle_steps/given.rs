//! Given steps for task lifecycle BDD scenarios.

use super::world::{TaskWorld, run_async};
use cohort::{
    storage::domain::{BlobRef, FileAttachment},
    task::services::CreateTaskRequest,
    user::{
        domain::{
            ApplicationDocuments, CompletionDocuments, CredentialHash, EmailAddress,
            NewSupervisor, StudentNumber, StudentProfile, StudentRegistration, User,
        },
        ports::UserRepository,
    },
};
use eyre::WrapErr;
use mockable::DefaultClock;
use rstest_bdd_macros::given;

fn document(name: &str) -> FileAttachment {
    FileAttachment {
        file_name: name.to_owned(),
        reference: BlobRef::generate(name),
        content_type: None,
        size: 1,
    }
}

#[given("a student assigned to a supervisor")]
fn assigned_student(world: &mut TaskWorld) -> Result<(), eyre::Report> {
    let clock = DefaultClock;
    let supervisor = User::new_supervisor(
        NewSupervisor {
            name: "Grace Supervisor".to_owned(),
            email: EmailAddress::new("grace@example.com")?,
            department: None,
        },
        CredentialHash::from_encoded("hash"),
        &clock,
    )?;
    let mut student = User::register_student(
        StudentRegistration {
            name: "Ada Student".to_owned(),
            email: EmailAddress::new("ada@example.com")?,
            profile: StudentProfile {
                student_number: StudentNumber::new("S-100")?,
                phone: String::new(),
                university: String::new(),
                major: String::new(),
                academic_year: String::new(),
            },
            documents: ApplicationDocuments::default(),
        },
        CredentialHash::from_encoded("hash"),
        &clock,
    )?;
    student.approve(&clock)?;
    student.submit_documents(
        CompletionDocuments {
            transcript: Some(document("transcript.pdf")),
            recommendation: Some(document("recommendation.pdf")),
            portfolio: None,
        },
        &clock,
    )?;
    student.assign_supervisor(&supervisor, &clock)?;

    run_async(world.users.store(&supervisor)).wrap_err("store supervisor")?;
    run_async(world.users.store(&student)).wrap_err("store student")?;
    world.student_id = Some(student.id());
    world.supervisor_id = Some(supervisor.id());
    Ok(())
}

#[given(r#"a task "{title}" due "{due_date}" with priority "{priority}""#)]
fn existing_task(
    world: &mut TaskWorld,
    title: String,
    due_date: String,
    priority: String,
) -> Result<(), eyre::Report> {
    let (student_id, supervisor_id) = world.participants()?;
    let request = CreateTaskRequest::new(title, due_date, priority, student_id, supervisor_id);
    let task = run_async(world.service.create_task(request)).wrap_err("create initial task")?;
    world.task_id = Some(task.id());
    Ok(())
}
