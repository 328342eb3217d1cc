//! When steps for onboarding BDD scenarios.

use super::world::{OnboardingWorld, run_async};
use cohort::{
    storage::domain::Upload,
    user::services::{RegisterApplicationRequest, SubmitDocumentsRequest},
};
use eyre::WrapErr;
use rstest_bdd_macros::when;

fn upload(name: &str) -> Result<Upload, eyre::Report> {
    Upload::new(name, b"scanned".to_vec()).wrap_err("build upload")
}

#[when("the admin approves the application")]
fn approve_application(world: &mut OnboardingWorld) -> Result<(), eyre::Report> {
    let student_id = world.student()?;
    world.last_result = Some(run_async(world.service.approve(student_id)));
    Ok(())
}

#[when("the admin rejects the application")]
fn reject_application(world: &mut OnboardingWorld) -> Result<(), eyre::Report> {
    let student_id = world.student()?;
    world.last_result = Some(run_async(world.service.reject(student_id)));
    Ok(())
}

#[when("the student submits a transcript and a recommendation")]
fn submit_required_documents(world: &mut OnboardingWorld) -> Result<(), eyre::Report> {
    let request = SubmitDocumentsRequest::new(world.student()?)
        .with_transcript(upload("transcript.pdf")?)
        .with_recommendation(upload("recommendation.pdf")?);
    world.last_result = Some(run_async(world.service.submit_documents(request)));
    Ok(())
}

#[when("the student submits only a transcript")]
fn submit_transcript_only(world: &mut OnboardingWorld) -> Result<(), eyre::Report> {
    let request =
        SubmitDocumentsRequest::new(world.student()?).with_transcript(upload("transcript.pdf")?);
    world.last_result = Some(run_async(world.service.submit_documents(request)));
    Ok(())
}

#[when("the admin assigns the student to the supervisor")]
fn assign_student(world: &mut OnboardingWorld) -> Result<(), eyre::Report> {
    let student_id = world.student()?;
    let supervisor_id = world.supervisor()?;
    let student = run_async(
        world
            .assignments
            .assign_student_to_supervisor(student_id, supervisor_id),
    )
    .wrap_err("assign student to supervisor")?;
    world.last_result = Some(Ok(student));
    Ok(())
}

#[when(r#"another applicant registers as "{email}" with student number "{number}""#)]
fn register_second_application(world: &mut OnboardingWorld, email: String, number: String) {
    let request = RegisterApplicationRequest::new("Eve Student", email, "another-pass", number);
    world.last_result = Some(run_async(world.service.register_application(request)));
}
