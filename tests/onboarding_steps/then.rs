//! Then steps for onboarding BDD scenarios.

use super::world::{OnboardingWorld, run_async};
use cohort::user::{
    domain::{RequiredDocument, UserDomainError},
    ports::UserRepositoryError,
    services::UserLifecycleError,
};
use rstest_bdd_macros::then;

#[then(r#"the student status is "{status}""#)]
fn student_status_is(world: &OnboardingWorld, status: String) -> Result<(), eyre::Report> {
    let student = run_async(world.service.find_by_id(world.student()?))
        .map_err(|err| eyre::eyre!("lookup failed: {err}"))?
        .ok_or_else(|| eyre::eyre!("student should exist"))?;
    if student.status().as_str() != status {
        return Err(eyre::eyre!(
            "expected status {status}, found {}",
            student.status()
        ));
    }
    Ok(())
}

#[then("the student is on the supervisor's roster")]
fn student_on_roster(world: &OnboardingWorld) -> Result<(), eyre::Report> {
    let student_id = world.student()?;
    let roster = run_async(world.assignments.students_of_supervisor(world.supervisor()?))
        .map_err(|err| eyre::eyre!("roster lookup failed: {err}"))?;
    if !roster.iter().any(|student| student.id() == student_id) {
        return Err(eyre::eyre!("student missing from supervisor roster"));
    }
    Ok(())
}

#[then("the registration fails because the email is taken")]
fn registration_duplicate_email(world: &OnboardingWorld) -> Result<(), eyre::Report> {
    let result = world.last_result()?;
    if !matches!(
        result,
        Err(UserLifecycleError::Repository(
            UserRepositoryError::DuplicateEmail(_)
        ))
    ) {
        return Err(eyre::eyre!("expected duplicate email error, got {result:?}"));
    }
    Ok(())
}

#[then("the submission fails for a missing recommendation")]
fn submission_missing_recommendation(world: &OnboardingWorld) -> Result<(), eyre::Report> {
    let result = world.last_result()?;
    if !matches!(
        result,
        Err(UserLifecycleError::Domain(
            UserDomainError::MissingRequiredDocument(RequiredDocument::Recommendation)
        ))
    ) {
        return Err(eyre::eyre!(
            "expected missing recommendation error, got {result:?}"
        ));
    }
    Ok(())
}

#[then("the last decision fails because the status does not allow it")]
fn decision_invalid_state(world: &OnboardingWorld) -> Result<(), eyre::Report> {
    let result = world.last_result()?;
    if !matches!(
        result,
        Err(UserLifecycleError::Domain(UserDomainError::InvalidState { .. }))
    ) {
        return Err(eyre::eyre!("expected invalid state error, got {result:?}"));
    }
    Ok(())
}
