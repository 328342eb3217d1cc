//! Given steps for onboarding BDD scenarios.

use super::world::{OnboardingWorld, run_async};
use cohort::user::services::{CreateSupervisorRequest, RegisterApplicationRequest};
use eyre::WrapErr;
use rstest_bdd_macros::given;

#[given(r#"an application from "{email}" with student number "{number}""#)]
fn registered_application(
    world: &mut OnboardingWorld,
    email: String,
    number: String,
) -> Result<(), eyre::Report> {
    let request = RegisterApplicationRequest::new("Ada Student", email, "s3cret-pass", number)
        .with_university("Example University");
    let student = run_async(world.service.register_application(request))
        .wrap_err("register initial application")?;
    world.student_id = Some(student.id());
    Ok(())
}

#[given(r#"a supervisor "{email}""#)]
fn existing_supervisor(world: &mut OnboardingWorld, email: String) -> Result<(), eyre::Report> {
    let request = CreateSupervisorRequest::new("Grace Supervisor", email, "mentor-pass");
    let supervisor =
        run_async(world.service.create_supervisor(request)).wrap_err("create supervisor")?;
    world.supervisor_id = Some(supervisor.id());
    Ok(())
}
