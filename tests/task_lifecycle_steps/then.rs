//! Then steps for task lifecycle BDD scenarios.

use super::world::{TaskWorld, run_async};
use cohort::task::{
    domain::{Task, TaskDomainError},
    services::TaskLifecycleError,
};
use rstest_bdd_macros::then;

fn current_task(world: &TaskWorld) -> Result<Task, eyre::Report> {
    run_async(world.service.find(world.task()?))
        .map_err(|err| eyre::eyre!("lookup failed: {err}"))?
        .ok_or_else(|| eyre::eyre!("task should exist"))
}

#[then(r#"the task status is "{status}""#)]
fn task_status_is(world: &TaskWorld, status: String) -> Result<(), eyre::Report> {
    let task = current_task(world)?;
    if task.status().as_str() != status {
        return Err(eyre::eyre!(
            "expected status {status}, found {}",
            task.status()
        ));
    }
    Ok(())
}

#[then(r#"the task grade is "{grade}""#)]
fn task_grade_is(world: &TaskWorld, grade: String) -> Result<(), eyre::Report> {
    let task = current_task(world)?;
    if task.grade() != Some(grade.as_str()) {
        return Err(eyre::eyre!("expected grade {grade}, found {:?}", task.grade()));
    }
    Ok(())
}

#[then("task creation fails because the priority is unknown")]
fn creation_invalid_priority(world: &TaskWorld) -> Result<(), eyre::Report> {
    let result = world.last_result()?;
    if !matches!(
        result,
        Err(TaskLifecycleError::Domain(TaskDomainError::InvalidPriority(_)))
    ) {
        return Err(eyre::eyre!("expected invalid priority error, got {result:?}"));
    }
    Ok(())
}

#[then("task creation fails because the due date is malformed")]
fn creation_invalid_due_date(world: &TaskWorld) -> Result<(), eyre::Report> {
    let result = world.last_result()?;
    if !matches!(
        result,
        Err(TaskLifecycleError::Domain(TaskDomainError::InvalidDueDate(_)))
    ) {
        return Err(eyre::eyre!("expected invalid due date error, got {result:?}"));
    }
    Ok(())
}
