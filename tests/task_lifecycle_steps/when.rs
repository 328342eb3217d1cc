//! When steps for task lifecycle BDD scenarios.

use super::world::{TaskWorld, run_async};
use cohort::task::services::{CreateTaskRequest, GradeTaskRequest, TaskResponseRequest};
use rstest_bdd_macros::when;

#[when(r#"the student submits the response "{text}""#)]
fn submit_response(world: &mut TaskWorld, text: String) -> Result<(), eyre::Report> {
    let (student_id, _) = world.participants()?;
    let request = TaskResponseRequest::new(world.task()?, text).acting_as(student_id);
    world.last_result = Some(run_async(world.service.submit_response(request)));
    Ok(())
}

#[when(r#"the student completes the task with "{text}""#)]
fn complete_task(world: &mut TaskWorld, text: String) -> Result<(), eyre::Report> {
    let (student_id, _) = world.participants()?;
    let request = TaskResponseRequest::new(world.task()?, text).acting_as(student_id);
    world.last_result = Some(run_async(world.service.complete_task(request)));
    Ok(())
}

#[when(r#"the supervisor creates a task "{title}" due "{due_date}" with priority "{priority}""#)]
fn create_task(
    world: &mut TaskWorld,
    title: String,
    due_date: String,
    priority: String,
) -> Result<(), eyre::Report> {
    let (student_id, supervisor_id) = world.participants()?;
    let request = CreateTaskRequest::new(title, due_date, priority, student_id, supervisor_id);
    world.last_result = Some(run_async(world.service.create_task(request)));
    Ok(())
}

#[when(r#"the supervisor grades the task "{grade}" with feedback "{feedback}""#)]
fn grade_task(world: &mut TaskWorld, grade: String, feedback: String) -> Result<(), eyre::Report> {
    let (_, supervisor_id) = world.participants()?;
    let request = GradeTaskRequest::new(world.task()?, grade, feedback).acting_as(supervisor_id);
    world.last_result = Some(run_async(world.service.grade_task(request)));
    Ok(())
}
