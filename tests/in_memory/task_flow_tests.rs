//! Task lifecycle across services: creation, responses, grading, stats.

use super::helpers::{Campus, campus, upload};
use cohort::{
    dashboard::{StudentStats, SupervisorStats},
    storage::{domain::BlobCategory, ports::BlobStore},
    task::{
        domain::TaskStatus,
        services::{CreateTaskRequest, GradeTaskRequest, TaskResponseRequest},
    },
};
use rstest::rstest;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn supervisor_sets_and_grades_a_task(campus: eyre::Result<Campus>) -> eyre::Result<()> {
    let site = campus?;
    let (student_id, supervisor_id) = site.assigned_pair().await?;

    let task = site
        .tasks
        .create_task(
            CreateTaskRequest::new("Essay", "2026-11-30", "Urgent", student_id, supervisor_id)
                .with_attachment(upload("brief.pdf")?),
        )
        .await?;
    let brief = task
        .attachment()
        .cloned()
        .ok_or_else(|| eyre::eyre!("brief should be stored"))?;
    let resolved = site
        .blobs
        .resolve(&brief.reference, BlobCategory::TaskAttachment)
        .await?;
    eyre::ensure!(resolved.bytes == b"content of brief.pdf");

    site.tasks
        .submit_response(
            TaskResponseRequest::new(task.id(), "Outline")
                .with_file(upload("outline.docx")?)
                .acting_as(student_id),
        )
        .await?;
    site.tasks
        .complete_task(TaskResponseRequest::new(task.id(), "Final").acting_as(student_id))
        .await?;
    let graded = site
        .tasks
        .grade_task(GradeTaskRequest::new(task.id(), "A", "Well argued").acting_as(supervisor_id))
        .await?;

    eyre::ensure!(graded.status() == TaskStatus::Completed);
    eyre::ensure!(graded.response() == Some("Final"));
    eyre::ensure!(
        graded
            .response_file()
            .is_some_and(|file| file.file_name == "outline.docx")
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn dashboards_follow_task_progress(campus: eyre::Result<Campus>) -> eyre::Result<()> {
    let site = campus?;
    let (student_id, supervisor_id) = site.assigned_pair().await?;
    let mut created = Vec::new();
    for (title, due) in [("One", "2026-11-01"), ("Two", "2026-11-02"), ("Three", "2026-11-03")] {
        let request = CreateTaskRequest::new(title, due, "medium", student_id, supervisor_id);
        created.push(site.tasks.create_task(request).await?.id());
    }
    let [first, second, third] = created.as_slice() else {
        eyre::bail!("expected three tasks");
    };
    site.tasks
        .submit_response(TaskResponseRequest::new(*first, "started"))
        .await?;
    site.tasks
        .complete_task(TaskResponseRequest::new(*second, "done"))
        .await?;
    site.tasks.mark_overdue(*third).await?;

    let student = site.dashboard.student_stats(student_id).await?;
    let supervisor = site.dashboard.supervisor_stats(supervisor_id).await?;

    eyre::ensure!(
        student
            == StudentStats {
                active_tasks: 1,
                completed_tasks: 1,
                total_tasks: 3,
            }
    );
    eyre::ensure!(
        supervisor
            == SupervisorStats {
                assigned_students: 1,
                total_tasks: 3,
                pending_tasks: 0,
                completed_tasks: 1,
            }
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn deleting_a_task_removes_its_files(campus: eyre::Result<Campus>) -> eyre::Result<()> {
    let site = campus?;
    let (student_id, supervisor_id) = site.assigned_pair().await?;
    let task = site
        .tasks
        .create_task(
            CreateTaskRequest::new("Lab", "2026-12-01", "low", student_id, supervisor_id)
                .with_attachment(upload("lab.pdf")?),
        )
        .await?;
    let answered = site
        .tasks
        .submit_response(TaskResponseRequest::new(task.id(), "results").with_file(upload("r.csv")?))
        .await?;

    site.tasks.delete_task(task.id()).await?;

    for (file, category) in [
        (task.attachment(), BlobCategory::TaskAttachment),
        (answered.response_file(), BlobCategory::ResponseAttachment),
    ] {
        let reference = &file
            .ok_or_else(|| eyre::eyre!("file should have been stored"))?
            .reference;
        eyre::ensure!(site.blobs.resolve(reference, category).await.is_err());
    }
    eyre::ensure!(site.tasks.tasks_for_student(student_id).await?.is_empty());
    Ok(())
}
