//! End-to-end onboarding: application, review, documents, assignment.

use super::helpers::{Campus, campus, upload};
use cohort::{
    storage::{domain::BlobCategory, ports::BlobStore},
    user::{
        domain::{Role, UserStatus},
        ports::UserRepositoryError,
        services::{RegisterApplicationRequest, UserLifecycleError},
    },
};
use rstest::rstest;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn applicant_becomes_approved_student(campus: eyre::Result<Campus>) -> eyre::Result<()> {
    let site = campus?;
    let (student_id, supervisor_id) = site.assigned_pair().await?;

    let student = site
        .users
        .find_by_id(student_id)
        .await?
        .ok_or_else(|| eyre::eyre!("student should exist"))?;
    eyre::ensure!(student.status() == UserStatus::Approved);
    eyre::ensure!(student.supervisor_id() == Some(supervisor_id));
    eyre::ensure!(student.documents_completed());
    eyre::ensure!(student.application_documents().cv.is_none());

    let transcript = student
        .completion_documents()
        .transcript
        .clone()
        .ok_or_else(|| eyre::eyre!("transcript should be recorded"))?;
    let stored = site
        .blobs
        .resolve(&transcript.reference, BlobCategory::IdentityDocument)
        .await?;
    eyre::ensure!(stored.bytes == b"content of transcript.pdf");
    eyre::ensure!(stored.content_type == "application/pdf");

    let roster = site.assignments.students_of_supervisor(supervisor_id).await?;
    eyre::ensure!(roster.len() == 1);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn retired_application_files_leave_the_upload_directory(
    campus: eyre::Result<Campus>,
) -> eyre::Result<()> {
    let site = campus?;
    site.ready_student("ada@example.com", "S-100").await?;

    let application_dir = site
        .upload_dir
        .path()
        .join(BlobCategory::ApplicationDocument.directory());
    let remaining = std::fs::read_dir(application_dir)?.count();

    eyre::ensure!(remaining == 0, "expected no application files, found {remaining}");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn registered_credentials_authenticate(campus: eyre::Result<Campus>) -> eyre::Result<()> {
    let site = campus?;
    let request = RegisterApplicationRequest::new("Ada", "ada@example.com", "correct horse", "S-1");
    let registered = site.users.register_application(request).await?;

    let signed_in = site
        .users
        .authenticate("ADA@example.com", "correct horse")
        .await?;
    let refused = site.users.authenticate("ada@example.com", "wrong").await;

    eyre::ensure!(signed_in.id() == registered.id());
    eyre::ensure!(signed_in.role() == Role::Student);
    eyre::ensure!(matches!(refused, Err(UserLifecycleError::InvalidCredentials)));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn duplicate_registration_keeps_no_uploads(campus: eyre::Result<Campus>) -> eyre::Result<()> {
    let site = campus?;
    let first = RegisterApplicationRequest::new("Ada", "ada@example.com", "pw", "S-1");
    site.users.register_application(first).await?;
    let second = RegisterApplicationRequest::new("Eve", "eve@example.com", "pw", "S-1")
        .with_cv(upload("cv.pdf")?);

    let result = site.users.register_application(second).await;

    eyre::ensure!(matches!(
        result,
        Err(UserLifecycleError::Repository(
            UserRepositoryError::DuplicateStudentNumber(_)
        ))
    ));
    let application_dir = site
        .upload_dir
        .path()
        .join(BlobCategory::ApplicationDocument.directory());
    eyre::ensure!(std::fs::read_dir(application_dir)?.count() == 0);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn admin_dashboard_tracks_onboarding(campus: eyre::Result<Campus>) -> eyre::Result<()> {
    let site = campus?;
    site.assigned_pair().await?;
    site.ready_student("bob@example.com", "S-200").await?;
    let pending = RegisterApplicationRequest::new("Cy", "cy@example.com", "pw", "S-300");
    site.users.register_application(pending).await?;

    let stats = site.dashboard.admin_stats().await?;

    eyre::ensure!(stats.approved_students == 1);
    eyre::ensure!(stats.ready_for_assignment == 1);
    eyre::ensure!(stats.pending_approvals == 1);
    eyre::ensure!(stats.supervisors == 1);
    Ok(())
}
