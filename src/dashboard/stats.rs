//! Dashboard projections.

use serde::Serialize;

/// Task counts for one student.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StudentStats {
    /// Tasks still pending or in progress.
    pub active_tasks: u64,
    /// Completed tasks.
    pub completed_tasks: u64,
    /// Every task set for the student.
    pub total_tasks: u64,
}

/// Student and task counts for one supervisor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SupervisorStats {
    /// Students currently assigned to the supervisor.
    pub assigned_students: u64,
    /// Every task the supervisor has set.
    pub total_tasks: u64,
    /// Tasks nobody has responded to yet.
    pub pending_tasks: u64,
    /// Completed tasks.
    pub completed_tasks: u64,
}

/// Platform-wide counts for administrators.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AdminStats {
    /// Students whose onboarding is finished.
    pub approved_students: u64,
    /// Supervisor accounts.
    pub supervisors: u64,
    /// Applications awaiting a decision.
    pub pending_approvals: u64,
    /// Accepted students that have not submitted their documents.
    pub documents_pending: u64,
    /// Students waiting for a supervisor.
    pub ready_for_assignment: u64,
    /// Completed tasks across all supervisors.
    pub completed_tasks: u64,
}
