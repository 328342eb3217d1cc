//! Application services for the user lifecycle and supervisor assignment.

mod assignment;
mod lifecycle;

pub use assignment::{AssignmentBoard, AssignmentCoordinator, AssignmentError};
pub use lifecycle::{
    CreateAdminRequest, CreateSupervisorRequest, RegisterApplicationRequest,
    SubmitDocumentsRequest, UpdateSupervisorRequest, UserLifecycleError, UserLifecycleResult,
    UserLifecycleService,
};
