//! Application services for task lifecycle orchestration.

mod lifecycle;

pub use lifecycle::{
    CreateTaskRequest, GradeTaskRequest, TaskLifecycleError, TaskLifecycleResult,
    TaskLifecycleService, TaskResponseRequest, UpdateTaskRequest,
};
