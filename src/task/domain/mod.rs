//! Domain model for supervisor-assigned tasks.
//!
//! A task links one student to one supervisor. Students respond, supervisors
//! grade, and the status moves from pending to in progress to completed.
//! Infrastructure concerns stay outside the domain boundary.

mod due_date;
mod error;
mod ids;
mod priority;
mod status;
mod task;

pub use due_date::parse_due_date;
pub use error::{
    ParseTaskPriorityError, ParseTaskStatusError, TaskDomainError, TaskParticipant,
};
pub use ids::TaskId;
pub use priority::TaskPriority;
pub use status::TaskStatus;
pub use task::{NewTask, PersistedTaskData, Task, TaskEdits, TaskResponse};
