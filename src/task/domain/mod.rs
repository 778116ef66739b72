//! Domain model for tasks tracked by the workflow engine.
//!
//! Tasks are owned by an external persistence collaborator; this module only
//! models the fields the workflow engine reads and mutates.

mod error;
mod ids;
mod status;
mod task;

pub use error::TaskDomainError;
pub use ids::{DepartmentId, ProjectId, TaskId, UserId};
pub use status::{BlockedReason, TaskStatus};
pub use task::{BlockedState, PersistedTaskData, Task, TaskDraft};
