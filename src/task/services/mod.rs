//! Application services for the task workflow state machine.

mod error;
mod notify;
mod workflow;

pub use error::{ValidationCode, ValidationError, WorkflowError, WorkflowResult};
pub use workflow::{
    TaskWorkflowService, TransitionOutcome, UpdateStatusRequest, WorkflowCollaborators,
};
