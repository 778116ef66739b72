//! In-memory adapters for task persistence and collaborators.

mod collaborators;
mod task;

pub use collaborators::{
    InMemoryDepartmentDirectory, RecordingNotifier, RecordingProjectProgress, SentNotification,
};
pub use task::InMemoryTaskRepository;
