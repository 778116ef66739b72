//! Port contracts for task persistence and external collaborators.
//!
//! Ports define infrastructure-agnostic interfaces used by task services.

pub mod collaborators;
pub mod repository;

pub use collaborators::{
    CollaboratorError, CollaboratorResult, DepartmentDirectory, Notification, NotificationKind,
    Notifier, ProjectProgress,
};
pub use repository::{TaskRepository, TaskRepositoryError, TaskRepositoryResult};
