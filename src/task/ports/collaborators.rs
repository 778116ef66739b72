//! Ports for collaborators the workflow engine calls but does not own.
//!
//! Failures from these collaborators are logged by the engine and never roll
//! back a committed transition.

use crate::task::domain::{DepartmentId, ProjectId, TaskId, UserId};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

/// Result type for collaborator calls.
pub type CollaboratorResult<T> = Result<T, CollaboratorError>;

/// Errors reported by external collaborators.
#[derive(Debug, Clone, Error)]
pub enum CollaboratorError {
    /// The collaborator could not be reached.
    #[error("collaborator unavailable: {0}")]
    Unavailable(String),

    /// The collaborator failed while handling the call.
    #[error("collaborator failed: {0}")]
    Failed(Arc<dyn std::error::Error + Send + Sync>),
}

impl CollaboratorError {
    /// Wraps an underlying collaborator error.
    pub fn failed(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Failed(Arc::new(err))
    }
}

/// Recomputes aggregate progress for a project.
#[async_trait]
pub trait ProjectProgress: Send + Sync {
    /// Recalculates progress after a task enters or leaves completion.
    ///
    /// # Errors
    ///
    /// Returns [`CollaboratorError`] when recalculation fails.
    async fn recalculate_progress(&self, project_id: ProjectId) -> CollaboratorResult<()>;
}

/// Resolves department membership.
#[async_trait]
pub trait DepartmentDirectory: Send + Sync {
    /// Returns the managers of a department.
    ///
    /// # Errors
    ///
    /// Returns [`CollaboratorError`] when the lookup fails.
    async fn find_managers_by_department_id(
        &self,
        department_id: DepartmentId,
    ) -> CollaboratorResult<Vec<UserId>>;
}

/// Kind of workflow notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    /// A task was moved into the blocked status.
    TaskBlocked,
}

/// Notification payload sent to users.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    /// Notification kind.
    pub kind: NotificationKind,
    /// Task the notification refers to.
    pub task_id: TaskId,
    /// Short title.
    pub title: String,
    /// Human-readable body.
    pub message: String,
    /// User whose action triggered the notification.
    pub actor: UserId,
}

/// Delivers notifications on a best-effort basis.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Sends `notification` to each recipient and returns how many were
    /// notified.
    ///
    /// # Errors
    ///
    /// Returns [`CollaboratorError`] when delivery fails.
    async fn notify_users(
        &self,
        recipients: &[UserId],
        notification: &Notification,
    ) -> CollaboratorResult<usize>;
}
