//! Repository port for task persistence and lookup.

use crate::audit::{domain::TaskStatusHistoryEntry, ports::AuditRepositoryError};
use crate::task::domain::{ProjectId, Task, TaskId, TaskStatus};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for task repository operations.
pub type TaskRepositoryResult<T> = Result<T, TaskRepositoryError>;

/// Task persistence contract.
///
/// Task records are owned by an external collaborator; the workflow engine
/// mutates status and blocking fields only through
/// [`TaskRepository::update_status`] and
/// [`TaskRepository::update_status_with_history`].
///
/// The `*_with_history` operations write the task and its status history
/// entry as one unit: either both are stored or neither is. Implementations
/// append into the same store the workflow's status history port reads.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Stores a new task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::DuplicateTask`] when the task ID already
    /// exists.
    async fn store(&self, task: &Task) -> TaskRepositoryResult<()>;

    /// Stores a new task together with its creation history entry.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::DuplicateTask`] when the task ID
    /// already exists or [`TaskRepositoryError::History`] when the entry
    /// cannot be appended. Nothing is stored in either case.
    async fn store_with_history(
        &self,
        task: &Task,
        entry: &TaskStatusHistoryEntry,
    ) -> TaskRepositoryResult<()>;

    /// Persists changes to an existing task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the task does not exist.
    async fn update(&self, task: &Task) -> TaskRepositoryResult<()>;

    /// Persists a status change if the stored status still equals
    /// `expected_status`.
    ///
    /// The comparison and write happen atomically so two concurrent
    /// transitions on the same task cannot both commit.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the task does not exist
    /// or [`TaskRepositoryError::StatusConflict`] when another writer changed
    /// the status first.
    async fn update_status(
        &self,
        task: &Task,
        expected_status: &TaskStatus,
    ) -> TaskRepositoryResult<()>;

    /// Applies [`TaskRepository::update_status`] and appends `entry` as
    /// one unit.
    ///
    /// # Errors
    ///
    /// Returns the errors of [`TaskRepository::update_status`], or
    /// [`TaskRepositoryError::History`] when the entry cannot be appended.
    /// The stored status is unchanged whenever an error is returned.
    async fn update_status_with_history(
        &self,
        task: &Task,
        expected_status: &TaskStatus,
        entry: &TaskStatusHistoryEntry,
    ) -> TaskRepositoryResult<()>;

    /// Finds a task by identifier.
    ///
    /// Returns `None` when the task does not exist.
    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>>;

    /// Returns the tasks among `ids` that exist. Missing identifiers are
    /// skipped.
    async fn find_by_ids(&self, ids: &[TaskId]) -> TaskRepositoryResult<Vec<Task>>;

    /// Returns all tasks belonging to a project.
    async fn find_by_project(&self, project_id: ProjectId) -> TaskRepositoryResult<Vec<Task>>;
}

/// Errors returned by task repository implementations.
#[derive(Debug, Clone, Error)]
pub enum TaskRepositoryError {
    /// A task with the same identifier already exists.
    #[error("duplicate task identifier: {0}")]
    DuplicateTask(TaskId),

    /// The task was not found.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// The stored status no longer matches the status the caller read.
    #[error("task {task_id} status changed concurrently: expected '{expected}', found '{actual}'")]
    StatusConflict {
        /// Task being transitioned.
        task_id: TaskId,
        /// Status the caller validated against.
        expected: TaskStatus,
        /// Status currently stored.
        actual: TaskStatus,
    },

    /// The status history entry written with the task was rejected.
    #[error(transparent)]
    History(#[from] AuditRepositoryError),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl TaskRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
