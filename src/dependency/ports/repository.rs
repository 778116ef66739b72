//! Repository port for dependency edges.

use crate::dependency::domain::{BlockingEdges, DependencyId, TaskDependency};
use crate::task::domain::TaskId;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for dependency repository operations.
pub type DependencyRepositoryResult<T> = Result<T, DependencyRepositoryError>;

/// Dependency edge persistence contract.
#[async_trait]
pub trait DependencyRepository: Send + Sync {
    /// Inserts an edge if it keeps the `BLOCKS` subgraph acyclic.
    ///
    /// The duplicate check, the cycle check, and the insert happen as one
    /// atomic step with respect to every other call of this method, so two
    /// concurrent inserts can never jointly close a cycle. `RELATES_TO`
    /// edges skip the cycle check.
    ///
    /// # Errors
    ///
    /// Returns [`DependencyRepositoryError::DuplicateDependency`] when the
    /// same ordered pair is already linked, or
    /// [`DependencyRepositoryError::CycleDetected`] when the edge would
    /// close a cycle.
    async fn insert_acyclic(&self, dependency: &TaskDependency) -> DependencyRepositoryResult<()>;

    /// Finds an edge by identifier.
    async fn find_by_id(
        &self,
        id: DependencyId,
    ) -> DependencyRepositoryResult<Option<TaskDependency>>;

    /// Finds the edge linking an ordered pair.
    async fn find_by_tasks(
        &self,
        task_id: TaskId,
        depends_on_task_id: TaskId,
    ) -> DependencyRepositoryResult<Option<TaskDependency>>;

    /// Returns the edges where `task_id` is the dependent task.
    async fn find_outgoing(
        &self,
        task_id: TaskId,
    ) -> DependencyRepositoryResult<Vec<TaskDependency>>;

    /// Returns the edges where `task_id` is the prerequisite.
    async fn find_incoming(
        &self,
        task_id: TaskId,
    ) -> DependencyRepositoryResult<Vec<TaskDependency>>;

    /// Returns every edge with at least one endpoint in `task_ids`.
    async fn find_touching(
        &self,
        task_ids: &[TaskId],
    ) -> DependencyRepositoryResult<Vec<TaskDependency>>;

    /// Returns a snapshot of every `BLOCKS` edge.
    async fn blocking_edges(&self) -> DependencyRepositoryResult<BlockingEdges>;

    /// Deletes an edge. Returns `true` when an edge was removed.
    async fn delete(&self, id: DependencyId) -> DependencyRepositoryResult<bool>;

    /// Deletes the edge linking an ordered pair. Returns `true` when an edge
    /// was removed.
    async fn delete_by_tasks(
        &self,
        task_id: TaskId,
        depends_on_task_id: TaskId,
    ) -> DependencyRepositoryResult<bool>;
}

/// Errors returned by dependency repository implementations.
#[derive(Debug, Clone, Error)]
pub enum DependencyRepositoryError {
    /// The ordered pair is already linked.
    #[error("task {task_id} already depends on {depends_on_task_id}")]
    DuplicateDependency {
        /// Dependent task.
        task_id: TaskId,
        /// Prerequisite task.
        depends_on_task_id: TaskId,
    },

    /// The edge would close a cycle of `BLOCKS` edges.
    #[error("dependency would create a cycle through {} task(s)", path.len())]
    CycleDetected {
        /// Existing path from the prerequisite back to the dependent task.
        path: Vec<TaskId>,
    },

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl DependencyRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
