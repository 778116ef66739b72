//! Service-level errors for dependency operations.

use crate::dependency::{domain::DependencyDomainError, ports::DependencyRepositoryError};
use crate::task::{domain::TaskId, ports::TaskRepositoryError};
use thiserror::Error;

/// Errors returned by [`super::DependencyService`].
#[derive(Debug, Error)]
pub enum DependencyError {
    /// A task cannot depend on itself.
    #[error("task {0} cannot depend on itself")]
    SelfDependency(TaskId),

    /// An endpoint task does not exist.
    #[error("task not found: {0}")]
    TaskNotFound(TaskId),

    /// The ordered pair is already linked.
    #[error("task {task_id} already depends on {depends_on_task_id}")]
    DuplicateDependency {
        /// Dependent task.
        task_id: TaskId,
        /// Prerequisite task.
        depends_on_task_id: TaskId,
    },

    /// The edge would close a cycle of `BLOCKS` edges.
    #[error("adding this dependency would create a circular dependency")]
    CycleDetected {
        /// Existing path from the prerequisite back to the dependent task.
        path: Vec<TaskId>,
    },

    /// Dependency repository operation failed.
    #[error(transparent)]
    Repository(DependencyRepositoryError),

    /// Task lookup failed.
    #[error(transparent)]
    TaskRepository(#[from] TaskRepositoryError),
}

impl DependencyError {
    /// Returns the machine-readable error code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::SelfDependency(_) => "SELF_DEPENDENCY",
            Self::TaskNotFound(_) => "NOT_FOUND",
            Self::DuplicateDependency { .. } => "DUPLICATE_DEPENDENCY",
            Self::CycleDetected { .. } => "CIRCULAR_DEPENDENCY",
            Self::Repository(_) | Self::TaskRepository(_) => "INTERNAL_ERROR",
        }
    }

    /// Returns `true` for infrastructure failures whose details must not
    /// reach callers.
    #[must_use]
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Repository(_) | Self::TaskRepository(_))
    }
}

impl From<DependencyDomainError> for DependencyError {
    fn from(err: DependencyDomainError) -> Self {
        match err {
            DependencyDomainError::SelfDependency(task_id) => Self::SelfDependency(task_id),
        }
    }
}

impl From<DependencyRepositoryError> for DependencyError {
    fn from(err: DependencyRepositoryError) -> Self {
        match err {
            DependencyRepositoryError::DuplicateDependency {
                task_id,
                depends_on_task_id,
            } => Self::DuplicateDependency {
                task_id,
                depends_on_task_id,
            },
            DependencyRepositoryError::CycleDetected { path } => Self::CycleDetected { path },
            other @ DependencyRepositoryError::Persistence(_) => Self::Repository(other),
        }
    }
}

/// Result type for dependency service operations.
pub type DependencyResult<T> = Result<T, DependencyError>;
