//! Service-level errors for workflow operations.

use crate::audit::ports::AuditRepositoryError;
use crate::checklist::services::ChecklistError;
use crate::dependency::services::DependencyError;
use crate::enforcement::{domain::ValidationIssue, ports::EnforcementSettingsError};
use crate::task::{
    domain::{TaskDomainError, TaskId, TaskStatus},
    ports::TaskRepositoryError,
};
use std::fmt;
use thiserror::Error;

/// Machine-readable code of a rejected request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValidationCode {
    /// Moving into the blocked status needs a non-blank reason.
    BlockedReasonRequired,
    /// Unblocking was requested for a task that is not blocked.
    TaskNotBlocked,
    /// Unblocking must target a status other than the blocked status.
    InvalidUnblockStatus,
}

impl ValidationCode {
    /// Returns the canonical code string.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::BlockedReasonRequired => "BLOCKED_REASON_REQUIRED",
            Self::TaskNotBlocked => "TASK_NOT_BLOCKED",
            Self::InvalidUnblockStatus => "INVALID_UNBLOCK_STATUS",
        }
    }
}

impl fmt::Display for ValidationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Request rejected before anything was read or written.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{code}: {message}")]
pub struct ValidationError {
    /// Machine-readable code.
    pub code: ValidationCode,
    /// Human-readable explanation.
    pub message: String,
}

impl ValidationError {
    /// Creates a validation error.
    #[must_use]
    pub fn new(code: ValidationCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

/// Errors returned by [`super::TaskWorkflowService`].
#[derive(Debug, Error)]
pub enum WorkflowError {
    /// The request was malformed.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The task does not exist.
    #[error("task not found: {0}")]
    TaskNotFound(TaskId),

    /// A policy in `block` mode rejected the transition.
    #[error("transition blocked by {} policy violation(s)", issues.len())]
    EnforcementBlocked {
        /// Violations that prevented the transition.
        issues: Vec<ValidationIssue>,
    },

    /// Another writer changed the task's status first.
    #[error("task {task_id} status changed concurrently: expected '{expected}', found '{actual}'")]
    StatusConflict {
        /// Task being transitioned.
        task_id: TaskId,
        /// Status this request validated against.
        expected: TaskStatus,
        /// Status stored when the write was attempted.
        actual: TaskStatus,
    },

    /// Task construction failed.
    #[error(transparent)]
    Domain(#[from] TaskDomainError),

    /// Task repository operation failed.
    #[error(transparent)]
    Repository(TaskRepositoryError),

    /// Dependency lookup failed.
    #[error(transparent)]
    Dependency(#[from] DependencyError),

    /// Checklist validation failed to run.
    #[error(transparent)]
    Checklist(#[from] ChecklistError),

    /// Enforcement settings lookup failed.
    #[error(transparent)]
    Enforcement(#[from] EnforcementSettingsError),

    /// History append or query failed.
    #[error(transparent)]
    Audit(#[from] AuditRepositoryError),
}

impl WorkflowError {
    /// Returns the machine-readable error code.
    ///
    /// A blocked transition reports the code of its first violation, such
    /// as `MANDATORY_CHECKLIST_INCOMPLETE`.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(err) => err.code.as_str(),
            Self::TaskNotFound(_) => "NOT_FOUND",
            Self::EnforcementBlocked { issues } => issues
                .first()
                .map_or("ENFORCEMENT_BLOCKED", |issue| issue.code.as_str()),
            Self::StatusConflict { .. } => "STATUS_CONFLICT",
            Self::Domain(_) => "VALIDATION_ERROR",
            Self::Dependency(err) => err.code(),
            Self::Checklist(err) => err.code(),
            Self::Repository(_) | Self::Enforcement(_) | Self::Audit(_) => "INTERNAL_ERROR",
        }
    }

    /// Returns `true` for infrastructure failures whose details must not
    /// reach callers.
    #[must_use]
    pub const fn is_internal(&self) -> bool {
        match self {
            Self::Repository(_) | Self::Enforcement(_) | Self::Audit(_) => true,
            Self::Dependency(err) => err.is_internal(),
            Self::Checklist(err) => err.is_internal(),
            Self::Validation(_)
            | Self::TaskNotFound(_)
            | Self::EnforcementBlocked { .. }
            | Self::StatusConflict { .. }
            | Self::Domain(_) => false,
        }
    }
}

impl From<TaskRepositoryError> for WorkflowError {
    fn from(err: TaskRepositoryError) -> Self {
        match err {
            TaskRepositoryError::NotFound(task_id) => Self::TaskNotFound(task_id),
            TaskRepositoryError::StatusConflict {
                task_id,
                expected,
                actual,
            } => Self::StatusConflict {
                task_id,
                expected,
                actual,
            },
            TaskRepositoryError::History(err) => Self::Audit(err),
            other @ (TaskRepositoryError::DuplicateTask(_)
            | TaskRepositoryError::Persistence(_)) => Self::Repository(other),
        }
    }
}

/// Result type for workflow service operations.
pub type WorkflowResult<T> = Result<T, WorkflowError>;
