//! Error types for task domain validation.

use thiserror::Error;

/// Errors returned while constructing domain task values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskDomainError {
    /// The task code is empty after trimming.
    #[error("task code must not be empty")]
    EmptyCode,

    /// The task title is empty after trimming.
    #[error("task title must not be empty")]
    EmptyTitle,

    /// The status name is empty after trimming.
    #[error("task status must not be empty")]
    EmptyStatus,

    /// The status name exceeds the persisted column width.
    #[error("task status '{0}' exceeds {max} characters", max = super::TaskStatus::MAX_LENGTH)]
    StatusTooLong(String),

    /// A blocking reason is empty after trimming.
    #[error("blocked reason must not be empty")]
    EmptyBlockedReason,
}
