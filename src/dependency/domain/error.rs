//! Error types for dependency domain validation and parsing.

use crate::task::domain::TaskId;
use thiserror::Error;

/// Errors returned while constructing dependency values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DependencyDomainError {
    /// A task cannot depend on itself.
    #[error("task {0} cannot depend on itself")]
    SelfDependency(TaskId),
}

/// Error returned while parsing dependency types from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown dependency type: {0}")]
pub struct ParseDependencyTypeError(pub String);
