//! Task status and blocking reason value types.

use super::TaskDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Named workflow state of a task.
///
/// Status names come from an externally configured workflow, so the set is
/// open-ended. Which names mean "blocked" or "completed" is decided by
/// [`crate::config::WorkflowConfig`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TaskStatus(String);

impl TaskStatus {
    /// Largest status name accepted, matching the persisted column width.
    pub const MAX_LENGTH: usize = 50;

    /// Creates a validated status from a workflow state name.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyStatus`] when the name is blank or
    /// [`TaskDomainError::StatusTooLong`] when it exceeds
    /// [`Self::MAX_LENGTH`] characters.
    pub fn new(value: impl Into<String>) -> Result<Self, TaskDomainError> {
        let raw = value.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(TaskDomainError::EmptyStatus);
        }
        if trimmed.chars().count() > Self::MAX_LENGTH {
            return Err(TaskDomainError::StatusTooLong(raw));
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Creates a status from a known-good literal.
    ///
    /// Intended for configuration defaults and tests.
    #[must_use]
    pub fn from_static(value: &'static str) -> Self {
        debug_assert!(!value.trim().is_empty(), "status literal must not be blank");
        Self(value.trim().to_owned())
    }

    /// Returns the status name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Compares two status names ignoring ASCII case.
    #[must_use]
    pub fn matches(&self, other: &Self) -> bool {
        self.0.eq_ignore_ascii_case(&other.0)
    }
}

impl TryFrom<String> for TaskStatus {
    type Error = TaskDomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for TaskStatus {
    type Error = TaskDomainError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<TaskStatus> for String {
    fn from(value: TaskStatus) -> Self {
        value.0
    }
}

impl AsRef<str> for TaskStatus {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Non-blank explanation of why a task is blocked.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BlockedReason(String);

impl BlockedReason {
    /// Creates a validated blocking reason.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyBlockedReason`] when the reason is
    /// empty or whitespace only.
    pub fn new(value: impl Into<String>) -> Result<Self, TaskDomainError> {
        let raw = value.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(TaskDomainError::EmptyBlockedReason);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the reason text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for BlockedReason {
    type Error = TaskDomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<BlockedReason> for String {
    fn from(value: BlockedReason) -> Self {
        value.0
    }
}

impl fmt::Display for BlockedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
