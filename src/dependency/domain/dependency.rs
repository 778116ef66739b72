//! Dependency edge entity.

use super::{DependencyDomainError, ParseDependencyTypeError};
use crate::task::domain::{TaskId, UserId};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;

uuid_id! {
    /// Unique identifier for a dependency edge.
    DependencyId
}

/// Kind of dependency between two tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DependencyType {
    /// The dependent task cannot complete until the prerequisite completes.
    Blocks,
    /// Informational association.
    RelatesTo,
}

impl DependencyType {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Blocks => "BLOCKS",
            Self::RelatesTo => "RELATES_TO",
        }
    }

    /// Returns `true` for edges that take part in cycle detection and
    /// blocking queries.
    #[must_use]
    pub const fn is_blocking(self) -> bool {
        matches!(self, Self::Blocks)
    }
}

impl TryFrom<&str> for DependencyType {
    type Error = ParseDependencyTypeError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_uppercase().as_str() {
            "BLOCKS" => Ok(Self::Blocks),
            "RELATES_TO" => Ok(Self::RelatesTo),
            _ => Err(ParseDependencyTypeError(value.to_owned())),
        }
    }
}

impl fmt::Display for DependencyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Input for creating a dependency edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewDependency {
    /// Dependent task.
    pub task_id: TaskId,
    /// Prerequisite task.
    pub depends_on_task_id: TaskId,
    /// Edge kind.
    pub dependency_type: DependencyType,
    /// Creating user.
    pub created_by: UserId,
}

impl NewDependency {
    /// Creates input for a `BLOCKS` edge.
    #[must_use]
    pub const fn blocks(task_id: TaskId, depends_on_task_id: TaskId, created_by: UserId) -> Self {
        Self {
            task_id,
            depends_on_task_id,
            dependency_type: DependencyType::Blocks,
            created_by,
        }
    }

    /// Creates input for a `RELATES_TO` edge.
    #[must_use]
    pub const fn relates_to(
        task_id: TaskId,
        depends_on_task_id: TaskId,
        created_by: UserId,
    ) -> Self {
        Self {
            task_id,
            depends_on_task_id,
            dependency_type: DependencyType::RelatesTo,
            created_by,
        }
    }
}

/// Directed edge meaning `task_id` depends on `depends_on_task_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskDependency {
    id: DependencyId,
    task_id: TaskId,
    depends_on_task_id: TaskId,
    dependency_type: DependencyType,
    created_by: UserId,
    created_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted dependency.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedDependency {
    /// Edge identifier.
    pub id: DependencyId,
    /// Dependent task.
    pub task_id: TaskId,
    /// Prerequisite task.
    pub depends_on_task_id: TaskId,
    /// Edge kind.
    pub dependency_type: DependencyType,
    /// Creating user.
    pub created_by: UserId,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl TaskDependency {
    /// Creates a new edge.
    ///
    /// # Errors
    ///
    /// Returns [`DependencyDomainError::SelfDependency`] when both endpoints
    /// are the same task.
    pub fn new(input: NewDependency, clock: &impl Clock) -> Result<Self, DependencyDomainError> {
        if input.task_id == input.depends_on_task_id {
            return Err(DependencyDomainError::SelfDependency(input.task_id));
        }
        Ok(Self {
            id: DependencyId::new(),
            task_id: input.task_id,
            depends_on_task_id: input.depends_on_task_id,
            dependency_type: input.dependency_type,
            created_by: input.created_by,
            created_at: clock.utc(),
        })
    }

    /// Reconstructs an edge from persisted storage.
    #[must_use]
    pub const fn from_persisted(data: PersistedDependency) -> Self {
        Self {
            id: data.id,
            task_id: data.task_id,
            depends_on_task_id: data.depends_on_task_id,
            dependency_type: data.dependency_type,
            created_by: data.created_by,
            created_at: data.created_at,
        }
    }

    /// Returns the edge identifier.
    #[must_use]
    pub const fn id(&self) -> DependencyId {
        self.id
    }

    /// Returns the dependent task.
    #[must_use]
    pub const fn task_id(&self) -> TaskId {
        self.task_id
    }

    /// Returns the prerequisite task.
    #[must_use]
    pub const fn depends_on_task_id(&self) -> TaskId {
        self.depends_on_task_id
    }

    /// Returns the edge kind.
    #[must_use]
    pub const fn dependency_type(&self) -> DependencyType {
        self.dependency_type
    }

    /// Returns the creating user.
    #[must_use]
    pub const fn created_by(&self) -> UserId {
        self.created_by
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns `true` when the edge connects the same ordered pair.
    #[must_use]
    pub fn links(&self, task_id: TaskId, depends_on_task_id: TaskId) -> bool {
        self.task_id == task_id && self.depends_on_task_id == depends_on_task_id
    }
}
