//! Diesel row models for dependency persistence.

use super::schema::task_dependencies;
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Query result row for dependency edges.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = task_dependencies)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct DependencyRow {
    /// Edge identifier.
    pub id: uuid::Uuid,
    /// Dependent task.
    pub task_id: uuid::Uuid,
    /// Prerequisite task.
    pub depends_on_task_id: uuid::Uuid,
    /// Edge kind.
    pub dependency_type: String,
    /// Creating user.
    pub created_by: uuid::Uuid,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Insert model for dependency edges.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = task_dependencies)]
pub struct NewDependencyRow {
    /// Edge identifier.
    pub id: uuid::Uuid,
    /// Dependent task.
    pub task_id: uuid::Uuid,
    /// Prerequisite task.
    pub depends_on_task_id: uuid::Uuid,
    /// Edge kind.
    pub dependency_type: String,
    /// Creating user.
    pub created_by: uuid::Uuid,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}
