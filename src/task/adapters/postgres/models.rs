//! Diesel row models for task persistence.

use super::schema::tasks;
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Query result row for task records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = tasks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TaskRow {
    /// Internal task identifier.
    pub id: uuid::Uuid,
    /// Owning project.
    pub project_id: uuid::Uuid,
    /// Task code.
    pub code: String,
    /// Task title.
    pub title: String,
    /// Workflow status name.
    pub status: String,
    /// Owning department.
    pub department_id: Option<uuid::Uuid>,
    /// Accountable owner.
    pub owner_id: Option<uuid::Uuid>,
    /// Assigned users.
    pub assignee_ids: Vec<uuid::Uuid>,
    /// Why the task is blocked.
    pub blocked_reason: Option<String>,
    /// When the task was blocked.
    pub blocked_at: Option<DateTime<Utc>>,
    /// Who blocked the task.
    pub blocked_by: Option<uuid::Uuid>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Insert and full-overwrite model for task records.
#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = tasks)]
#[diesel(treat_none_as_null = true)]
pub struct NewTaskRow {
    /// Internal task identifier.
    pub id: uuid::Uuid,
    /// Owning project.
    pub project_id: uuid::Uuid,
    /// Task code.
    pub code: String,
    /// Task title.
    pub title: String,
    /// Workflow status name.
    pub status: String,
    /// Owning department.
    pub department_id: Option<uuid::Uuid>,
    /// Accountable owner.
    pub owner_id: Option<uuid::Uuid>,
    /// Assigned users.
    pub assignee_ids: Vec<uuid::Uuid>,
    /// Why the task is blocked.
    pub blocked_reason: Option<String>,
    /// When the task was blocked.
    pub blocked_at: Option<DateTime<Utc>>,
    /// Who blocked the task.
    pub blocked_by: Option<uuid::Uuid>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Status and blocking columns written by a compare-and-set transition.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = tasks)]
#[diesel(treat_none_as_null = true)]
pub struct StatusChangeset {
    /// New status name.
    pub status: String,
    /// Why the task is blocked.
    pub blocked_reason: Option<String>,
    /// When the task was blocked.
    pub blocked_at: Option<DateTime<Utc>>,
    /// Who blocked the task.
    pub blocked_by: Option<uuid::Uuid>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}
