//! Diesel row models for history tables.

use super::schema::{checklist_state_history, task_status_history};
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Status history row. `seq` is assigned by the database.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = task_status_history)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct StatusHistoryRow {
    /// Entry identifier.
    pub id: uuid::Uuid,
    /// Task that changed.
    pub task_id: uuid::Uuid,
    /// Previous status.
    pub from_status: Option<String>,
    /// New status.
    pub to_status: String,
    /// Acting user.
    pub changed_by: uuid::Uuid,
    /// Optional note.
    pub note: Option<String>,
    /// When the change was recorded.
    pub created_at: DateTime<Utc>,
}

/// Checklist history row. `seq` is assigned by the database.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = checklist_state_history)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ChecklistHistoryRow {
    /// Entry identifier.
    pub id: uuid::Uuid,
    /// Item that flipped.
    pub checklist_item_id: uuid::Uuid,
    /// Task owning the item.
    pub task_id: uuid::Uuid,
    /// Action name.
    pub action: String,
    /// Acting user.
    pub actor_id: uuid::Uuid,
    /// Acting user's display name.
    pub actor_name: String,
    /// Optional reason.
    pub reason: Option<String>,
    /// When the flip was recorded.
    pub created_at: DateTime<Utc>,
}
