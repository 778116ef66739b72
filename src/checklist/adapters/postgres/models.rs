//! Diesel row models for checklist items.

use super::schema::checklist_items;
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Checklist item row, used for reads, inserts, and full overwrites.
#[derive(Debug, Clone, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = checklist_items)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[diesel(treat_none_as_null = true)]
pub struct ChecklistItemRow {
    /// Item identifier.
    pub id: uuid::Uuid,
    /// Owning task.
    pub task_id: uuid::Uuid,
    /// Item text.
    pub text: String,
    /// Whether completion is mandatory.
    pub is_mandatory: bool,
    /// Whether the item is checked.
    pub is_completed: bool,
    /// Who last checked the item.
    pub completed_by: Option<uuid::Uuid>,
    /// When the item was last checked.
    pub completed_at: Option<DateTime<Utc>>,
    /// Who last unchecked the item.
    pub unchecked_by: Option<uuid::Uuid>,
    /// Why the item was last unchecked.
    pub unchecked_reason: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}
