//! Checklist state history entries.

use super::{Actor, HistoryEntryId};
use crate::checklist::domain::ChecklistItemId;
use crate::task::domain::TaskId;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Completion flip observed on a checklist item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChecklistAction {
    /// The item went from unchecked to checked.
    Checked,
    /// The item went from checked to unchecked.
    Unchecked,
}

impl ChecklistAction {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Checked => "CHECKED",
            Self::Unchecked => "UNCHECKED",
        }
    }
}

/// Error returned while parsing checklist actions from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown checklist action: {0}")]
pub struct ParseChecklistActionError(pub String);

impl TryFrom<&str> for ChecklistAction {
    type Error = ParseChecklistActionError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_uppercase().as_str() {
            "CHECKED" => Ok(Self::Checked),
            "UNCHECKED" => Ok(Self::Unchecked),
            _ => Err(ParseChecklistActionError(value.to_owned())),
        }
    }
}

impl fmt::Display for ChecklistAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Input describing an observed checklist flip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewChecklistStateChange {
    /// Item that flipped.
    pub checklist_item_id: ChecklistItemId,
    /// Task owning the item.
    pub task_id: TaskId,
    /// Observed flip.
    pub action: ChecklistAction,
    /// Acting user.
    pub actor: Actor,
    /// Optional reason, typically supplied when unchecking.
    pub reason: Option<String>,
}

/// Immutable record of one checklist item completion flip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistStateHistoryEntry {
    id: HistoryEntryId,
    checklist_item_id: ChecklistItemId,
    task_id: TaskId,
    action: ChecklistAction,
    actor: Actor,
    reason: Option<String>,
    created_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted checklist history entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedChecklistStateHistoryEntry {
    /// Entry identifier.
    pub id: HistoryEntryId,
    /// Item that flipped.
    pub checklist_item_id: ChecklistItemId,
    /// Task owning the item.
    pub task_id: TaskId,
    /// Observed flip.
    pub action: ChecklistAction,
    /// Acting user.
    pub actor: Actor,
    /// Optional reason.
    pub reason: Option<String>,
    /// When the flip was recorded.
    pub created_at: DateTime<Utc>,
}

impl ChecklistStateHistoryEntry {
    /// Creates an entry for an observed flip.
    #[must_use]
    pub fn new(change: NewChecklistStateChange, clock: &impl Clock) -> Self {
        Self {
            id: HistoryEntryId::new(),
            checklist_item_id: change.checklist_item_id,
            task_id: change.task_id,
            action: change.action,
            actor: change.actor,
            reason: change
                .reason
                .map(|text| text.trim().to_owned())
                .filter(|text| !text.is_empty()),
            created_at: clock.utc(),
        }
    }

    /// Reconstructs an entry from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedChecklistStateHistoryEntry) -> Self {
        Self {
            id: data.id,
            checklist_item_id: data.checklist_item_id,
            task_id: data.task_id,
            action: data.action,
            actor: data.actor,
            reason: data.reason,
            created_at: data.created_at,
        }
    }

    /// Returns the entry identifier.
    #[must_use]
    pub const fn id(&self) -> HistoryEntryId {
        self.id
    }

    /// Returns the item that flipped.
    #[must_use]
    pub const fn checklist_item_id(&self) -> ChecklistItemId {
        self.checklist_item_id
    }

    /// Returns the owning task.
    #[must_use]
    pub const fn task_id(&self) -> TaskId {
        self.task_id
    }

    /// Returns the observed flip.
    #[must_use]
    pub const fn action(&self) -> ChecklistAction {
        self.action
    }

    /// Returns the acting user.
    #[must_use]
    pub const fn actor(&self) -> &Actor {
        &self.actor
    }

    /// Returns the reason, if any.
    #[must_use]
    pub fn reason(&self) -> Option<&str> {
        self.reason.as_deref()
    }

    /// Returns when the flip was recorded.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
