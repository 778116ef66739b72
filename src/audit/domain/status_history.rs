//! Task status history entries.

use crate::task::domain::{TaskId, TaskStatus, UserId};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

uuid_id! {
    /// Unique identifier for an audit history entry.
    HistoryEntryId
}

/// Immutable record of one task status change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskStatusHistoryEntry {
    id: HistoryEntryId,
    task_id: TaskId,
    from_status: Option<TaskStatus>,
    to_status: TaskStatus,
    changed_by: UserId,
    note: Option<String>,
    created_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted status history entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedStatusHistoryEntry {
    /// Entry identifier.
    pub id: HistoryEntryId,
    /// Task whose status changed.
    pub task_id: TaskId,
    /// Previous status; `None` for the creation entry.
    pub from_status: Option<TaskStatus>,
    /// New status.
    pub to_status: TaskStatus,
    /// Acting user.
    pub changed_by: UserId,
    /// Optional free-text note.
    pub note: Option<String>,
    /// When the change was recorded.
    pub created_at: DateTime<Utc>,
}

fn normalize_note(note: Option<String>) -> Option<String> {
    note.map(|text| text.trim().to_owned())
        .filter(|text| !text.is_empty())
}

impl TaskStatusHistoryEntry {
    /// Creates the synthetic entry recorded when a task is created.
    #[must_use]
    pub fn creation(
        task_id: TaskId,
        status: TaskStatus,
        changed_by: UserId,
        clock: &impl Clock,
    ) -> Self {
        Self {
            id: HistoryEntryId::new(),
            task_id,
            from_status: None,
            to_status: status,
            changed_by,
            note: None,
            created_at: clock.utc(),
        }
    }

    /// Creates an entry for a transition between two statuses.
    ///
    /// Blank notes are dropped.
    #[must_use]
    pub fn transition(
        task_id: TaskId,
        from_status: TaskStatus,
        to_status: TaskStatus,
        changed_by: UserId,
        note: Option<String>,
        clock: &impl Clock,
    ) -> Self {
        Self {
            id: HistoryEntryId::new(),
            task_id,
            from_status: Some(from_status),
            to_status,
            changed_by,
            note: normalize_note(note),
            created_at: clock.utc(),
        }
    }

    /// Reconstructs an entry from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedStatusHistoryEntry) -> Self {
        Self {
            id: data.id,
            task_id: data.task_id,
            from_status: data.from_status,
            to_status: data.to_status,
            changed_by: data.changed_by,
            note: data.note,
            created_at: data.created_at,
        }
    }

    /// Returns the entry identifier.
    #[must_use]
    pub const fn id(&self) -> HistoryEntryId {
        self.id
    }

    /// Returns the task whose status changed.
    #[must_use]
    pub const fn task_id(&self) -> TaskId {
        self.task_id
    }

    /// Returns the previous status, or `None` for the creation entry.
    #[must_use]
    pub const fn from_status(&self) -> Option<&TaskStatus> {
        self.from_status.as_ref()
    }

    /// Returns the new status.
    #[must_use]
    pub const fn to_status(&self) -> &TaskStatus {
        &self.to_status
    }

    /// Returns the acting user.
    #[must_use]
    pub const fn changed_by(&self) -> UserId {
        self.changed_by
    }

    /// Returns the note, if any.
    #[must_use]
    pub fn note(&self) -> Option<&str> {
        self.note.as_deref()
    }

    /// Returns when the change was recorded.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns `true` for the synthetic creation entry.
    #[must_use]
    pub const fn is_creation(&self) -> bool {
        self.from_status.is_none()
    }
}
