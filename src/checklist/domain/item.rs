//! Checklist item entity.

use super::ChecklistDomainError;
use crate::audit::domain::ChecklistAction;
use crate::task::domain::{TaskId, UserId};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

uuid_id! {
    /// Unique identifier for a checklist item.
    ChecklistItemId
}

/// A checklist entry attached to a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistItem {
    id: ChecklistItemId,
    task_id: TaskId,
    text: String,
    is_mandatory: bool,
    is_completed: bool,
    completed_by: Option<UserId>,
    completed_at: Option<DateTime<Utc>>,
    unchecked_by: Option<UserId>,
    unchecked_reason: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted checklist item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedChecklistItem {
    /// Persisted item identifier.
    pub id: ChecklistItemId,
    /// Owning task.
    pub task_id: TaskId,
    /// Item text.
    pub text: String,
    /// Whether completion is mandatory.
    pub is_mandatory: bool,
    /// Whether the item is checked.
    pub is_completed: bool,
    /// Who last checked the item.
    pub completed_by: Option<UserId>,
    /// When the item was last checked.
    pub completed_at: Option<DateTime<Utc>>,
    /// Who last unchecked the item.
    pub unchecked_by: Option<UserId>,
    /// Why the item was last unchecked.
    pub unchecked_reason: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Latest modification timestamp.
    pub updated_at: DateTime<Utc>,
}

fn normalize_text(text: &str) -> Result<String, ChecklistDomainError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(ChecklistDomainError::EmptyText);
    }
    Ok(trimmed.to_owned())
}

impl ChecklistItem {
    /// Creates an unchecked item attached to `task_id`.
    ///
    /// # Errors
    ///
    /// Returns [`ChecklistDomainError::EmptyText`] when the text is blank.
    pub fn new(
        task_id: TaskId,
        text: &str,
        is_mandatory: bool,
        clock: &impl Clock,
    ) -> Result<Self, ChecklistDomainError> {
        let timestamp = clock.utc();
        Ok(Self {
            id: ChecklistItemId::new(),
            task_id,
            text: normalize_text(text)?,
            is_mandatory,
            is_completed: false,
            completed_by: None,
            completed_at: None,
            unchecked_by: None,
            unchecked_reason: None,
            created_at: timestamp,
            updated_at: timestamp,
        })
    }

    /// Reconstructs an item from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedChecklistItem) -> Self {
        Self {
            id: data.id,
            task_id: data.task_id,
            text: data.text,
            is_mandatory: data.is_mandatory,
            is_completed: data.is_completed,
            completed_by: data.completed_by,
            completed_at: data.completed_at,
            unchecked_by: data.unchecked_by,
            unchecked_reason: data.unchecked_reason,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the item identifier.
    #[must_use]
    pub const fn id(&self) -> ChecklistItemId {
        self.id
    }

    /// Returns the owning task.
    #[must_use]
    pub const fn task_id(&self) -> TaskId {
        self.task_id
    }

    /// Returns the item text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns whether completion is mandatory.
    #[must_use]
    pub const fn is_mandatory(&self) -> bool {
        self.is_mandatory
    }

    /// Returns whether the item is checked.
    #[must_use]
    pub const fn is_completed(&self) -> bool {
        self.is_completed
    }

    /// Returns who last checked the item.
    #[must_use]
    pub const fn completed_by(&self) -> Option<UserId> {
        self.completed_by
    }

    /// Returns when the item was last checked.
    #[must_use]
    pub const fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    /// Returns who last unchecked the item.
    #[must_use]
    pub const fn unchecked_by(&self) -> Option<UserId> {
        self.unchecked_by
    }

    /// Returns why the item was last unchecked.
    #[must_use]
    pub fn unchecked_reason(&self) -> Option<&str> {
        self.unchecked_reason.as_deref()
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest modification timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns `true` for a mandatory item that is not checked.
    #[must_use]
    pub const fn is_outstanding_mandatory(&self) -> bool {
        self.is_mandatory && !self.is_completed
    }

    /// Replaces the item text.
    ///
    /// # Errors
    ///
    /// Returns [`ChecklistDomainError::EmptyText`] when the text is blank.
    pub fn set_text(&mut self, text: &str, clock: &impl Clock) -> Result<(), ChecklistDomainError> {
        self.text = normalize_text(text)?;
        self.updated_at = clock.utc();
        Ok(())
    }

    /// Marks the item mandatory or optional.
    pub fn set_mandatory(&mut self, is_mandatory: bool, clock: &impl Clock) {
        self.is_mandatory = is_mandatory;
        self.updated_at = clock.utc();
    }

    /// Sets the completion flag.
    ///
    /// Returns the observed flip, or `None` when the flag already had the
    /// requested value (in which case nothing changes).
    pub fn set_completed(
        &mut self,
        completed: bool,
        actor: UserId,
        reason: Option<String>,
        clock: &impl Clock,
    ) -> Option<ChecklistAction> {
        if self.is_completed == completed {
            return None;
        }

        let timestamp = clock.utc();
        self.is_completed = completed;
        self.updated_at = timestamp;
        if completed {
            self.completed_by = Some(actor);
            self.completed_at = Some(timestamp);
            Some(ChecklistAction::Checked)
        } else {
            self.unchecked_by = Some(actor);
            self.unchecked_reason = reason;
            Some(ChecklistAction::Unchecked)
        }
    }
}
