//! Checklist item management with history of completion flips.

use std::sync::Arc;

use mockable::Clock;

use super::{ChecklistError, ChecklistResult};
use crate::audit::{
    domain::{Actor, ChecklistStateHistoryEntry, NewChecklistStateChange},
    ports::ChecklistHistoryRepository,
};
use crate::checklist::{
    domain::{ChecklistItem, ChecklistItemId},
    ports::ChecklistRepository,
};
use crate::task::domain::TaskId;

/// Request payload for adding a checklist item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddChecklistItemRequest {
    task_id: TaskId,
    text: String,
    is_mandatory: bool,
}

impl AddChecklistItemRequest {
    /// Creates a request for an optional item.
    #[must_use]
    pub fn new(task_id: TaskId, text: impl Into<String>) -> Self {
        Self {
            task_id,
            text: text.into(),
            is_mandatory: false,
        }
    }

    /// Marks the item mandatory.
    #[must_use]
    pub const fn mandatory(mut self) -> Self {
        self.is_mandatory = true;
        self
    }
}

/// Request payload for checking or unchecking an item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetCompletionRequest {
    item_id: ChecklistItemId,
    completed: bool,
    actor: Actor,
    reason: Option<String>,
}

impl SetCompletionRequest {
    /// Creates a request to check an item.
    #[must_use]
    pub const fn check(item_id: ChecklistItemId, actor: Actor) -> Self {
        Self {
            item_id,
            completed: true,
            actor,
            reason: None,
        }
    }

    /// Creates a request to uncheck an item.
    #[must_use]
    pub const fn uncheck(item_id: ChecklistItemId, actor: Actor) -> Self {
        Self {
            item_id,
            completed: false,
            actor,
            reason: None,
        }
    }

    /// Sets the reason recorded with the change.
    #[must_use]
    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }
}

/// Result of a completion request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToggleOutcome {
    /// Item after the request.
    pub item: ChecklistItem,
    /// History entry written, or `None` when the flag did not flip.
    pub recorded: Option<ChecklistStateHistoryEntry>,
}

/// Checklist item orchestration service.
pub struct ChecklistService<L, K, C>
where
    L: ChecklistRepository,
    K: ChecklistHistoryRepository,
    C: Clock + Send + Sync,
{
    items: Arc<L>,
    history: Arc<K>,
    clock: Arc<C>,
}

impl<L, K, C> Clone for ChecklistService<L, K, C>
where
    L: ChecklistRepository,
    K: ChecklistHistoryRepository,
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            items: Arc::clone(&self.items),
            history: Arc::clone(&self.history),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<L, K, C> ChecklistService<L, K, C>
where
    L: ChecklistRepository,
    K: ChecklistHistoryRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new checklist service.
    #[must_use]
    pub const fn new(items: Arc<L>, history: Arc<K>, clock: Arc<C>) -> Self {
        Self {
            items,
            history,
            clock,
        }
    }

    /// Adds an unchecked item to a task.
    ///
    /// # Errors
    ///
    /// Returns [`ChecklistError::Domain`] for blank text or
    /// [`ChecklistError::Repository`] when persistence fails.
    pub async fn add_item(
        &self,
        request: AddChecklistItemRequest,
    ) -> ChecklistResult<ChecklistItem> {
        let item = ChecklistItem::new(
            request.task_id,
            &request.text,
            request.is_mandatory,
            &*self.clock,
        )?;
        self.items.store(&item).await?;
        Ok(item)
    }

    /// Replaces an item's text. No history entry is written.
    ///
    /// # Errors
    ///
    /// Returns [`ChecklistError::ItemNotFound`] when the item is missing or
    /// [`ChecklistError::Domain`] for blank text.
    pub async fn update_text(
        &self,
        item_id: ChecklistItemId,
        text: &str,
    ) -> ChecklistResult<ChecklistItem> {
        let mut item = self.load(item_id).await?;
        item.set_text(text, &*self.clock)?;
        self.items.update(&item).await?;
        Ok(item)
    }

    /// Marks an item mandatory or optional. No history entry is written.
    ///
    /// # Errors
    ///
    /// Returns [`ChecklistError::ItemNotFound`] when the item is missing.
    pub async fn set_mandatory(
        &self,
        item_id: ChecklistItemId,
        is_mandatory: bool,
    ) -> ChecklistResult<ChecklistItem> {
        let mut item = self.load(item_id).await?;
        item.set_mandatory(is_mandatory, &*self.clock);
        self.items.update(&item).await?;
        Ok(item)
    }

    /// Checks or unchecks an item.
    ///
    /// A history entry is appended only when the completion flag actually
    /// flips relative to the state read by this call. Concurrent callers
    /// that each observe a flip each record one.
    ///
    /// # Errors
    ///
    /// Returns [`ChecklistError::ItemNotFound`] when the item is missing, or
    /// a repository error when persistence fails.
    pub async fn set_completed(
        &self,
        request: SetCompletionRequest,
    ) -> ChecklistResult<ToggleOutcome> {
        let SetCompletionRequest {
            item_id,
            completed,
            actor,
            reason,
        } = request;

        let mut item = self.load(item_id).await?;
        let Some(action) = item.set_completed(completed, actor.id, reason.clone(), &*self.clock)
        else {
            return Ok(ToggleOutcome {
                item,
                recorded: None,
            });
        };

        self.items.update(&item).await?;
        let entry = ChecklistStateHistoryEntry::new(
            NewChecklistStateChange {
                checklist_item_id: item.id(),
                task_id: item.task_id(),
                action,
                actor,
                reason,
            },
            &*self.clock,
        );
        self.history.append(&entry).await?;
        tracing::info!(
            item_id = %item.id(),
            task_id = %item.task_id(),
            action = %action,
            "checklist item state changed"
        );

        Ok(ToggleOutcome {
            item,
            recorded: Some(entry),
        })
    }

    /// Deletes an item. Returns `true` when an item was removed.
    ///
    /// # Errors
    ///
    /// Returns [`ChecklistError::Repository`] when persistence fails.
    pub async fn remove_item(&self, item_id: ChecklistItemId) -> ChecklistResult<bool> {
        Ok(self.items.delete(item_id).await?)
    }

    /// Lists a task's items in creation order.
    ///
    /// # Errors
    ///
    /// Returns [`ChecklistError::Repository`] when persistence fails.
    pub async fn list_items(&self, task_id: TaskId) -> ChecklistResult<Vec<ChecklistItem>> {
        Ok(self.items.find_by_task(task_id).await?)
    }

    async fn load(&self, item_id: ChecklistItemId) -> ChecklistResult<ChecklistItem> {
        self.items
            .find_by_id(item_id)
            .await?
            .ok_or(ChecklistError::ItemNotFound(item_id))
    }
}
