//! In-memory append-only history stores.

use async_trait::async_trait;
use std::sync::{Arc, RwLock};

use crate::audit::{
    domain::{ChecklistStateHistoryEntry, Page, TaskStatusHistoryEntry},
    ports::{
        AuditRepositoryError, AuditRepositoryResult, ChecklistHistoryRepository,
        StatusHistoryRepository,
    },
};
use crate::checklist::domain::ChecklistItemId;
use crate::task::domain::{TaskId, UserId};

fn lock_error(err: impl std::fmt::Display) -> AuditRepositoryError {
    AuditRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

/// Applies newest-first ordering and a page window to matching entries.
fn newest_first_page<T: Clone>(
    entries: &[T],
    matches: impl Fn(&T) -> bool,
    page: Page,
) -> Vec<T> {
    entries
        .iter()
        .rev()
        .filter(|entry| matches(entry))
        .skip(page.offset())
        .take(page.limit())
        .cloned()
        .collect()
}

/// Thread-safe in-memory status history. Append order is chronological.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStatusHistory {
    entries: Arc<RwLock<Vec<TaskStatusHistoryEntry>>>,
}

impl InMemoryStatusHistory {
    /// Creates an empty history.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().map(|entries| entries.len()).unwrap_or_default()
    }

    /// Returns `true` when nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Synchronous append, so callers can record an entry while holding
    /// their own lock.
    pub(crate) fn push(&self, entry: &TaskStatusHistoryEntry) -> AuditRepositoryResult<()> {
        let mut entries = self.entries.write().map_err(lock_error)?;
        if entries.iter().any(|existing| existing.id() == entry.id()) {
            return Err(AuditRepositoryError::DuplicateEntry(entry.id()));
        }
        entries.push(entry.clone());
        Ok(())
    }
}

#[async_trait]
impl StatusHistoryRepository for InMemoryStatusHistory {
    async fn append(&self, entry: &TaskStatusHistoryEntry) -> AuditRepositoryResult<()> {
        self.push(entry)
    }

    async fn find_by_task(
        &self,
        task_id: TaskId,
    ) -> AuditRepositoryResult<Vec<TaskStatusHistoryEntry>> {
        let entries = self.entries.read().map_err(lock_error)?;
        Ok(entries
            .iter()
            .filter(|entry| entry.task_id() == task_id)
            .cloned()
            .collect())
    }

    async fn find_latest_for_task(
        &self,
        task_id: TaskId,
    ) -> AuditRepositoryResult<Option<TaskStatusHistoryEntry>> {
        let entries = self.entries.read().map_err(lock_error)?;
        Ok(entries
            .iter()
            .rev()
            .find(|entry| entry.task_id() == task_id)
            .cloned())
    }

    async fn find_by_actor(
        &self,
        actor_id: UserId,
        page: Page,
    ) -> AuditRepositoryResult<Vec<TaskStatusHistoryEntry>> {
        let entries = self.entries.read().map_err(lock_error)?;
        Ok(newest_first_page(
            &entries,
            |entry| entry.changed_by() == actor_id,
            page,
        ))
    }
}

/// Thread-safe in-memory checklist history. Append order is chronological.
#[derive(Debug, Clone, Default)]
pub struct InMemoryChecklistHistory {
    entries: Arc<RwLock<Vec<ChecklistStateHistoryEntry>>>,
}

impl InMemoryChecklistHistory {
    /// Creates an empty history.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ChecklistHistoryRepository for InMemoryChecklistHistory {
    async fn append(&self, entry: &ChecklistStateHistoryEntry) -> AuditRepositoryResult<()> {
        let mut entries = self.entries.write().map_err(lock_error)?;
        if entries.iter().any(|existing| existing.id() == entry.id()) {
            return Err(AuditRepositoryError::DuplicateEntry(entry.id()));
        }
        entries.push(entry.clone());
        Ok(())
    }

    async fn find_by_item(
        &self,
        item_id: ChecklistItemId,
    ) -> AuditRepositoryResult<Vec<ChecklistStateHistoryEntry>> {
        let entries = self.entries.read().map_err(lock_error)?;
        Ok(entries
            .iter()
            .filter(|entry| entry.checklist_item_id() == item_id)
            .cloned()
            .collect())
    }

    async fn find_by_task(
        &self,
        task_id: TaskId,
    ) -> AuditRepositoryResult<Vec<ChecklistStateHistoryEntry>> {
        let entries = self.entries.read().map_err(lock_error)?;
        Ok(entries
            .iter()
            .filter(|entry| entry.task_id() == task_id)
            .cloned()
            .collect())
    }

    async fn find_by_actor(
        &self,
        actor_id: UserId,
        page: Page,
    ) -> AuditRepositoryResult<Vec<ChecklistStateHistoryEntry>> {
        let entries = self.entries.read().map_err(lock_error)?;
        Ok(newest_first_page(
            &entries,
            |entry| entry.actor().id == actor_id,
            page,
        ))
    }
}
