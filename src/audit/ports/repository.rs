//! Repository ports for status and checklist history.
//!
//! Neither port exposes update or delete operations.

use crate::audit::domain::{
    ChecklistStateHistoryEntry, HistoryEntryId, Page, TaskStatusHistoryEntry,
};
use crate::checklist::domain::ChecklistItemId;
use crate::task::domain::{TaskId, UserId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for audit repository operations.
pub type AuditRepositoryResult<T> = Result<T, AuditRepositoryError>;

/// Append-only store of task status changes.
#[async_trait]
pub trait StatusHistoryRepository: Send + Sync {
    /// Appends an entry.
    ///
    /// # Errors
    ///
    /// Returns [`AuditRepositoryError::DuplicateEntry`] when the entry ID
    /// already exists.
    async fn append(&self, entry: &TaskStatusHistoryEntry) -> AuditRepositoryResult<()>;

    /// Returns a task's entries oldest first.
    async fn find_by_task(
        &self,
        task_id: TaskId,
    ) -> AuditRepositoryResult<Vec<TaskStatusHistoryEntry>>;

    /// Returns a task's most recent entry.
    async fn find_latest_for_task(
        &self,
        task_id: TaskId,
    ) -> AuditRepositoryResult<Option<TaskStatusHistoryEntry>>;

    /// Returns one page of an actor's entries across tasks, newest first.
    async fn find_by_actor(
        &self,
        actor_id: UserId,
        page: Page,
    ) -> AuditRepositoryResult<Vec<TaskStatusHistoryEntry>>;
}

/// Append-only store of checklist completion flips.
#[async_trait]
pub trait ChecklistHistoryRepository: Send + Sync {
    /// Appends an entry.
    ///
    /// # Errors
    ///
    /// Returns [`AuditRepositoryError::DuplicateEntry`] when the entry ID
    /// already exists.
    async fn append(&self, entry: &ChecklistStateHistoryEntry) -> AuditRepositoryResult<()>;

    /// Returns an item's entries oldest first.
    async fn find_by_item(
        &self,
        item_id: ChecklistItemId,
    ) -> AuditRepositoryResult<Vec<ChecklistStateHistoryEntry>>;

    /// Returns the entries of every item of a task, oldest first.
    async fn find_by_task(
        &self,
        task_id: TaskId,
    ) -> AuditRepositoryResult<Vec<ChecklistStateHistoryEntry>>;

    /// Returns one page of an actor's entries, newest first.
    async fn find_by_actor(
        &self,
        actor_id: UserId,
        page: Page,
    ) -> AuditRepositoryResult<Vec<ChecklistStateHistoryEntry>>;
}

/// Errors returned by audit repository implementations.
#[derive(Debug, Clone, Error)]
pub enum AuditRepositoryError {
    /// An entry with the same identifier already exists.
    #[error("duplicate history entry: {0}")]
    DuplicateEntry(HistoryEntryId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl AuditRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
