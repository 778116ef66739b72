//! Repository port for checklist items.

use crate::checklist::domain::{ChecklistItem, ChecklistItemId};
use crate::task::domain::TaskId;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for checklist repository operations.
pub type ChecklistRepositoryResult<T> = Result<T, ChecklistRepositoryError>;

/// Checklist persistence contract.
#[async_trait]
pub trait ChecklistRepository: Send + Sync {
    /// Stores a new item.
    ///
    /// # Errors
    ///
    /// Returns [`ChecklistRepositoryError::DuplicateItem`] when the item ID
    /// already exists.
    async fn store(&self, item: &ChecklistItem) -> ChecklistRepositoryResult<()>;

    /// Overwrites an existing item. Concurrent writers resolve
    /// last-write-wins.
    ///
    /// # Errors
    ///
    /// Returns [`ChecklistRepositoryError::NotFound`] when the item does not
    /// exist.
    async fn update(&self, item: &ChecklistItem) -> ChecklistRepositoryResult<()>;

    /// Finds an item by identifier.
    async fn find_by_id(
        &self,
        id: ChecklistItemId,
    ) -> ChecklistRepositoryResult<Option<ChecklistItem>>;

    /// Returns the items of a task in creation order.
    async fn find_by_task(&self, task_id: TaskId) -> ChecklistRepositoryResult<Vec<ChecklistItem>>;

    /// Returns the mandatory items of a task that are not checked, in
    /// creation order.
    async fn find_uncompleted_mandatory(
        &self,
        task_id: TaskId,
    ) -> ChecklistRepositoryResult<Vec<ChecklistItem>>;

    /// Deletes an item. Returns `true` when an item was removed.
    async fn delete(&self, id: ChecklistItemId) -> ChecklistRepositoryResult<bool>;
}

/// Errors returned by checklist repository implementations.
#[derive(Debug, Clone, Error)]
pub enum ChecklistRepositoryError {
    /// An item with the same identifier already exists.
    #[error("duplicate checklist item identifier: {0}")]
    DuplicateItem(ChecklistItemId),

    /// The item was not found.
    #[error("checklist item not found: {0}")]
    NotFound(ChecklistItemId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl ChecklistRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
