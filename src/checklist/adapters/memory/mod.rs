//! In-memory checklist repository.

use async_trait::async_trait;
use std::sync::{Arc, RwLock};

use crate::checklist::{
    domain::{ChecklistItem, ChecklistItemId},
    ports::{ChecklistRepository, ChecklistRepositoryError, ChecklistRepositoryResult},
};
use crate::task::domain::TaskId;

/// Thread-safe in-memory checklist repository preserving insertion order.
#[derive(Debug, Clone, Default)]
pub struct InMemoryChecklistRepository {
    items: Arc<RwLock<Vec<ChecklistItem>>>,
}

impl InMemoryChecklistRepository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn collect_where(
        &self,
        predicate: impl Fn(&ChecklistItem) -> bool,
    ) -> ChecklistRepositoryResult<Vec<ChecklistItem>> {
        let items = self.items.read().map_err(lock_error)?;
        Ok(items.iter().filter(|item| predicate(item)).cloned().collect())
    }
}

fn lock_error(err: impl std::fmt::Display) -> ChecklistRepositoryError {
    ChecklistRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl ChecklistRepository for InMemoryChecklistRepository {
    async fn store(&self, item: &ChecklistItem) -> ChecklistRepositoryResult<()> {
        let mut items = self.items.write().map_err(lock_error)?;
        if items.iter().any(|existing| existing.id() == item.id()) {
            return Err(ChecklistRepositoryError::DuplicateItem(item.id()));
        }
        items.push(item.clone());
        Ok(())
    }

    async fn update(&self, item: &ChecklistItem) -> ChecklistRepositoryResult<()> {
        let mut items = self.items.write().map_err(lock_error)?;
        let slot = items
            .iter_mut()
            .find(|existing| existing.id() == item.id())
            .ok_or(ChecklistRepositoryError::NotFound(item.id()))?;
        *slot = item.clone();
        Ok(())
    }

    async fn find_by_id(
        &self,
        id: ChecklistItemId,
    ) -> ChecklistRepositoryResult<Option<ChecklistItem>> {
        let items = self.items.read().map_err(lock_error)?;
        Ok(items.iter().find(|item| item.id() == id).cloned())
    }

    async fn find_by_task(&self, task_id: TaskId) -> ChecklistRepositoryResult<Vec<ChecklistItem>> {
        self.collect_where(|item| item.task_id() == task_id)
    }

    async fn find_uncompleted_mandatory(
        &self,
        task_id: TaskId,
    ) -> ChecklistRepositoryResult<Vec<ChecklistItem>> {
        self.collect_where(|item| item.task_id() == task_id && item.is_outstanding_mandatory())
    }

    async fn delete(&self, id: ChecklistItemId) -> ChecklistRepositoryResult<bool> {
        let mut items = self.items.write().map_err(lock_error)?;
        let before = items.len();
        items.retain(|item| item.id() != id);
        Ok(items.len() != before)
    }
}
