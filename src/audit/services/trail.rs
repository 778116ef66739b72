//! Audit trail recording and read projections.

use std::sync::Arc;

use crate::audit::{
    domain::{ChecklistStateHistoryEntry, Page, TaskStatusHistoryEntry},
    ports::{AuditRepositoryResult, ChecklistHistoryRepository, StatusHistoryRepository},
};
use crate::checklist::domain::ChecklistItemId;
use crate::task::domain::{TaskId, UserId};

/// Records and queries status and checklist history.
#[derive(Clone)]
pub struct AuditTrailService<H, K>
where
    H: StatusHistoryRepository,
    K: ChecklistHistoryRepository,
{
    status_history: Arc<H>,
    checklist_history: Arc<K>,
}

impl<H, K> AuditTrailService<H, K>
where
    H: StatusHistoryRepository,
    K: ChecklistHistoryRepository,
{
    /// Creates a new audit trail service.
    #[must_use]
    pub const fn new(status_history: Arc<H>, checklist_history: Arc<K>) -> Self {
        Self {
            status_history,
            checklist_history,
        }
    }

    /// Appends a status change.
    ///
    /// # Errors
    ///
    /// Returns the repository error when the append fails.
    pub async fn record_status_change(
        &self,
        entry: &TaskStatusHistoryEntry,
    ) -> AuditRepositoryResult<()> {
        self.status_history.append(entry).await
    }

    /// Appends a checklist state change.
    ///
    /// # Errors
    ///
    /// Returns the repository error when the append fails.
    pub async fn record_state_change(
        &self,
        entry: &ChecklistStateHistoryEntry,
    ) -> AuditRepositoryResult<()> {
        self.checklist_history.append(entry).await
    }

    /// Returns a task's status history, oldest first.
    ///
    /// # Errors
    ///
    /// Returns the repository error when the lookup fails.
    pub async fn status_history_for_task(
        &self,
        task_id: TaskId,
    ) -> AuditRepositoryResult<Vec<TaskStatusHistoryEntry>> {
        self.status_history.find_by_task(task_id).await
    }

    /// Returns a task's latest status change.
    ///
    /// # Errors
    ///
    /// Returns the repository error when the lookup fails.
    pub async fn latest_status_change(
        &self,
        task_id: TaskId,
    ) -> AuditRepositoryResult<Option<TaskStatusHistoryEntry>> {
        self.status_history.find_latest_for_task(task_id).await
    }

    /// Returns one page of status changes made by an actor, newest first.
    ///
    /// # Errors
    ///
    /// Returns the repository error when the lookup fails.
    pub async fn status_changes_by_actor(
        &self,
        actor_id: UserId,
        page: Page,
    ) -> AuditRepositoryResult<Vec<TaskStatusHistoryEntry>> {
        self.status_history.find_by_actor(actor_id, page).await
    }

    /// Returns a checklist item's flips, oldest first.
    ///
    /// # Errors
    ///
    /// Returns the repository error when the lookup fails.
    pub async fn checklist_history_for_item(
        &self,
        item_id: ChecklistItemId,
    ) -> AuditRepositoryResult<Vec<ChecklistStateHistoryEntry>> {
        self.checklist_history.find_by_item(item_id).await
    }

    /// Returns the flips of every checklist item of a task, oldest first.
    ///
    /// # Errors
    ///
    /// Returns the repository error when the lookup fails.
    pub async fn checklist_history_for_task(
        &self,
        task_id: TaskId,
    ) -> AuditRepositoryResult<Vec<ChecklistStateHistoryEntry>> {
        self.checklist_history.find_by_task(task_id).await
    }

    /// Returns one page of checklist flips made by an actor, newest first.
    ///
    /// # Errors
    ///
    /// Returns the repository error when the lookup fails.
    pub async fn checklist_changes_by_actor(
        &self,
        actor_id: UserId,
        page: Page,
    ) -> AuditRepositoryResult<Vec<ChecklistStateHistoryEntry>> {
        self.checklist_history.find_by_actor(actor_id, page).await
    }
}
