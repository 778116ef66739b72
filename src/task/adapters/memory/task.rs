//! In-memory repository for task records.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::audit::{adapters::memory::InMemoryStatusHistory, domain::TaskStatusHistoryEntry};
use crate::task::{
    domain::{ProjectId, Task, TaskId, TaskStatus},
    ports::{TaskRepository, TaskRepositoryError, TaskRepositoryResult},
};

/// Thread-safe in-memory task repository.
///
/// Status history written alongside tasks goes to the attached
/// [`InMemoryStatusHistory`]; share it with the workflow service through
/// [`InMemoryTaskRepository::with_history`].
#[derive(Debug, Clone, Default)]
pub struct InMemoryTaskRepository {
    state: Arc<RwLock<InMemoryTaskState>>,
    history: InMemoryStatusHistory,
}

#[derive(Debug, Default)]
struct InMemoryTaskState {
    tasks: HashMap<TaskId, Task>,
    project_index: HashMap<ProjectId, Vec<TaskId>>,
}

impl InMemoryTaskRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty repository that records status history into
    /// `history`.
    #[must_use]
    pub fn with_history(history: InMemoryStatusHistory) -> Self {
        Self {
            state: Arc::default(),
            history,
        }
    }

    /// Returns the attached status history.
    #[must_use]
    pub fn history(&self) -> InMemoryStatusHistory {
        self.history.clone()
    }
}

impl InMemoryTaskState {
    fn insert(&mut self, task: &Task) -> TaskRepositoryResult<()> {
        if self.tasks.contains_key(&task.id()) {
            return Err(TaskRepositoryError::DuplicateTask(task.id()));
        }
        self.project_index
            .entry(task.project_id())
            .or_default()
            .push(task.id());
        self.tasks.insert(task.id(), task.clone());
        Ok(())
    }

    fn status_slot(
        &mut self,
        task_id: TaskId,
        expected_status: &TaskStatus,
    ) -> TaskRepositoryResult<&mut Task> {
        let stored = self
            .tasks
            .get_mut(&task_id)
            .ok_or(TaskRepositoryError::NotFound(task_id))?;
        if stored.status() != expected_status {
            return Err(TaskRepositoryError::StatusConflict {
                task_id,
                expected: expected_status.clone(),
                actual: stored.status().clone(),
            });
        }
        Ok(stored)
    }
}

fn lock_error(err: impl std::fmt::Display) -> TaskRepositoryError {
    TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl TaskRepository for InMemoryTaskRepository {
    async fn store(&self, task: &Task) -> TaskRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        state.insert(task)
    }

    async fn store_with_history(
        &self,
        task: &Task,
        entry: &TaskStatusHistoryEntry,
    ) -> TaskRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        if state.tasks.contains_key(&task.id()) {
            return Err(TaskRepositoryError::DuplicateTask(task.id()));
        }
        self.history.push(entry)?;
        state.insert(task)
    }

    async fn update(&self, task: &Task) -> TaskRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;

        let old_project = state
            .tasks
            .get(&task.id())
            .ok_or(TaskRepositoryError::NotFound(task.id()))?
            .project_id();

        if old_project != task.project_id() {
            if let Some(ids) = state.project_index.get_mut(&old_project) {
                ids.retain(|id| *id != task.id());
            }
            state
                .project_index
                .entry(task.project_id())
                .or_default()
                .push(task.id());
        }
        state.tasks.insert(task.id(), task.clone());
        Ok(())
    }

    async fn update_status(
        &self,
        task: &Task,
        expected_status: &TaskStatus,
    ) -> TaskRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        let stored = state.status_slot(task.id(), expected_status)?;
        stored.apply_status_of(task);
        Ok(())
    }

    async fn update_status_with_history(
        &self,
        task: &Task,
        expected_status: &TaskStatus,
        entry: &TaskStatusHistoryEntry,
    ) -> TaskRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        let stored = state.status_slot(task.id(), expected_status)?;
        self.history.push(entry)?;
        stored.apply_status_of(task);
        Ok(())
    }

    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state.tasks.get(&id).cloned())
    }

    async fn find_by_ids(&self, ids: &[TaskId]) -> TaskRepositoryResult<Vec<Task>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(ids
            .iter()
            .filter_map(|id| state.tasks.get(id).cloned())
            .collect())
    }

    async fn find_by_project(&self, project_id: ProjectId) -> TaskRepositoryResult<Vec<Task>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state
            .project_index
            .get(&project_id)
            .map(|ids| {
                ids.iter()
                    .filter_map(|id| state.tasks.get(id).cloned())
                    .collect()
            })
            .unwrap_or_default())
    }
}
