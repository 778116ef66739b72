//! In-memory dependency repository.

use async_trait::async_trait;
use std::sync::{Arc, RwLock};

use crate::dependency::{
    domain::{BlockingEdges, DependencyId, TaskDependency},
    ports::{DependencyRepository, DependencyRepositoryError, DependencyRepositoryResult},
};
use crate::task::domain::TaskId;

/// Thread-safe in-memory dependency repository.
///
/// `insert_acyclic` holds the write lock across the duplicate check, the
/// cycle check, and the insert, which serializes concurrent inserts.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDependencyRepository {
    edges: Arc<RwLock<Vec<TaskDependency>>>,
}

impl InMemoryDependencyRepository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored edges.
    ///
    /// # Errors
    ///
    /// Returns [`DependencyRepositoryError::Persistence`] when the lock is
    /// poisoned.
    pub fn len(&self) -> DependencyRepositoryResult<usize> {
        Ok(self.edges.read().map_err(lock_error)?.len())
    }

    /// Returns `true` when no edges are stored.
    ///
    /// # Errors
    ///
    /// Returns [`DependencyRepositoryError::Persistence`] when the lock is
    /// poisoned.
    pub fn is_empty(&self) -> DependencyRepositoryResult<bool> {
        Ok(self.len()? == 0)
    }

    fn collect_where(
        &self,
        predicate: impl Fn(&TaskDependency) -> bool,
    ) -> DependencyRepositoryResult<Vec<TaskDependency>> {
        let edges = self.edges.read().map_err(lock_error)?;
        Ok(edges.iter().filter(|edge| predicate(edge)).cloned().collect())
    }

    fn remove_where(
        &self,
        predicate: impl Fn(&TaskDependency) -> bool,
    ) -> DependencyRepositoryResult<bool> {
        let mut edges = self.edges.write().map_err(lock_error)?;
        let before = edges.len();
        edges.retain(|edge| !predicate(edge));
        Ok(edges.len() != before)
    }
}

fn lock_error(err: impl std::fmt::Display) -> DependencyRepositoryError {
    DependencyRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl DependencyRepository for InMemoryDependencyRepository {
    async fn insert_acyclic(&self, dependency: &TaskDependency) -> DependencyRepositoryResult<()> {
        let mut edges = self.edges.write().map_err(lock_error)?;
        let task_id = dependency.task_id();
        let depends_on_task_id = dependency.depends_on_task_id();

        if edges.iter().any(|edge| edge.links(task_id, depends_on_task_id)) {
            return Err(DependencyRepositoryError::DuplicateDependency {
                task_id,
                depends_on_task_id,
            });
        }

        if dependency.dependency_type().is_blocking() {
            let check = BlockingEdges::from_dependencies(edges.iter())
                .check_new_edge(task_id, depends_on_task_id);
            if let Some(path) = check.path {
                return Err(DependencyRepositoryError::CycleDetected { path });
            }
        }

        edges.push(dependency.clone());
        Ok(())
    }

    async fn find_by_id(
        &self,
        id: DependencyId,
    ) -> DependencyRepositoryResult<Option<TaskDependency>> {
        let edges = self.edges.read().map_err(lock_error)?;
        Ok(edges.iter().find(|edge| edge.id() == id).cloned())
    }

    async fn find_by_tasks(
        &self,
        task_id: TaskId,
        depends_on_task_id: TaskId,
    ) -> DependencyRepositoryResult<Option<TaskDependency>> {
        let edges = self.edges.read().map_err(lock_error)?;
        Ok(edges
            .iter()
            .find(|edge| edge.links(task_id, depends_on_task_id))
            .cloned())
    }

    async fn find_outgoing(
        &self,
        task_id: TaskId,
    ) -> DependencyRepositoryResult<Vec<TaskDependency>> {
        self.collect_where(|edge| edge.task_id() == task_id)
    }

    async fn find_incoming(
        &self,
        task_id: TaskId,
    ) -> DependencyRepositoryResult<Vec<TaskDependency>> {
        self.collect_where(|edge| edge.depends_on_task_id() == task_id)
    }

    async fn find_touching(
        &self,
        task_ids: &[TaskId],
    ) -> DependencyRepositoryResult<Vec<TaskDependency>> {
        self.collect_where(|edge| {
            task_ids.contains(&edge.task_id()) || task_ids.contains(&edge.depends_on_task_id())
        })
    }

    async fn blocking_edges(&self) -> DependencyRepositoryResult<BlockingEdges> {
        let edges = self.edges.read().map_err(lock_error)?;
        Ok(BlockingEdges::from_dependencies(edges.iter()))
    }

    async fn delete(&self, id: DependencyId) -> DependencyRepositoryResult<bool> {
        self.remove_where(|edge| edge.id() == id)
    }

    async fn delete_by_tasks(
        &self,
        task_id: TaskId,
        depends_on_task_id: TaskId,
    ) -> DependencyRepositoryResult<bool> {
        self.remove_where(|edge| edge.links(task_id, depends_on_task_id))
    }
}
