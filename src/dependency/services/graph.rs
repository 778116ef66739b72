//! Dependency graph orchestration service.

use std::collections::HashSet;
use std::sync::Arc;

use mockable::Clock;
use serde::{Deserialize, Serialize};

use super::{DependencyError, DependencyResult};
use crate::config::WorkflowConfig;
use crate::dependency::{
    domain::{
        CycleCheck, DependencyGraph, DependencyId, GraphEdge, GraphNode, NewDependency,
        TaskDependency,
    },
    ports::{DependencyRepository, DependencyRepositoryError},
};
use crate::enforcement::domain::{IssueCode, IssueItem, ValidationIssue};
use crate::task::{
    domain::{ProjectId, Task, TaskId},
    ports::TaskRepository,
};

/// A stored dependency together with the non-fatal warnings it raised.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddedDependency {
    /// The stored edge.
    pub dependency: TaskDependency,
    /// Warnings such as `CROSS_DEPARTMENT_DEPENDENCY`.
    pub warnings: Vec<ValidationIssue>,
}

/// Direct `BLOCKS` prerequisites of a task that are not complete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockingDependencies {
    /// Whether any prerequisite is still open.
    pub has_blocking: bool,
    /// Open prerequisites in edge order.
    pub blocking_tasks: Vec<Task>,
}

/// Dependency graph service.
///
/// Every edge mutation goes through this service; the cycle check and the
/// insert are delegated to [`DependencyRepository::insert_acyclic`] so that
/// they are atomic.
pub struct DependencyService<D, T, C>
where
    D: DependencyRepository,
    T: TaskRepository,
    C: Clock + Send + Sync,
{
    dependencies: Arc<D>,
    tasks: Arc<T>,
    config: Arc<WorkflowConfig>,
    clock: Arc<C>,
}

impl<D, T, C> Clone for DependencyService<D, T, C>
where
    D: DependencyRepository,
    T: TaskRepository,
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            dependencies: Arc::clone(&self.dependencies),
            tasks: Arc::clone(&self.tasks),
            config: Arc::clone(&self.config),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<D, T, C> DependencyService<D, T, C>
where
    D: DependencyRepository,
    T: TaskRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new dependency service.
    #[must_use]
    pub const fn new(
        dependencies: Arc<D>,
        tasks: Arc<T>,
        config: Arc<WorkflowConfig>,
        clock: Arc<C>,
    ) -> Self {
        Self {
            dependencies,
            tasks,
            config,
            clock,
        }
    }

    /// Adds an edge after validating both endpoints.
    ///
    /// # Errors
    ///
    /// Returns [`DependencyError::SelfDependency`],
    /// [`DependencyError::TaskNotFound`],
    /// [`DependencyError::DuplicateDependency`], or
    /// [`DependencyError::CycleDetected`] when the edge is rejected. Nothing
    /// is stored in any of these cases.
    pub async fn add_dependency(&self, input: NewDependency) -> DependencyResult<AddedDependency> {
        let dependency = TaskDependency::new(input, &*self.clock)?;
        let (task, prerequisite) = self
            .load_endpoints(input.task_id, input.depends_on_task_id)
            .await?;

        if let Err(err) = self.dependencies.insert_acyclic(&dependency).await {
            if let DependencyRepositoryError::CycleDetected { path } = &err {
                tracing::debug!(
                    task_id = %input.task_id,
                    depends_on_task_id = %input.depends_on_task_id,
                    path_len = path.len(),
                    "dependency rejected: cycle detected"
                );
            }
            return Err(err.into());
        }

        tracing::info!(
            dependency_id = %dependency.id(),
            task_id = %dependency.task_id(),
            depends_on_task_id = %dependency.depends_on_task_id(),
            dependency_type = %dependency.dependency_type(),
            "dependency added"
        );

        Ok(AddedDependency {
            dependency,
            warnings: self.cross_department_warnings(&task, &prerequisite),
        })
    }

    /// Runs every check of [`Self::add_dependency`] without storing anything.
    ///
    /// The cycle check runs against a snapshot, so a concurrent insert may
    /// still make a later `add_dependency` fail.
    ///
    /// # Errors
    ///
    /// Returns the same errors as [`Self::add_dependency`].
    pub async fn validate_dependency(
        &self,
        input: NewDependency,
    ) -> DependencyResult<Vec<ValidationIssue>> {
        if input.task_id == input.depends_on_task_id {
            return Err(DependencyError::SelfDependency(input.task_id));
        }
        let (task, prerequisite) = self
            .load_endpoints(input.task_id, input.depends_on_task_id)
            .await?;

        if self
            .dependencies
            .find_by_tasks(input.task_id, input.depends_on_task_id)
            .await?
            .is_some()
        {
            return Err(DependencyError::DuplicateDependency {
                task_id: input.task_id,
                depends_on_task_id: input.depends_on_task_id,
            });
        }

        if input.dependency_type.is_blocking() {
            let check = self
                .detect_circular_dependency(input.task_id, input.depends_on_task_id)
                .await?;
            if let Some(path) = check.path {
                return Err(DependencyError::CycleDetected { path });
            }
        }

        Ok(self.cross_department_warnings(&task, &prerequisite))
    }

    /// Checks whether `task_id -> depends_on_task_id` would close a cycle of
    /// `BLOCKS` edges. The returned path runs from `depends_on_task_id` to
    /// `task_id`.
    ///
    /// # Errors
    ///
    /// Returns [`DependencyError::Repository`] when the edge snapshot cannot
    /// be loaded.
    pub async fn detect_circular_dependency(
        &self,
        task_id: TaskId,
        depends_on_task_id: TaskId,
    ) -> DependencyResult<CycleCheck> {
        let check = self
            .dependencies
            .blocking_edges()
            .await?
            .check_new_edge(task_id, depends_on_task_id);
        tracing::debug!(
            task_id = %task_id,
            depends_on_task_id = %depends_on_task_id,
            would_cycle = check.would_cycle,
            "cycle check completed"
        );
        Ok(check)
    }

    /// Removes an edge by identifier. Returns `true` when an edge was
    /// removed; removing a missing edge is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`DependencyError::Repository`] when persistence fails.
    pub async fn remove_dependency(&self, id: DependencyId) -> DependencyResult<bool> {
        let removed = self.dependencies.delete(id).await?;
        if removed {
            tracing::info!(dependency_id = %id, "dependency removed");
        }
        Ok(removed)
    }

    /// Removes the edge linking an ordered pair. Returns `true` when an edge
    /// was removed.
    ///
    /// # Errors
    ///
    /// Returns [`DependencyError::Repository`] when persistence fails.
    pub async fn remove_dependency_by_tasks(
        &self,
        task_id: TaskId,
        depends_on_task_id: TaskId,
    ) -> DependencyResult<bool> {
        let removed = self
            .dependencies
            .delete_by_tasks(task_id, depends_on_task_id)
            .await?;
        if removed {
            tracing::info!(
                task_id = %task_id,
                depends_on_task_id = %depends_on_task_id,
                "dependency removed"
            );
        }
        Ok(removed)
    }

    /// Returns the edges where `task_id` is the dependent task.
    ///
    /// # Errors
    ///
    /// Returns [`DependencyError::Repository`] when the lookup fails.
    pub async fn get_task_dependencies(
        &self,
        task_id: TaskId,
    ) -> DependencyResult<Vec<TaskDependency>> {
        Ok(self.dependencies.find_outgoing(task_id).await?)
    }

    /// Returns the edges where `task_id` is the prerequisite.
    ///
    /// # Errors
    ///
    /// Returns [`DependencyError::Repository`] when the lookup fails.
    pub async fn get_task_dependents(
        &self,
        task_id: TaskId,
    ) -> DependencyResult<Vec<TaskDependency>> {
        Ok(self.dependencies.find_incoming(task_id).await?)
    }

    /// Lists the direct `BLOCKS` prerequisites of a task whose status is not
    /// a completion status.
    ///
    /// Only direct edges count. A prerequisite that no longer exists is
    /// skipped and logged.
    ///
    /// # Errors
    ///
    /// Returns [`DependencyError`] when a lookup fails.
    pub async fn has_uncompleted_blocking_dependencies(
        &self,
        task_id: TaskId,
    ) -> DependencyResult<BlockingDependencies> {
        let prerequisite_ids: Vec<TaskId> = self
            .dependencies
            .find_outgoing(task_id)
            .await?
            .iter()
            .filter(|edge| edge.dependency_type().is_blocking())
            .map(TaskDependency::depends_on_task_id)
            .collect();

        let found = self.tasks.find_by_ids(&prerequisite_ids).await?;
        let mut blocking_tasks = Vec::new();
        for prerequisite_id in prerequisite_ids {
            let Some(prerequisite) = found.iter().find(|task| task.id() == prerequisite_id) else {
                tracing::warn!(
                    task_id = %task_id,
                    depends_on_task_id = %prerequisite_id,
                    "blocking prerequisite no longer exists"
                );
                continue;
            };
            if !self.config.is_completion(prerequisite.status()) {
                blocking_tasks.push(prerequisite.clone());
            }
        }

        Ok(BlockingDependencies {
            has_blocking: !blocking_tasks.is_empty(),
            blocking_tasks,
        })
    }

    /// Exports the dependency graph of a project.
    ///
    /// Nodes cover every project task plus every existing task outside the
    /// project that an edge references. Every edge touching the project is
    /// exported, including edges whose external endpoint no longer exists;
    /// those are logged.
    ///
    /// # Errors
    ///
    /// Returns [`DependencyError`] when a lookup fails.
    pub async fn get_dependency_graph(
        &self,
        project_id: ProjectId,
    ) -> DependencyResult<DependencyGraph> {
        let project_tasks = self.tasks.find_by_project(project_id).await?;
        let project_ids: Vec<TaskId> = project_tasks.iter().map(Task::id).collect();
        let touching = self.dependencies.find_touching(&project_ids).await?;

        let known: HashSet<TaskId> = project_ids.iter().copied().collect();
        let mut external_ids = Vec::new();
        for edge in &touching {
            for endpoint in [edge.task_id(), edge.depends_on_task_id()] {
                if !known.contains(&endpoint) && !external_ids.contains(&endpoint) {
                    external_ids.push(endpoint);
                }
            }
        }
        let external_tasks = self.tasks.find_by_ids(&external_ids).await?;

        let nodes: Vec<GraphNode> = project_tasks
            .iter()
            .chain(external_tasks.iter())
            .map(GraphNode::from)
            .collect();
        let present: HashSet<TaskId> = nodes.iter().map(|node| node.id).collect();
        for edge in &touching {
            for endpoint in [edge.task_id(), edge.depends_on_task_id()] {
                if !present.contains(&endpoint) {
                    tracing::warn!(
                        project_id = %project_id,
                        dependency_id = %edge.id(),
                        missing_task_id = %endpoint,
                        "exported dependency references a task that no longer exists"
                    );
                }
            }
        }
        let edges = touching.iter().map(GraphEdge::from).collect();

        Ok(DependencyGraph { nodes, edges })
    }

    async fn load_endpoints(
        &self,
        task_id: TaskId,
        depends_on_task_id: TaskId,
    ) -> DependencyResult<(Task, Task)> {
        let task = self
            .tasks
            .find_by_id(task_id)
            .await?
            .ok_or(DependencyError::TaskNotFound(task_id))?;
        let prerequisite = self
            .tasks
            .find_by_id(depends_on_task_id)
            .await?
            .ok_or(DependencyError::TaskNotFound(depends_on_task_id))?;
        Ok((task, prerequisite))
    }

    fn cross_department_warnings(&self, task: &Task, prerequisite: &Task) -> Vec<ValidationIssue> {
        if !self.config.warn_on_cross_department {
            return Vec::new();
        }
        match (task.department_id(), prerequisite.department_id()) {
            (Some(left), Some(right)) if left != right => {
                tracing::warn!(
                    task_id = %task.id(),
                    depends_on_task_id = %prerequisite.id(),
                    "dependency crosses departments"
                );
                vec![ValidationIssue::new(
                    IssueCode::CrossDepartmentDependency,
                    format!(
                        "{} and {} belong to different departments",
                        task.code(),
                        prerequisite.code()
                    ),
                    vec![
                        IssueItem::new(task.id().into_inner(), task.code()),
                        IssueItem::new(prerequisite.id().into_inner(), prerequisite.code()),
                    ],
                )]
            }
            _ => Vec::new(),
        }
    }
}
