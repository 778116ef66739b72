//! Cycle detection over `BLOCKS` edges and graph export types.

use super::{DependencyId, DependencyType, TaskDependency};
use crate::task::domain::{Task, TaskId, TaskStatus};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Adjacency of `BLOCKS` edges in the "depends on" direction.
///
/// `RELATES_TO` edges are never added.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlockingEdges {
    successors: HashMap<TaskId, Vec<TaskId>>,
}

/// Outcome of checking whether a proposed edge would close a cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleCheck {
    /// Whether adding the edge would create a cycle.
    pub would_cycle: bool,
    /// Existing path from the prerequisite back to the dependent task,
    /// present only when `would_cycle` is `true`.
    pub path: Option<Vec<TaskId>>,
}

impl CycleCheck {
    /// Returns a check result with no cycle.
    #[must_use]
    pub const fn acyclic() -> Self {
        Self {
            would_cycle: false,
            path: None,
        }
    }
}

impl BlockingEdges {
    /// Creates an empty adjacency.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the adjacency from dependency edges, keeping only `BLOCKS`.
    #[must_use]
    pub fn from_dependencies<'a>(edges: impl IntoIterator<Item = &'a TaskDependency>) -> Self {
        edges
            .into_iter()
            .filter(|edge| edge.dependency_type().is_blocking())
            .map(|edge| (edge.task_id(), edge.depends_on_task_id()))
            .collect()
    }

    /// Adds an edge from `task_id` to its prerequisite. Repeated pairs are
    /// stored once.
    pub fn insert(&mut self, task_id: TaskId, depends_on_task_id: TaskId) {
        let prerequisites = self.successors.entry(task_id).or_default();
        if !prerequisites.contains(&depends_on_task_id) {
            prerequisites.push(depends_on_task_id);
        }
    }

    /// Returns the direct prerequisites of a task.
    #[must_use]
    pub fn prerequisites(&self, task_id: TaskId) -> &[TaskId] {
        self.successors.get(&task_id).map_or(&[], Vec::as_slice)
    }

    /// Returns the number of edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.successors.values().map(Vec::len).sum()
    }

    /// Finds a path from `from` to `to` following prerequisites.
    ///
    /// Uses an iterative depth-first search with an explicit stack and
    /// visited set, so deep chains cannot exhaust the call stack. The
    /// returned path starts at `from` and ends at `to`.
    #[must_use]
    pub fn find_path(&self, from: TaskId, to: TaskId) -> Option<Vec<TaskId>> {
        if from == to {
            return Some(vec![from]);
        }

        let mut visited = HashSet::from([from]);
        let mut parents: HashMap<TaskId, TaskId> = HashMap::new();
        let mut stack = vec![from];

        while let Some(current) = stack.pop() {
            for &next in self.prerequisites(current) {
                if !visited.insert(next) {
                    continue;
                }
                parents.insert(next, current);
                if next == to {
                    return Some(rebuild_path(&parents, from, to));
                }
                stack.push(next);
            }
        }
        None
    }

    /// Checks whether adding `task_id -> depends_on_task_id` would close a
    /// cycle, which happens exactly when `task_id` is already reachable from
    /// `depends_on_task_id`.
    #[must_use]
    pub fn check_new_edge(&self, task_id: TaskId, depends_on_task_id: TaskId) -> CycleCheck {
        match self.find_path(depends_on_task_id, task_id) {
            Some(path) => CycleCheck {
                would_cycle: true,
                path: Some(path),
            },
            None => CycleCheck::acyclic(),
        }
    }

    /// Returns `true` when the adjacency contains no directed cycle.
    ///
    /// Runs Kahn's algorithm: a graph is acyclic exactly when every node can
    /// be removed in topological order.
    #[must_use]
    pub fn is_acyclic(&self) -> bool {
        let mut in_degree: HashMap<TaskId, usize> = HashMap::new();
        for (&task, prerequisites) in &self.successors {
            in_degree.entry(task).or_insert(0);
            for &prerequisite in prerequisites {
                *in_degree.entry(prerequisite).or_insert(0) += 1;
            }
        }

        let mut ready: Vec<TaskId> = in_degree
            .iter()
            .filter(|&(_, &degree)| degree == 0)
            .map(|(&task, _)| task)
            .collect();
        let mut removed = 0_usize;

        while let Some(task) = ready.pop() {
            removed += 1;
            for prerequisite in self.prerequisites(task) {
                if let Some(degree) = in_degree.get_mut(prerequisite) {
                    *degree = degree.saturating_sub(1);
                    if *degree == 0 {
                        ready.push(*prerequisite);
                    }
                }
            }
        }
        removed == in_degree.len()
    }
}

impl FromIterator<(TaskId, TaskId)> for BlockingEdges {
    fn from_iter<I: IntoIterator<Item = (TaskId, TaskId)>>(iter: I) -> Self {
        let mut edges = Self::new();
        for (task_id, depends_on_task_id) in iter {
            edges.insert(task_id, depends_on_task_id);
        }
        edges
    }
}

fn rebuild_path(parents: &HashMap<TaskId, TaskId>, from: TaskId, to: TaskId) -> Vec<TaskId> {
    let mut path = vec![to];
    let mut current = to;
    while current != from {
        let Some(&parent) = parents.get(&current) else {
            break;
        };
        path.push(parent);
        current = parent;
    }
    path.reverse();
    path
}

/// Task node in an exported dependency graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphNode {
    /// Task identifier.
    pub id: TaskId,
    /// Task code.
    pub code: String,
    /// Task title.
    pub title: String,
    /// Current status.
    pub status: TaskStatus,
}

impl From<&Task> for GraphNode {
    fn from(task: &Task) -> Self {
        Self {
            id: task.id(),
            code: task.code().to_owned(),
            title: task.title().to_owned(),
            status: task.status().clone(),
        }
    }
}

/// Dependency edge in an exported dependency graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphEdge {
    /// Edge identifier.
    pub id: DependencyId,
    /// Dependent task.
    pub task_id: TaskId,
    /// Prerequisite task.
    pub depends_on_task_id: TaskId,
    /// Edge kind.
    pub dependency_type: DependencyType,
}

impl From<&TaskDependency> for GraphEdge {
    fn from(edge: &TaskDependency) -> Self {
        Self {
            id: edge.id(),
            task_id: edge.task_id(),
            depends_on_task_id: edge.depends_on_task_id(),
            dependency_type: edge.dependency_type(),
        }
    }
}

/// Read-only projection of a project's dependency graph.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyGraph {
    /// Project tasks plus any external task referenced by an edge.
    pub nodes: Vec<GraphNode>,
    /// Edges with at least one endpoint in the project.
    pub edges: Vec<GraphEdge>,
}
