//! Domain model for task dependencies and graph algorithms.

mod dependency;
mod error;
mod graph;

pub use dependency::{
    DependencyId, DependencyType, NewDependency, PersistedDependency, TaskDependency,
};
pub use error::{DependencyDomainError, ParseDependencyTypeError};
pub use graph::{BlockingEdges, CycleCheck, DependencyGraph, GraphEdge, GraphNode};
