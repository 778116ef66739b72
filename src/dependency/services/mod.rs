//! Application services for the dependency graph.

mod error;
mod graph;

pub use error::{DependencyError, DependencyResult};
pub use graph::{AddedDependency, BlockingDependencies, DependencyService};
