//! Port contracts for checklist persistence.

pub mod repository;

pub use repository::{ChecklistRepository, ChecklistRepositoryError, ChecklistRepositoryResult};
