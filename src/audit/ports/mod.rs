//! Append-only port contracts for audit history.

pub mod repository;

pub use repository::{
    AuditRepositoryError, AuditRepositoryResult, ChecklistHistoryRepository,
    StatusHistoryRepository,
};
