//! Error types for checklist domain validation.

use thiserror::Error;

/// Errors returned while constructing or editing checklist items.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ChecklistDomainError {
    /// The item text is empty after trimming.
    #[error("checklist item text must not be empty")]
    EmptyText,
}
