//! Service-level errors for checklist operations.

use crate::audit::ports::AuditRepositoryError;
use crate::checklist::{
    domain::{ChecklistDomainError, ChecklistItemId},
    ports::ChecklistRepositoryError,
};
use crate::enforcement::ports::EnforcementSettingsError;
use thiserror::Error;

/// Errors returned by checklist services.
#[derive(Debug, Error)]
pub enum ChecklistError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] ChecklistDomainError),

    /// The checklist item does not exist.
    #[error("checklist item not found: {0}")]
    ItemNotFound(ChecklistItemId),

    /// Checklist repository operation failed.
    #[error(transparent)]
    Repository(#[from] ChecklistRepositoryError),

    /// History append failed.
    #[error(transparent)]
    Audit(#[from] AuditRepositoryError),

    /// Enforcement settings lookup failed.
    #[error(transparent)]
    Enforcement(#[from] EnforcementSettingsError),
}

impl ChecklistError {
    /// Returns the machine-readable error code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Domain(_) => "VALIDATION_ERROR",
            Self::ItemNotFound(_) | Self::Repository(ChecklistRepositoryError::NotFound(_)) => {
                "NOT_FOUND"
            }
            Self::Repository(_) | Self::Audit(_) | Self::Enforcement(_) => "INTERNAL_ERROR",
        }
    }

    /// Returns `true` for infrastructure failures whose details must not
    /// reach callers.
    #[must_use]
    pub const fn is_internal(&self) -> bool {
        matches!(
            self,
            Self::Repository(
                ChecklistRepositoryError::Persistence(_)
                    | ChecklistRepositoryError::DuplicateItem(_)
            ) | Self::Audit(_)
                | Self::Enforcement(_)
        )
    }
}

/// Result type for checklist service operations.
pub type ChecklistResult<T> = Result<T, ChecklistError>;
