//! Domain model for checklist items and completion validation.

mod error;
mod item;
mod validation;

pub use error::ChecklistDomainError;
pub use item::{ChecklistItem, ChecklistItemId, PersistedChecklistItem};
pub use validation::{ChecklistValidation, validate_checklist};
