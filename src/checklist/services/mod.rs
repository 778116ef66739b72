//! Application services for checklists.

mod error;
mod gate;
mod items;

pub use error::{ChecklistError, ChecklistResult};
pub use gate::ChecklistGate;
pub use items::{AddChecklistItemRequest, ChecklistService, SetCompletionRequest, ToggleOutcome};
