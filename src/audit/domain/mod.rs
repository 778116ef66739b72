//! Domain model for audit history entries.

mod actor;
mod checklist_history;
mod page;
mod status_history;

pub use actor::Actor;
pub use checklist_history::{
    ChecklistAction, ChecklistStateHistoryEntry, NewChecklistStateChange,
    ParseChecklistActionError, PersistedChecklistStateHistoryEntry,
};
pub use page::Page;
pub use status_history::{HistoryEntryId, PersistedStatusHistoryEntry, TaskStatusHistoryEntry};
