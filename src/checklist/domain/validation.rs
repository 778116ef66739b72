//! Pure mandatory-checklist validation.
//!
//! The persistence-backed gate fetches items and delegates here, so both
//! paths reach the same verdict for the same items and mode.

use super::ChecklistItem;
use crate::enforcement::domain::{
    EnforcementMode, IssueCode, IssueItem, ValidationIssue, ValidationResult,
};
use serde::{Deserialize, Serialize};

/// Verdict of validating a checklist for task completion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistValidation {
    /// Mode the checklist was validated under.
    pub mode: EnforcementMode,
    /// Mandatory items that are not checked, in input order.
    pub uncompleted_mandatory_items: Vec<ChecklistItem>,
    /// Validity plus routed errors and warnings.
    pub result: ValidationResult,
}

impl ChecklistValidation {
    /// Returns whether the completion may proceed.
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.result.is_valid
    }
}

/// Validates `items` for task completion under `mode`.
///
/// Items are not filtered by task; callers pass the checklist of one task.
#[must_use]
pub fn validate_checklist(items: &[ChecklistItem], mode: EnforcementMode) -> ChecklistValidation {
    let uncompleted: Vec<ChecklistItem> = items
        .iter()
        .filter(|item| item.is_outstanding_mandatory())
        .cloned()
        .collect();

    let result = if uncompleted.is_empty() {
        ValidationResult::valid()
    } else {
        ValidationResult::violation(incomplete_issue(&uncompleted), mode)
    };

    ChecklistValidation {
        mode,
        uncompleted_mandatory_items: uncompleted,
        result,
    }
}

fn incomplete_issue(uncompleted: &[ChecklistItem]) -> ValidationIssue {
    let items = uncompleted
        .iter()
        .map(|item| IssueItem::new(item.id().into_inner(), item.text()))
        .collect();
    ValidationIssue::new(
        IssueCode::MandatoryChecklistIncomplete,
        format!(
            "{} mandatory checklist item(s) must be completed before the task can be completed",
            uncompleted.len()
        ),
        items,
    )
}
