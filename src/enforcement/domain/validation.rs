//! Validation verdicts shared by the enforcement gates.

use super::EnforcementMode;
use crate::task::domain::UserId;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Machine-readable code of a validation issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IssueCode {
    /// Mandatory checklist items remain unchecked.
    MandatoryChecklistIncomplete,
    /// The task has no owner.
    OwnerRequired,
    /// Direct blocking prerequisites are not complete.
    UncompletedBlockingDependencies,
    /// A dependency links tasks of different departments.
    CrossDepartmentDependency,
}

impl IssueCode {
    /// Returns the canonical code string.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MandatoryChecklistIncomplete => "MANDATORY_CHECKLIST_INCOMPLETE",
            Self::OwnerRequired => "OWNER_REQUIRED",
            Self::UncompletedBlockingDependencies => "UNCOMPLETED_BLOCKING_DEPENDENCIES",
            Self::CrossDepartmentDependency => "CROSS_DEPARTMENT_DEPENDENCY",
        }
    }
}

impl fmt::Display for IssueCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A record named by a validation issue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueItem {
    /// Identifier of the named record.
    pub id: Uuid,
    /// Display label (checklist text, task code, and so on).
    pub label: String,
}

impl IssueItem {
    /// Creates an issue item.
    #[must_use]
    pub fn new(id: Uuid, label: impl Into<String>) -> Self {
        Self {
            id,
            label: label.into(),
        }
    }
}

/// A structured validation problem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationIssue {
    /// Machine-readable code.
    pub code: IssueCode,
    /// Human-readable summary.
    pub message: String,
    /// Records the issue refers to.
    pub items: Vec<IssueItem>,
}

impl ValidationIssue {
    /// Creates an issue.
    #[must_use]
    pub fn new(code: IssueCode, message: impl Into<String>, items: Vec<IssueItem>) -> Self {
        Self {
            code,
            message: message.into(),
            items,
        }
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

/// Outcome of running one or more enforcement checks.
///
/// `is_valid` is `false` only when a check in `block` mode found a
/// violation; violations in `warn` mode land in `warnings`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    /// Whether the guarded action may proceed.
    pub is_valid: bool,
    /// Violations that prevent the action.
    pub errors: Vec<ValidationIssue>,
    /// Violations reported without preventing the action.
    pub warnings: Vec<ValidationIssue>,
}

impl Default for ValidationResult {
    fn default() -> Self {
        Self::valid()
    }
}

impl ValidationResult {
    /// Returns a result with no issues.
    #[must_use]
    pub const fn valid() -> Self {
        Self {
            is_valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Routes a violation to `errors` or `warnings` according to `mode`.
    #[must_use]
    pub fn violation(issue: ValidationIssue, mode: EnforcementMode) -> Self {
        match mode {
            EnforcementMode::Block => Self {
                is_valid: false,
                errors: vec![issue],
                warnings: Vec::new(),
            },
            EnforcementMode::Warn => Self {
                is_valid: true,
                errors: Vec::new(),
                warnings: vec![issue],
            },
        }
    }

    /// Appends a warning without affecting validity.
    pub fn push_warning(&mut self, issue: ValidationIssue) {
        self.warnings.push(issue);
    }

    /// Combines two results; the merged result is valid only if both are.
    #[must_use]
    pub fn merge(mut self, other: Self) -> Self {
        self.is_valid = self.is_valid && other.is_valid;
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
        self
    }
}

/// Checks the ownership policy for a task about to be completed.
#[must_use]
pub fn validate_ownership(owner_id: Option<UserId>, mode: EnforcementMode) -> ValidationResult {
    if owner_id.is_some() {
        return ValidationResult::valid();
    }
    ValidationResult::violation(
        ValidationIssue::new(
            IssueCode::OwnerRequired,
            "task must have an owner before it can be completed",
            Vec::new(),
        ),
        mode,
    )
}
