//! Domain model for enforcement settings and validation verdicts.

mod error;
mod setting;
mod validation;

pub use error::ParseEnforcementError;
pub use setting::{EnforcementMode, EnforcementPolicy, EnforcementScope, EnforcementSetting};
pub use validation::{IssueCode, IssueItem, ValidationIssue, ValidationResult, validate_ownership};
