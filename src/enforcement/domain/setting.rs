//! Enforcement modes, policies, and scopes.

use super::ParseEnforcementError;
use crate::task::domain::DepartmentId;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// How a policy violation is handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnforcementMode {
    /// The violation is reported but the action proceeds.
    Warn,
    /// The violation prevents the action.
    Block,
}

impl EnforcementMode {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Warn => "warn",
            Self::Block => "block",
        }
    }
}

impl TryFrom<&str> for EnforcementMode {
    type Error = ParseEnforcementError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "warn" => Ok(Self::Warn),
            "block" => Ok(Self::Block),
            _ => Err(ParseEnforcementError::Mode(value.to_owned())),
        }
    }
}

impl fmt::Display for EnforcementMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Policy subject to enforcement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnforcementPolicy {
    /// A task must have an owner before it can be completed.
    Ownership,
    /// Mandatory checklist items must be completed before a task can be
    /// completed.
    MandatoryChecklist,
}

impl EnforcementPolicy {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ownership => "ownership",
            Self::MandatoryChecklist => "mandatory_checklist",
        }
    }
}

impl TryFrom<&str> for EnforcementPolicy {
    type Error = ParseEnforcementError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "ownership" => Ok(Self::Ownership),
            "mandatory_checklist" | "mandatorychecklist" => Ok(Self::MandatoryChecklist),
            _ => Err(ParseEnforcementError::Policy(value.to_owned())),
        }
    }
}

impl fmt::Display for EnforcementPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Scope an enforcement setting applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "department_id", rename_all = "snake_case")]
pub enum EnforcementScope {
    /// Applies wherever no department-specific setting exists.
    Global,
    /// Applies to tasks of one department.
    Department(DepartmentId),
}

impl EnforcementScope {
    /// Storage key of the global scope.
    pub const GLOBAL_KEY: &'static str = "global";

    /// Returns the scope for an optional department, falling back to global.
    #[must_use]
    pub const fn for_department(department_id: Option<DepartmentId>) -> Self {
        match department_id {
            Some(id) => Self::Department(id),
            None => Self::Global,
        }
    }

    /// Returns the persisted scope key.
    #[must_use]
    pub fn key(self) -> String {
        match self {
            Self::Global => Self::GLOBAL_KEY.to_owned(),
            Self::Department(id) => id.to_string(),
        }
    }

    /// Parses a persisted scope key.
    ///
    /// # Errors
    ///
    /// Returns [`ParseEnforcementError::Scope`] when the key is neither
    /// `global` nor a UUID.
    pub fn from_key(key: &str) -> Result<Self, ParseEnforcementError> {
        let trimmed = key.trim();
        if trimmed.eq_ignore_ascii_case(Self::GLOBAL_KEY) {
            return Ok(Self::Global);
        }
        Uuid::parse_str(trimmed)
            .map(|uuid| Self::Department(DepartmentId::from_uuid(uuid)))
            .map_err(|_| ParseEnforcementError::Scope(key.to_owned()))
    }
}

/// A stored enforcement mode for one scope and policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnforcementSetting {
    /// Scope the setting applies to.
    pub scope: EnforcementScope,
    /// Policy being configured.
    pub policy: EnforcementPolicy,
    /// Configured mode.
    pub mode: EnforcementMode,
}

impl EnforcementSetting {
    /// Creates a setting.
    #[must_use]
    pub const fn new(
        scope: EnforcementScope,
        policy: EnforcementPolicy,
        mode: EnforcementMode,
    ) -> Self {
        Self {
            scope,
            policy,
            mode,
        }
    }
}
