//! Workflow configuration.
//!
//! Status names are open-ended; the configuration tells the engine which of
//! them carry blocking and completion semantics.

use crate::enforcement::domain::EnforcementMode;
use crate::task::domain::TaskStatus;

/// Category of a status as seen by the workflow engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusCategory {
    /// The task is blocked and carries a blocking reason.
    Blocked,
    /// The task is complete.
    Completion,
    /// Any other workflow state.
    Open,
}

/// Configuration for the workflow engine and dependency service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowConfig {
    /// Status treated as blocked.
    pub blocked_status: TaskStatus,
    /// Statuses treated as completed.
    pub completion_statuses: Vec<TaskStatus>,
    /// Status assigned to newly registered tasks.
    pub initial_status: TaskStatus,
    /// Mode used when no enforcement setting is stored for a scope.
    pub default_enforcement_mode: EnforcementMode,
    /// Whether dependencies between departments produce a warning.
    pub warn_on_cross_department: bool,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            blocked_status: TaskStatus::from_static("Blocked"),
            completion_statuses: vec![TaskStatus::from_static("Done")],
            initial_status: TaskStatus::from_static("To Do"),
            default_enforcement_mode: EnforcementMode::Warn,
            warn_on_cross_department: true,
        }
    }
}

impl WorkflowConfig {
    /// Creates a configuration that blocks on every policy violation unless a
    /// scope overrides it.
    #[must_use]
    pub fn strict() -> Self {
        Self {
            default_enforcement_mode: EnforcementMode::Block,
            ..Self::default()
        }
    }

    /// Sets the blocked status name.
    #[must_use]
    pub fn with_blocked_status(mut self, status: TaskStatus) -> Self {
        self.blocked_status = status;
        self
    }

    /// Replaces the completion statuses.
    #[must_use]
    pub fn with_completion_statuses(
        mut self,
        statuses: impl IntoIterator<Item = TaskStatus>,
    ) -> Self {
        self.completion_statuses = statuses.into_iter().collect();
        self
    }

    /// Sets the initial status for registered tasks.
    #[must_use]
    pub fn with_initial_status(mut self, status: TaskStatus) -> Self {
        self.initial_status = status;
        self
    }

    /// Enables or disables cross-department dependency warnings.
    #[must_use]
    pub const fn with_cross_department_warnings(mut self, enabled: bool) -> Self {
        self.warn_on_cross_department = enabled;
        self
    }

    /// Returns `true` when `status` is the blocked status.
    #[must_use]
    pub fn is_blocked(&self, status: &TaskStatus) -> bool {
        status.matches(&self.blocked_status)
    }

    /// Returns `true` when `status` is one of the completion statuses.
    #[must_use]
    pub fn is_completion(&self, status: &TaskStatus) -> bool {
        self.completion_statuses
            .iter()
            .any(|candidate| status.matches(candidate))
    }

    /// Classifies a status.
    #[must_use]
    pub fn category(&self, status: &TaskStatus) -> StatusCategory {
        if self.is_blocked(status) {
            StatusCategory::Blocked
        } else if self.is_completion(status) {
            StatusCategory::Completion
        } else {
            StatusCategory::Open
        }
    }
}
