//! Mandatory checklist gate consulted before task completion.

use std::sync::Arc;

use super::ChecklistResult;
use crate::checklist::{
    domain::{ChecklistItem, ChecklistValidation, validate_checklist},
    ports::ChecklistRepository,
};
use crate::enforcement::{
    domain::{EnforcementMode, EnforcementPolicy, EnforcementScope},
    ports::EnforcementSettingsRepository,
    services::CachedEnforcementSettings,
};
use crate::task::domain::{DepartmentId, TaskId};

/// Validates task checklists against the mandatory checklist policy.
///
/// The gate fetches inputs and delegates the verdict to
/// [`validate_checklist`].
pub struct ChecklistGate<L, E>
where
    L: ChecklistRepository,
    E: EnforcementSettingsRepository,
{
    items: Arc<L>,
    settings: Arc<CachedEnforcementSettings<E>>,
}

impl<L, E> Clone for ChecklistGate<L, E>
where
    L: ChecklistRepository,
    E: EnforcementSettingsRepository,
{
    fn clone(&self) -> Self {
        Self {
            items: Arc::clone(&self.items),
            settings: Arc::clone(&self.settings),
        }
    }
}

impl<L, E> ChecklistGate<L, E>
where
    L: ChecklistRepository,
    E: EnforcementSettingsRepository,
{
    /// Creates a new gate.
    #[must_use]
    pub const fn new(items: Arc<L>, settings: Arc<CachedEnforcementSettings<E>>) -> Self {
        Self { items, settings }
    }

    /// Returns the enforcement settings resolver shared with the gate.
    #[must_use]
    pub const fn settings(&self) -> &Arc<CachedEnforcementSettings<E>> {
        &self.settings
    }

    /// Resolves the mandatory checklist mode for a department.
    ///
    /// # Errors
    ///
    /// Returns [`super::ChecklistError::Enforcement`] when the lookup fails.
    pub async fn get_enforcement_mode(
        &self,
        department_id: Option<DepartmentId>,
    ) -> ChecklistResult<EnforcementMode> {
        Ok(self
            .settings
            .resolve_mode(EnforcementPolicy::MandatoryChecklist, department_id)
            .await?)
    }

    /// Stores the mandatory checklist mode for a scope.
    ///
    /// # Errors
    ///
    /// Returns [`super::ChecklistError::Enforcement`] when the write fails.
    pub async fn set_enforcement_mode(
        &self,
        scope: EnforcementScope,
        mode: EnforcementMode,
    ) -> ChecklistResult<()> {
        self.settings
            .set_mode(scope, EnforcementPolicy::MandatoryChecklist, mode)
            .await?;
        Ok(())
    }

    /// Returns the mandatory items of a task that are not checked.
    ///
    /// # Errors
    ///
    /// Returns [`super::ChecklistError::Repository`] when the lookup fails.
    pub async fn get_uncompleted_mandatory_items(
        &self,
        task_id: TaskId,
    ) -> ChecklistResult<Vec<ChecklistItem>> {
        Ok(self.items.find_uncompleted_mandatory(task_id).await?)
    }

    /// Validates a task's checklist for completion under the department's
    /// mode.
    ///
    /// # Errors
    ///
    /// Returns [`super::ChecklistError`] when the item or settings lookup
    /// fails.
    pub async fn validate_for_task_completion(
        &self,
        task_id: TaskId,
        department_id: Option<DepartmentId>,
    ) -> ChecklistResult<ChecklistValidation> {
        let items = self.items.find_uncompleted_mandatory(task_id).await?;
        let mode = self.get_enforcement_mode(department_id).await?;
        let validation = validate_checklist(&items, mode);
        if !validation.uncompleted_mandatory_items.is_empty() {
            tracing::debug!(
                task_id = %task_id,
                mode = %mode,
                outstanding = validation.uncompleted_mandatory_items.len(),
                "mandatory checklist incomplete"
            );
        }
        Ok(validation)
    }
}
