//! Task status state machine with blocking, enforcement gates, and audit.

use std::sync::Arc;

use mockable::Clock;
use serde::{Deserialize, Serialize};

use super::notify::spawn_blocked_notification;
use super::{ValidationCode, ValidationError, WorkflowError, WorkflowResult};
use crate::audit::{domain::TaskStatusHistoryEntry, ports::StatusHistoryRepository};
use crate::checklist::{ports::ChecklistRepository, services::ChecklistGate};
use crate::config::WorkflowConfig;
use crate::dependency::{
    ports::DependencyRepository,
    services::{BlockingDependencies, DependencyService},
};
use crate::enforcement::{
    domain::{
        EnforcementMode, EnforcementPolicy, EnforcementScope, IssueCode, IssueItem,
        ValidationIssue, ValidationResult, validate_ownership,
    },
    ports::EnforcementSettingsRepository,
};
use crate::task::{
    domain::{BlockedReason, DepartmentId, Task, TaskDraft, TaskId, TaskStatus, UserId},
    ports::{DepartmentDirectory, Notifier, ProjectProgress, TaskRepository},
};

/// Request to move a task into another status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateStatusRequest {
    task_id: TaskId,
    status: TaskStatus,
    actor: UserId,
    note: Option<String>,
    blocked_reason: Option<String>,
}

impl UpdateStatusRequest {
    /// Creates a request with no note or blocking reason.
    #[must_use]
    pub const fn new(task_id: TaskId, status: TaskStatus, actor: UserId) -> Self {
        Self {
            task_id,
            status,
            actor,
            note: None,
            blocked_reason: None,
        }
    }

    /// Sets the note recorded in the status history.
    #[must_use]
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    /// Sets the reason required when moving into the blocked status.
    #[must_use]
    pub fn with_blocked_reason(mut self, reason: impl Into<String>) -> Self {
        self.blocked_reason = Some(reason.into());
        self
    }
}

/// Result of a status update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionOutcome {
    /// Task after the request.
    pub task: Task,
    /// Whether the status changed and a history entry was written.
    pub changed: bool,
    /// Non-blocking policy violations raised by the transition.
    pub warnings: Vec<ValidationIssue>,
}

/// External collaborators the workflow engine notifies after a commit.
#[derive(Clone)]
pub struct WorkflowCollaborators {
    /// Project progress recalculation.
    pub progress: Arc<dyn ProjectProgress>,
    /// Department manager lookup for notifications.
    pub departments: Arc<dyn DepartmentDirectory>,
    /// Notification delivery.
    pub notifier: Arc<dyn Notifier>,
}

/// Task workflow orchestration service.
///
/// Every transition is read, validated, and committed with a
/// compare-and-set on the stored status. The status write and its history
/// entry commit together through the task repository, so `tasks` must
/// append into the same store that `history` reads.
pub struct TaskWorkflowService<T, D, L, E, H, C>
where
    T: TaskRepository,
    D: DependencyRepository,
    L: ChecklistRepository,
    E: EnforcementSettingsRepository,
    H: StatusHistoryRepository,
    C: Clock + Send + Sync,
{
    tasks: Arc<T>,
    dependencies: DependencyService<D, T, C>,
    checklist: ChecklistGate<L, E>,
    history: Arc<H>,
    collaborators: WorkflowCollaborators,
    config: Arc<WorkflowConfig>,
    clock: Arc<C>,
}

impl<T, D, L, E, H, C> Clone for TaskWorkflowService<T, D, L, E, H, C>
where
    T: TaskRepository,
    D: DependencyRepository,
    L: ChecklistRepository,
    E: EnforcementSettingsRepository,
    H: StatusHistoryRepository,
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            tasks: Arc::clone(&self.tasks),
            dependencies: self.dependencies.clone(),
            checklist: self.checklist.clone(),
            history: Arc::clone(&self.history),
            collaborators: self.collaborators.clone(),
            config: Arc::clone(&self.config),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<T, D, L, E, H, C> TaskWorkflowService<T, D, L, E, H, C>
where
    T: TaskRepository,
    D: DependencyRepository,
    L: ChecklistRepository,
    E: EnforcementSettingsRepository,
    H: StatusHistoryRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new workflow service.
    #[must_use]
    pub const fn new(
        tasks: Arc<T>,
        dependencies: DependencyService<D, T, C>,
        checklist: ChecklistGate<L, E>,
        history: Arc<H>,
        collaborators: WorkflowCollaborators,
        config: Arc<WorkflowConfig>,
        clock: Arc<C>,
    ) -> Self {
        Self {
            tasks,
            dependencies,
            checklist,
            history,
            collaborators,
            config,
            clock,
        }
    }

    /// Returns the dependency service used for completion checks.
    #[must_use]
    pub const fn dependencies(&self) -> &DependencyService<D, T, C> {
        &self.dependencies
    }

    /// Returns the checklist gate used for completion checks.
    #[must_use]
    pub const fn checklist(&self) -> &ChecklistGate<L, E> {
        &self.checklist
    }

    /// Returns the workflow configuration.
    #[must_use]
    pub fn config(&self) -> &WorkflowConfig {
        &self.config
    }

    /// Stores a new task in the initial status and records the creation
    /// history entry.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError::Domain`] for blank code or title, or a
    /// repository or audit error when persistence fails. Neither the task
    /// nor its creation entry is stored on error.
    pub async fn register_task(&self, draft: TaskDraft, actor: UserId) -> WorkflowResult<Task> {
        let task = Task::new(draft, self.config.initial_status.clone(), &*self.clock)?;
        let entry =
            TaskStatusHistoryEntry::creation(task.id(), task.status().clone(), actor, &*self.clock);
        self.tasks.store_with_history(&task, &entry).await?;
        tracing::info!(
            task_id = %task.id(),
            project_id = %task.project_id(),
            status = %task.status(),
            "task registered"
        );
        Ok(task)
    }

    /// Moves a task into the requested status.
    ///
    /// Requesting the current status is a no-op that records no history,
    /// except that a blocked task given a new reason keeps its status and
    /// takes the new reason.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError::Validation`] when a blocking reason is
    /// missing, [`WorkflowError::TaskNotFound`] when the task does not
    /// exist, [`WorkflowError::EnforcementBlocked`] when a policy in `block`
    /// mode rejects completion, or [`WorkflowError::StatusConflict`] when a
    /// concurrent transition committed first.
    pub async fn update_task_status(
        &self,
        request: UpdateStatusRequest,
    ) -> WorkflowResult<TransitionOutcome> {
        let UpdateStatusRequest {
            task_id,
            status,
            actor,
            note,
            blocked_reason,
        } = request;

        let mut task = self.load(task_id).await?;
        if task.status().matches(&status) {
            return self.reaffirm(task, blocked_reason.as_deref(), actor).await;
        }

        let target_blocked = self.config.is_blocked(&status);
        let reason = if target_blocked {
            Some(require_reason(blocked_reason.as_deref())?)
        } else {
            None
        };

        let warnings = if self.config.is_completion(&status) {
            self.check_completion(&task).await?
        } else {
            Vec::new()
        };

        let from_status = task.status().clone();
        match &reason {
            Some(why) => task.block(
                self.config.blocked_status.clone(),
                why.clone(),
                actor,
                &*self.clock,
            ),
            None => task.move_to(status, &*self.clock),
        }
        let history_note = note.or_else(|| reason.as_ref().map(|why| why.as_str().to_owned()));
        let entry = TaskStatusHistoryEntry::transition(
            task_id,
            from_status.clone(),
            task.status().clone(),
            actor,
            history_note,
            &*self.clock,
        );
        self.tasks
            .update_status_with_history(&task, &from_status, &entry)
            .await?;
        tracing::info!(
            task_id = %task_id,
            from_status = %from_status,
            to_status = %task.status(),
            changed_by = %actor,
            "task status changed"
        );

        self.after_commit(&task, &from_status, reason.as_ref(), actor).await;
        Ok(TransitionOutcome {
            task,
            changed: true,
            warnings,
        })
    }

    /// Moves a task into the blocked status.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError::Validation`] with
    /// [`ValidationCode::BlockedReasonRequired`] for a blank reason, or any
    /// error of [`Self::update_task_status`].
    pub async fn block_task(
        &self,
        task_id: TaskId,
        reason: &str,
        actor: UserId,
    ) -> WorkflowResult<TransitionOutcome> {
        let blocked_reason = require_reason(Some(reason))?;
        let request =
            UpdateStatusRequest::new(task_id, self.config.blocked_status.clone(), actor)
                .with_blocked_reason(blocked_reason.as_str());
        self.update_task_status(request).await
    }

    /// Moves a blocked task into `to_status`, clearing its blocking details.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError::Validation`] when the task is not blocked or
    /// `to_status` is the blocked status, or any error of
    /// [`Self::update_task_status`].
    pub async fn unblock_task(
        &self,
        task_id: TaskId,
        to_status: TaskStatus,
        actor: UserId,
        note: Option<String>,
    ) -> WorkflowResult<TransitionOutcome> {
        if self.config.is_blocked(&to_status) {
            return Err(ValidationError::new(
                ValidationCode::InvalidUnblockStatus,
                "unblocking must move the task out of the blocked status",
            )
            .into());
        }
        let task = self.load(task_id).await?;
        if !self.config.is_blocked(task.status()) {
            return Err(ValidationError::new(
                ValidationCode::TaskNotBlocked,
                format!("task {} is not blocked", task.code()),
            )
            .into());
        }

        let mut request = UpdateStatusRequest::new(task_id, to_status, actor);
        request.note = note;
        self.update_task_status(request).await
    }

    /// Returns a task's status history, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError::Audit`] when the lookup fails.
    pub async fn get_task_status_history(
        &self,
        task_id: TaskId,
    ) -> WorkflowResult<Vec<TaskStatusHistoryEntry>> {
        Ok(self.history.find_by_task(task_id).await?)
    }

    /// Returns a task's most recent status change.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError::Audit`] when the lookup fails.
    pub async fn get_latest_task_status_change(
        &self,
        task_id: TaskId,
    ) -> WorkflowResult<Option<TaskStatusHistoryEntry>> {
        Ok(self.history.find_latest_for_task(task_id).await?)
    }

    /// Reports whether a task's direct `BLOCKS` prerequisites are complete.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError::Dependency`] when a lookup fails.
    pub async fn can_start_task(&self, task_id: TaskId) -> WorkflowResult<BlockingDependencies> {
        Ok(self
            .dependencies
            .has_uncompleted_blocking_dependencies(task_id)
            .await?)
    }

    /// Resolves the effective mode of a policy for a department.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError::Enforcement`] when the lookup fails.
    pub async fn get_enforcement_mode(
        &self,
        policy: EnforcementPolicy,
        department_id: Option<DepartmentId>,
    ) -> WorkflowResult<EnforcementMode> {
        Ok(self
            .checklist
            .settings()
            .resolve_mode(policy, department_id)
            .await?)
    }

    /// Stores the mode of a policy for a scope.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError::Enforcement`] when the write fails.
    pub async fn set_enforcement_mode(
        &self,
        scope: EnforcementScope,
        policy: EnforcementPolicy,
        mode: EnforcementMode,
    ) -> WorkflowResult<()> {
        self.checklist.settings().set_mode(scope, policy, mode).await?;
        Ok(())
    }

    async fn load(&self, task_id: TaskId) -> WorkflowResult<Task> {
        self.tasks
            .find_by_id(task_id)
            .await?
            .ok_or(WorkflowError::TaskNotFound(task_id))
    }

    async fn reaffirm(
        &self,
        mut task: Task,
        blocked_reason: Option<&str>,
        actor: UserId,
    ) -> WorkflowResult<TransitionOutcome> {
        let unchanged = |current: Task| TransitionOutcome {
            task: current,
            changed: false,
            warnings: Vec::new(),
        };

        if !self.config.is_blocked(task.status()) {
            return Ok(unchanged(task));
        }
        let Some(reason) = blocked_reason.and_then(|raw| BlockedReason::new(raw).ok())
        else {
            return Ok(unchanged(task));
        };
        if task.blocked_reason() == Some(&reason) {
            return Ok(unchanged(task));
        }

        let status = task.status().clone();
        task.block(status.clone(), reason, actor, &*self.clock);
        self.tasks.update_status(&task, &status).await?;
        tracing::info!(task_id = %task.id(), "blocking reason updated");
        Ok(unchanged(task))
    }

    async fn check_completion(&self, task: &Task) -> WorkflowResult<Vec<ValidationIssue>> {
        let department_id = task.department_id();
        let ownership_mode = self
            .checklist
            .settings()
            .resolve_mode(EnforcementPolicy::Ownership, department_id)
            .await?;
        let checklist = self
            .checklist
            .validate_for_task_completion(task.id(), department_id)
            .await?;

        let mut verdict: ValidationResult =
            validate_ownership(task.owner_id(), ownership_mode).merge(checklist.result);
        if !verdict.is_valid {
            tracing::info!(
                task_id = %task.id(),
                violations = verdict.errors.len(),
                "completion rejected by enforcement policy"
            );
            return Err(WorkflowError::EnforcementBlocked {
                issues: verdict.errors,
            });
        }

        let blocking = self
            .dependencies
            .has_uncompleted_blocking_dependencies(task.id())
            .await?;
        if blocking.has_blocking {
            verdict.push_warning(open_prerequisites_issue(&blocking.blocking_tasks));
        }

        for warning in &verdict.warnings {
            tracing::warn!(
                task_id = %task.id(),
                code = %warning.code,
                "completing task despite policy warning"
            );
        }
        Ok(verdict.warnings)
    }

    async fn after_commit(
        &self,
        task: &Task,
        from_status: &TaskStatus,
        reason: Option<&BlockedReason>,
        actor: UserId,
    ) {
        let was_complete = self.config.is_completion(from_status);
        let is_complete = self.config.is_completion(task.status());
        if was_complete != is_complete {
            if let Err(err) = self
                .collaborators
                .progress
                .recalculate_progress(task.project_id())
                .await
            {
                tracing::warn!(
                    task_id = %task.id(),
                    project_id = %task.project_id(),
                    error = %err,
                    "project progress recalculation failed"
                );
            }
        }

        if let Some(blocked_reason) = reason {
            spawn_blocked_notification(
                Arc::clone(&self.collaborators.departments),
                Arc::clone(&self.collaborators.notifier),
                task,
                blocked_reason,
                actor,
            );
        }
    }
}

fn require_reason(raw: Option<&str>) -> WorkflowResult<BlockedReason> {
    raw.and_then(|value| BlockedReason::new(value).ok())
        .ok_or_else(|| {
            ValidationError::new(
                ValidationCode::BlockedReasonRequired,
                "a reason is required to block a task",
            )
            .into()
        })
}

fn open_prerequisites_issue(blocking_tasks: &[Task]) -> ValidationIssue {
    let items = blocking_tasks
        .iter()
        .map(|task| IssueItem::new(task.id().into_inner(), task.code()))
        .collect();
    ValidationIssue::new(
        IssueCode::UncompletedBlockingDependencies,
        format!(
            "{} blocking prerequisite(s) are not complete",
            blocking_tasks.len()
        ),
        items,
    )
}
