//! Task aggregate root as seen by the workflow engine.

use super::{BlockedReason, DepartmentId, ProjectId, TaskDomainError, TaskId, TaskStatus, UserId};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Blocking details recorded while a task sits in the blocked status.
///
/// The reason, timestamp, and actor are always set and cleared together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockedState {
    /// Why the task is blocked.
    pub reason: BlockedReason,
    /// When the task was blocked.
    pub at: DateTime<Utc>,
    /// Who blocked the task.
    pub by: UserId,
}

/// Input for creating a new task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDraft {
    project_id: ProjectId,
    code: String,
    title: String,
    department_id: Option<DepartmentId>,
    owner_id: Option<UserId>,
    assignee_ids: Vec<UserId>,
}

impl TaskDraft {
    /// Creates a draft with required fields.
    #[must_use]
    pub fn new(project_id: ProjectId, code: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            project_id,
            code: code.into(),
            title: title.into(),
            department_id: None,
            owner_id: None,
            assignee_ids: Vec::new(),
        }
    }

    /// Sets the owning department.
    #[must_use]
    pub const fn with_department(mut self, department_id: DepartmentId) -> Self {
        self.department_id = Some(department_id);
        self
    }

    /// Sets the task owner.
    #[must_use]
    pub const fn with_owner(mut self, owner_id: UserId) -> Self {
        self.owner_id = Some(owner_id);
        self
    }

    /// Sets the task assignees.
    #[must_use]
    pub fn with_assignees(mut self, assignees: impl IntoIterator<Item = UserId>) -> Self {
        self.assignee_ids = assignees.into_iter().collect();
        self
    }
}

/// Task aggregate root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    project_id: ProjectId,
    code: String,
    title: String,
    status: TaskStatus,
    department_id: Option<DepartmentId>,
    owner_id: Option<UserId>,
    assignee_ids: Vec<UserId>,
    blocked: Option<BlockedState>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted task aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTaskData {
    /// Persisted task identifier.
    pub id: TaskId,
    /// Persisted project identifier.
    pub project_id: ProjectId,
    /// Persisted human-readable code.
    pub code: String,
    /// Persisted title.
    pub title: String,
    /// Persisted workflow status.
    pub status: TaskStatus,
    /// Persisted department, if any.
    pub department_id: Option<DepartmentId>,
    /// Persisted owner, if any.
    pub owner_id: Option<UserId>,
    /// Persisted assignees.
    pub assignee_ids: Vec<UserId>,
    /// Persisted blocking details, if blocked.
    pub blocked: Option<BlockedState>,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest modification timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Creates a new task in the given initial status.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyCode`] or
    /// [`TaskDomainError::EmptyTitle`] when either field is blank.
    pub fn new(
        draft: TaskDraft,
        initial_status: TaskStatus,
        clock: &impl Clock,
    ) -> Result<Self, TaskDomainError> {
        let code = draft.code.trim();
        if code.is_empty() {
            return Err(TaskDomainError::EmptyCode);
        }
        let title = draft.title.trim();
        if title.is_empty() {
            return Err(TaskDomainError::EmptyTitle);
        }

        let timestamp = clock.utc();
        Ok(Self {
            id: TaskId::new(),
            project_id: draft.project_id,
            code: code.to_owned(),
            title: title.to_owned(),
            status: initial_status,
            department_id: draft.department_id,
            owner_id: draft.owner_id,
            assignee_ids: draft.assignee_ids,
            blocked: None,
            created_at: timestamp,
            updated_at: timestamp,
        })
    }

    /// Reconstructs a task from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedTaskData) -> Self {
        Self {
            id: data.id,
            project_id: data.project_id,
            code: data.code,
            title: data.title,
            status: data.status,
            department_id: data.department_id,
            owner_id: data.owner_id,
            assignee_ids: data.assignee_ids,
            blocked: data.blocked,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the owning project.
    #[must_use]
    pub const fn project_id(&self) -> ProjectId {
        self.project_id
    }

    /// Returns the human-readable task code.
    #[must_use]
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Returns the task title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the current workflow status.
    #[must_use]
    pub const fn status(&self) -> &TaskStatus {
        &self.status
    }

    /// Returns the owning department, if any.
    #[must_use]
    pub const fn department_id(&self) -> Option<DepartmentId> {
        self.department_id
    }

    /// Returns the task owner, if any.
    #[must_use]
    pub const fn owner_id(&self) -> Option<UserId> {
        self.owner_id
    }

    /// Returns the task assignees.
    #[must_use]
    pub fn assignee_ids(&self) -> &[UserId] {
        &self.assignee_ids
    }

    /// Returns the blocking details, if blocked.
    #[must_use]
    pub const fn blocked(&self) -> Option<&BlockedState> {
        self.blocked.as_ref()
    }

    /// Returns the blocking reason, if blocked.
    #[must_use]
    pub fn blocked_reason(&self) -> Option<&BlockedReason> {
        self.blocked.as_ref().map(|state| &state.reason)
    }

    /// Returns when the task was blocked, if blocked.
    #[must_use]
    pub fn blocked_at(&self) -> Option<DateTime<Utc>> {
        self.blocked.as_ref().map(|state| state.at)
    }

    /// Returns who blocked the task, if blocked.
    #[must_use]
    pub fn blocked_by(&self) -> Option<UserId> {
        self.blocked.as_ref().map(|state| state.by)
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest modification timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Moves the task into `blocked_status`, recording who blocked it and
    /// why.
    ///
    /// Calling this on a task that is already blocked replaces the reason
    /// and actor and restamps the blocking time.
    pub fn block(
        &mut self,
        blocked_status: TaskStatus,
        reason: BlockedReason,
        actor: UserId,
        clock: &impl Clock,
    ) {
        let timestamp = clock.utc();
        self.status = blocked_status;
        self.blocked = Some(BlockedState {
            reason,
            at: timestamp,
            by: actor,
        });
        self.updated_at = timestamp;
    }

    /// Moves the task into a non-blocked status.
    ///
    /// Any blocking details are cleared regardless of the destination.
    pub fn move_to(&mut self, status: TaskStatus, clock: &impl Clock) {
        self.status = status;
        self.blocked = None;
        self.touch(clock);
    }

    /// Copies the status, blocking details, and modification time of
    /// `source`, leaving every other field alone.
    pub(crate) fn apply_status_of(&mut self, source: &Self) {
        self.status = source.status.clone();
        self.blocked = source.blocked.clone();
        self.updated_at = source.updated_at;
    }

    /// Updates the `updated_at` timestamp to the current clock time.
    fn touch(&mut self, clock: &impl Clock) {
        self.updated_at = clock.utc();
    }
}
