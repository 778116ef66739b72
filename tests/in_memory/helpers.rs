//! Shared test helpers for in-memory integration tests.

use std::io;
use std::sync::Arc;

use mockable::DefaultClock;
use rstest::fixture;
use taskflow::{
    audit::{
        adapters::memory::{InMemoryChecklistHistory, InMemoryStatusHistory},
        domain::Actor,
        services::AuditTrailService,
    },
    checklist::{
        adapters::memory::InMemoryChecklistRepository,
        services::{ChecklistGate, ChecklistService},
    },
    config::WorkflowConfig,
    dependency::adapters::memory::InMemoryDependencyRepository,
    dependency::services::DependencyService,
    enforcement::{
        adapters::memory::InMemoryEnforcementSettings, services::CachedEnforcementSettings,
    },
    task::{
        adapters::memory::{
            InMemoryDepartmentDirectory, InMemoryTaskRepository, RecordingNotifier,
            RecordingProjectProgress,
        },
        domain::{ProjectId, Task, TaskDraft, UserId},
        services::{TaskWorkflowService, WorkflowCollaborators},
    },
};
use tokio::runtime::Runtime;

/// Workflow service wired against in-memory adapters.
pub type Workflow = TaskWorkflowService<
    InMemoryTaskRepository,
    InMemoryDependencyRepository,
    InMemoryChecklistRepository,
    InMemoryEnforcementSettings,
    InMemoryStatusHistory,
    DefaultClock,
>;

/// Checklist service wired against in-memory adapters.
pub type Checklist =
    ChecklistService<InMemoryChecklistRepository, InMemoryChecklistHistory, DefaultClock>;

/// Audit trail reading the same history stores as the services.
pub type Trail = AuditTrailService<InMemoryStatusHistory, InMemoryChecklistHistory>;

/// Every service sharing one set of in-memory stores.
pub struct Stack {
    pub workflow: Workflow,
    pub checklist: Checklist,
    pub trail: Trail,
    pub progress: RecordingProjectProgress,
    pub project: ProjectId,
    pub actor: Actor,
}

impl Stack {
    /// Wires the services with `config`.
    #[must_use]
    pub fn new(config: WorkflowConfig) -> Self {
        let shared_config = Arc::new(config);
        let clock = Arc::new(DefaultClock);
        let status_history = Arc::new(InMemoryStatusHistory::new());
        let tasks = Arc::new(InMemoryTaskRepository::with_history(
            InMemoryStatusHistory::clone(&status_history),
        ));
        let items = Arc::new(InMemoryChecklistRepository::new());
        let checklist_history = Arc::new(InMemoryChecklistHistory::new());
        let progress = RecordingProjectProgress::new();
        let settings = Arc::new(CachedEnforcementSettings::new(
            Arc::new(InMemoryEnforcementSettings::new()),
            shared_config.default_enforcement_mode,
        ));
        let dependencies = DependencyService::new(
            Arc::new(InMemoryDependencyRepository::new()),
            Arc::clone(&tasks),
            Arc::clone(&shared_config),
            Arc::clone(&clock),
        );
        let collaborators = WorkflowCollaborators {
            progress: Arc::new(progress.clone()),
            departments: Arc::new(InMemoryDepartmentDirectory::new()),
            notifier: Arc::new(RecordingNotifier::new()),
        };

        Self {
            workflow: TaskWorkflowService::new(
                tasks,
                dependencies,
                ChecklistGate::new(Arc::clone(&items), settings),
                Arc::clone(&status_history),
                collaborators,
                shared_config,
                Arc::clone(&clock),
            ),
            checklist: ChecklistService::new(items, Arc::clone(&checklist_history), clock),
            trail: AuditTrailService::new(status_history, checklist_history),
            progress,
            project: ProjectId::new(),
            actor: Actor::new(UserId::new(), "Robin"),
        }
    }

    /// Registers a task owned by the stack's actor.
    ///
    /// # Errors
    ///
    /// Returns an error when registration fails.
    pub fn task(&self, rt: &Runtime, code: &str) -> eyre::Result<Task> {
        let draft = TaskDraft::new(self.project, code, format!("Task {code}"))
            .with_owner(self.actor.id);
        Ok(rt.block_on(self.workflow.register_task(draft, self.actor.id))?)
    }
}

/// Provides a tokio runtime for async operations in tests.
///
/// # Errors
///
/// Returns an error if the runtime cannot be created.
#[fixture]
pub fn runtime() -> io::Result<Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
}

/// Provides a fresh stack with the default configuration.
#[fixture]
pub fn stack() -> Stack {
    Stack::new(WorkflowConfig::default())
}
