//! Shared world state for task workflow BDD scenarios.

use std::collections::HashMap;
use std::sync::Arc;

use mockable::DefaultClock;
use rstest::fixture;
use taskflow::{
    audit::adapters::memory::{InMemoryChecklistHistory, InMemoryStatusHistory},
    checklist::{
        adapters::memory::InMemoryChecklistRepository,
        services::{ChecklistGate, ChecklistService},
    },
    config::WorkflowConfig,
    dependency::{
        adapters::memory::InMemoryDependencyRepository,
        services::{AddedDependency, BlockingDependencies, DependencyError, DependencyService},
    },
    enforcement::{
        adapters::memory::InMemoryEnforcementSettings, services::CachedEnforcementSettings,
    },
    task::{
        adapters::memory::{
            InMemoryDepartmentDirectory, InMemoryTaskRepository, RecordingNotifier,
            RecordingProjectProgress,
        },
        domain::{DepartmentId, ProjectId, Task, TaskId, UserId},
        ports::TaskRepository,
        services::{TaskWorkflowService, TransitionOutcome, WorkflowCollaborators, WorkflowError},
    },
};

/// Workflow service type used by the BDD world.
pub type TestWorkflow = TaskWorkflowService<
    InMemoryTaskRepository,
    InMemoryDependencyRepository,
    InMemoryChecklistRepository,
    InMemoryEnforcementSettings,
    InMemoryStatusHistory,
    DefaultClock,
>;

/// Checklist service type used by the BDD world.
pub type TestChecklist =
    ChecklistService<InMemoryChecklistRepository, InMemoryChecklistHistory, DefaultClock>;

/// Scenario world for task workflow behaviour tests.
pub struct WorkflowWorld {
    pub workflow: TestWorkflow,
    pub checklist: TestChecklist,
    pub tasks: Arc<InMemoryTaskRepository>,
    pub project: ProjectId,
    pub actor: UserId,
    pub task_ids: HashMap<String, TaskId>,
    pub departments: HashMap<String, DepartmentId>,
    pub last_transition: Option<Result<TransitionOutcome, WorkflowError>>,
    pub last_dependency: Option<Result<AddedDependency, DependencyError>>,
    pub last_readiness: Option<BlockingDependencies>,
}

impl WorkflowWorld {
    /// Creates a world wired against in-memory adapters with the default
    /// `warn` enforcement mode.
    #[must_use]
    pub fn new() -> Self {
        let config = Arc::new(WorkflowConfig::default());
        let clock = Arc::new(DefaultClock);
        let tasks = Arc::new(InMemoryTaskRepository::new());
        let items = Arc::new(InMemoryChecklistRepository::new());
        let settings = Arc::new(CachedEnforcementSettings::new(
            Arc::new(InMemoryEnforcementSettings::new()),
            config.default_enforcement_mode,
        ));
        let dependencies = DependencyService::new(
            Arc::new(InMemoryDependencyRepository::new()),
            Arc::clone(&tasks),
            Arc::clone(&config),
            Arc::clone(&clock),
        );
        let collaborators = WorkflowCollaborators {
            progress: Arc::new(RecordingProjectProgress::new()),
            departments: Arc::new(InMemoryDepartmentDirectory::new()),
            notifier: Arc::new(RecordingNotifier::new()),
        };
        let checklist = ChecklistService::new(
            Arc::clone(&items),
            Arc::new(InMemoryChecklistHistory::new()),
            Arc::clone(&clock),
        );
        let workflow = TaskWorkflowService::new(
            Arc::clone(&tasks),
            dependencies,
            ChecklistGate::new(items, settings),
            Arc::new(tasks.history()),
            collaborators,
            config,
            clock,
        );

        Self {
            workflow,
            checklist,
            tasks,
            project: ProjectId::new(),
            actor: UserId::new(),
            task_ids: HashMap::new(),
            departments: HashMap::new(),
            last_transition: None,
            last_dependency: None,
            last_readiness: None,
        }
    }

    /// Looks up the identifier of a task registered under `code`.
    ///
    /// # Errors
    ///
    /// Returns an error when no task with that code was registered.
    pub fn task_id(&self, code: &str) -> Result<TaskId, eyre::Report> {
        self.task_ids
            .get(code)
            .copied()
            .ok_or_else(|| eyre::eyre!("task {code} was not registered in this scenario"))
    }

    /// Returns the department registered under `name`, creating it on first
    /// use.
    pub fn department(&mut self, name: &str) -> DepartmentId {
        *self
            .departments
            .entry(name.to_owned())
            .or_insert_with(DepartmentId::new)
    }

    /// Reads the stored state of the task registered under `code`.
    ///
    /// # Errors
    ///
    /// Returns an error when the task is unknown or the lookup fails.
    pub fn stored_task(&self, code: &str) -> Result<Task, eyre::Report> {
        let task_id = self.task_id(code)?;
        run_async(self.tasks.find_by_id(task_id))?
            .ok_or_else(|| eyre::eyre!("task {code} is missing from the repository"))
    }
}

impl Default for WorkflowWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> WorkflowWorld {
    WorkflowWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
