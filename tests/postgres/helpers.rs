//! Shared test helpers for `PostgreSQL` integration tests.
//!
//! Tests run only when `TASKFLOW_TEST_DATABASE_URL` points at a reachable
//! server. Each test gets a private schema that is dropped afterwards.

use std::sync::Arc;

use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, CustomizeConnection, Pool};
use mockable::DefaultClock;
use taskflow::{
    audit::adapters::postgres::{PostgresChecklistHistory, PostgresStatusHistory},
    checklist::{
        adapters::postgres::PostgresChecklistRepository,
        services::{ChecklistGate, ChecklistService},
    },
    config::WorkflowConfig,
    dependency::{adapters::postgres::PostgresDependencyRepository, services::DependencyService},
    enforcement::{
        adapters::postgres::PostgresEnforcementSettings, services::CachedEnforcementSettings,
    },
    task::{
        adapters::{
            memory::{InMemoryDepartmentDirectory, RecordingNotifier, RecordingProjectProgress},
            postgres::{PostgresTaskRepository, TaskPgPool},
        },
        domain::{ProjectId, Task, TaskDraft, UserId},
        services::{TaskWorkflowService, WorkflowCollaborators},
    },
};
use uuid::Uuid;

/// Environment variable holding the server URL.
pub const DATABASE_URL_ENV: &str = "TASKFLOW_TEST_DATABASE_URL";

/// SQL to create the workflow schema.
pub const CREATE_SCHEMA_SQL: &str =
    include_str!("../../migrations/2026-10-01-000000_create_workflow_tables/up.sql");

/// Workflow service wired against `PostgreSQL` adapters.
pub type PgWorkflow = TaskWorkflowService<
    PostgresTaskRepository,
    PostgresDependencyRepository,
    PostgresChecklistRepository,
    PostgresEnforcementSettings,
    PostgresStatusHistory,
    DefaultClock,
>;

/// Checklist service wired against `PostgreSQL` adapters.
pub type PgChecklist =
    ChecklistService<PostgresChecklistRepository, PostgresChecklistHistory, DefaultClock>;

#[derive(Debug)]
struct SearchPath(String);

impl CustomizeConnection<PgConnection, diesel::r2d2::Error> for SearchPath {
    fn on_acquire(&self, conn: &mut PgConnection) -> Result<(), diesel::r2d2::Error> {
        conn.batch_execute(&format!("SET search_path TO {}", self.0))
            .map_err(diesel::r2d2::Error::QueryError)
    }
}

/// A migrated private schema and a pool whose connections use it.
pub struct TestDatabase {
    pub pool: TaskPgPool,
    url: String,
    schema: String,
}

impl TestDatabase {
    /// Creates and migrates a private schema.
    ///
    /// Returns `None` when no test server is configured.
    ///
    /// # Errors
    ///
    /// Returns an error when the server is configured but unreachable or
    /// the migration fails.
    pub fn create() -> eyre::Result<Option<Self>> {
        let Ok(url) = std::env::var(DATABASE_URL_ENV) else {
            return Ok(None);
        };
        let schema = format!("taskflow_test_{}", Uuid::new_v4().simple());
        let mut admin = PgConnection::establish(&url)?;
        admin.batch_execute(&format!("CREATE SCHEMA {schema}"))?;

        let pool = Pool::builder()
            .max_size(4)
            .connection_customizer(Box::new(SearchPath(schema.clone())))
            .build(ConnectionManager::<PgConnection>::new(url.as_str()))?;
        pool.get()?.batch_execute(CREATE_SCHEMA_SQL)?;
        Ok(Some(Self { pool, url, schema }))
    }
}

impl Drop for TestDatabase {
    fn drop(&mut self) {
        let dropped = PgConnection::establish(&self.url)
            .map_err(eyre::Report::from)
            .and_then(|mut conn| {
                conn.batch_execute(&format!("DROP SCHEMA IF EXISTS {} CASCADE", self.schema))
                    .map_err(eyre::Report::from)
            });
        if let Err(err) = dropped {
            tracing::warn!(schema = %self.schema, error = %err, "test schema cleanup failed");
        }
    }
}

/// Every service wired against one test database.
pub struct PgStack {
    pub workflow: PgWorkflow,
    pub checklist: PgChecklist,
    pub tasks: Arc<PostgresTaskRepository>,
    pub project: ProjectId,
    pub actor: UserId,
}

impl PgStack {
    /// Wires the services against `database` with `config`.
    #[must_use]
    pub fn new(database: &TestDatabase, config: WorkflowConfig) -> Self {
        let pool = &database.pool;
        let shared_config = Arc::new(config);
        let clock = Arc::new(DefaultClock);
        let tasks = Arc::new(PostgresTaskRepository::new(pool.clone()));
        let items = Arc::new(PostgresChecklistRepository::new(pool.clone()));
        let settings = Arc::new(CachedEnforcementSettings::new(
            Arc::new(PostgresEnforcementSettings::new(pool.clone())),
            shared_config.default_enforcement_mode,
        ));
        let dependencies = DependencyService::new(
            Arc::new(PostgresDependencyRepository::new(pool.clone())),
            Arc::clone(&tasks),
            Arc::clone(&shared_config),
            Arc::clone(&clock),
        );
        let collaborators = WorkflowCollaborators {
            progress: Arc::new(RecordingProjectProgress::new()),
            departments: Arc::new(InMemoryDepartmentDirectory::new()),
            notifier: Arc::new(RecordingNotifier::new()),
        };

        Self {
            workflow: TaskWorkflowService::new(
                Arc::clone(&tasks),
                dependencies,
                ChecklistGate::new(Arc::clone(&items), settings),
                Arc::new(PostgresStatusHistory::new(pool.clone())),
                collaborators,
                shared_config,
                Arc::clone(&clock),
            ),
            checklist: ChecklistService::new(
                items,
                Arc::new(PostgresChecklistHistory::new(pool.clone())),
                clock,
            ),
            tasks,
            project: ProjectId::new(),
            actor: UserId::new(),
        }
    }

    /// Registers a task owned by the stack's actor.
    ///
    /// # Errors
    ///
    /// Returns an error when registration fails.
    pub async fn task(&self, code: &str) -> eyre::Result<Task> {
        let draft =
            TaskDraft::new(self.project, code, format!("Task {code}")).with_owner(self.actor);
        Ok(self.workflow.register_task(draft, self.actor).await?)
    }
}
