//! `PostgreSQL` repository implementation for task storage.

use super::{
    models::{NewTaskRow, StatusChangeset, TaskRow},
    schema::tasks,
};
use crate::audit::{adapters::postgres::insert_status_entry, domain::TaskStatusHistoryEntry};
use crate::task::{
    domain::{
        BlockedReason, BlockedState, DepartmentId, PersistedTaskData, ProjectId, Task, TaskId,
        TaskStatus, UserId,
    },
    ports::{TaskRepository, TaskRepositoryError, TaskRepositoryResult},
};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorKind, Error as DieselError};

/// `PostgreSQL` connection pool type shared by the workflow adapters.
pub type TaskPgPool = Pool<ConnectionManager<PgConnection>>;

/// `PostgreSQL`-backed task repository.
#[derive(Debug, Clone)]
pub struct PostgresTaskRepository {
    pool: TaskPgPool,
}

impl PostgresTaskRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: TaskPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> TaskRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> TaskRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(TaskRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(TaskRepositoryError::persistence)?
    }
}

#[async_trait]
impl TaskRepository for PostgresTaskRepository {
    async fn store(&self, task: &Task) -> TaskRepositoryResult<()> {
        let task_id = task.id();
        let new_row = to_new_row(task);

        self.run_blocking(move |connection| insert_task(connection, task_id, &new_row))
            .await
    }

    async fn store_with_history(
        &self,
        task: &Task,
        entry: &TaskStatusHistoryEntry,
    ) -> TaskRepositoryResult<()> {
        let task_id = task.id();
        let new_row = to_new_row(task);
        let entry = entry.clone();

        self.run_blocking(move |connection| {
            in_transaction(connection, |tx| {
                insert_task(tx, task_id, &new_row)?;
                insert_status_entry(tx, &entry)?;
                Ok(())
            })
        })
        .await
    }

    async fn update(&self, task: &Task) -> TaskRepositoryResult<()> {
        let task_id = task.id();
        let row = to_new_row(task);

        self.run_blocking(move |connection| {
            let updated = diesel::update(tasks::table.filter(tasks::id.eq(task_id.into_inner())))
                .set(&row)
                .execute(connection)
                .map_err(TaskRepositoryError::persistence)?;
            if updated == 0 {
                return Err(TaskRepositoryError::NotFound(task_id));
            }
            Ok(())
        })
        .await
    }

    async fn update_status(
        &self,
        task: &Task,
        expected_status: &TaskStatus,
    ) -> TaskRepositoryResult<()> {
        let task_id = task.id();
        let expected = expected_status.clone();
        let changeset = status_changeset(task);

        self.run_blocking(move |connection| {
            compare_and_set_status(connection, task_id, &expected, &changeset)
        })
        .await
    }

    async fn update_status_with_history(
        &self,
        task: &Task,
        expected_status: &TaskStatus,
        entry: &TaskStatusHistoryEntry,
    ) -> TaskRepositoryResult<()> {
        let task_id = task.id();
        let expected = expected_status.clone();
        let changeset = status_changeset(task);
        let entry = entry.clone();

        self.run_blocking(move |connection| {
            in_transaction(connection, |tx| {
                compare_and_set_status(tx, task_id, &expected, &changeset)?;
                insert_status_entry(tx, &entry)?;
                Ok(())
            })
        })
        .await
    }

    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        self.run_blocking(move |connection| {
            let row = tasks::table
                .filter(tasks::id.eq(id.into_inner()))
                .select(TaskRow::as_select())
                .first::<TaskRow>(connection)
                .optional()
                .map_err(TaskRepositoryError::persistence)?;
            row.map(row_to_task).transpose()
        })
        .await
    }

    async fn find_by_ids(&self, ids: &[TaskId]) -> TaskRepositoryResult<Vec<Task>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let lookup: Vec<uuid::Uuid> = ids.iter().copied().map(TaskId::into_inner).collect();
        self.run_blocking(move |connection| {
            let rows = tasks::table
                .filter(tasks::id.eq_any(lookup))
                .order(tasks::created_at.asc())
                .select(TaskRow::as_select())
                .load::<TaskRow>(connection)
                .map_err(TaskRepositoryError::persistence)?;
            rows.into_iter().map(row_to_task).collect()
        })
        .await
    }

    async fn find_by_project(&self, project_id: ProjectId) -> TaskRepositoryResult<Vec<Task>> {
        self.run_blocking(move |connection| {
            let rows = tasks::table
                .filter(tasks::project_id.eq(project_id.into_inner()))
                .order(tasks::created_at.asc())
                .select(TaskRow::as_select())
                .load::<TaskRow>(connection)
                .map_err(TaskRepositoryError::persistence)?;
            rows.into_iter().map(row_to_task).collect()
        })
        .await
    }
}

/// Failure inside a task write transaction. Either variant rolls the
/// transaction back.
enum WriteFailure {
    Query(DieselError),
    Rejected(TaskRepositoryError),
}

impl From<DieselError> for WriteFailure {
    fn from(err: DieselError) -> Self {
        Self::Query(err)
    }
}

fn in_transaction<T>(
    connection: &mut PgConnection,
    f: impl FnOnce(&mut PgConnection) -> TaskRepositoryResult<T>,
) -> TaskRepositoryResult<T> {
    connection
        .transaction::<T, WriteFailure, _>(|tx| f(tx).map_err(WriteFailure::Rejected))
        .map_err(|failure| match failure {
            WriteFailure::Query(err) => TaskRepositoryError::persistence(err),
            WriteFailure::Rejected(err) => err,
        })
}

fn insert_task(
    connection: &mut PgConnection,
    task_id: TaskId,
    row: &NewTaskRow,
) -> TaskRepositoryResult<()> {
    diesel::insert_into(tasks::table)
        .values(row)
        .execute(connection)
        .map_err(|err| match err {
            DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                TaskRepositoryError::DuplicateTask(task_id)
            }
            _ => TaskRepositoryError::persistence(err),
        })?;
    Ok(())
}

fn compare_and_set_status(
    connection: &mut PgConnection,
    task_id: TaskId,
    expected: &TaskStatus,
    changeset: &StatusChangeset,
) -> TaskRepositoryResult<()> {
    let updated = diesel::update(
        tasks::table
            .filter(tasks::id.eq(task_id.into_inner()))
            .filter(tasks::status.eq(expected.as_str())),
    )
    .set(changeset)
    .execute(connection)
    .map_err(TaskRepositoryError::persistence)?;
    if updated > 0 {
        return Ok(());
    }

    let current = tasks::table
        .filter(tasks::id.eq(task_id.into_inner()))
        .select(tasks::status)
        .first::<String>(connection)
        .optional()
        .map_err(TaskRepositoryError::persistence)?
        .ok_or(TaskRepositoryError::NotFound(task_id))?;
    Err(TaskRepositoryError::StatusConflict {
        task_id,
        expected: expected.clone(),
        actual: TaskStatus::new(current).map_err(TaskRepositoryError::persistence)?,
    })
}

fn status_changeset(task: &Task) -> StatusChangeset {
    StatusChangeset {
        status: task.status().as_str().to_owned(),
        blocked_reason: task.blocked_reason().map(|reason| reason.as_str().to_owned()),
        blocked_at: task.blocked_at(),
        blocked_by: task.blocked_by().map(UserId::into_inner),
        updated_at: task.updated_at(),
    }
}

fn to_new_row(task: &Task) -> NewTaskRow {
    NewTaskRow {
        id: task.id().into_inner(),
        project_id: task.project_id().into_inner(),
        code: task.code().to_owned(),
        title: task.title().to_owned(),
        status: task.status().as_str().to_owned(),
        department_id: task.department_id().map(DepartmentId::into_inner),
        owner_id: task.owner_id().map(UserId::into_inner),
        assignee_ids: task.assignee_ids().iter().copied().map(UserId::into_inner).collect(),
        blocked_reason: task.blocked_reason().map(|reason| reason.as_str().to_owned()),
        blocked_at: task.blocked_at(),
        blocked_by: task.blocked_by().map(UserId::into_inner),
        created_at: task.created_at(),
        updated_at: task.updated_at(),
    }
}

fn row_to_task(row: TaskRow) -> TaskRepositoryResult<Task> {
    let TaskRow {
        id,
        project_id,
        code,
        title,
        status: persisted_status,
        department_id,
        owner_id,
        assignee_ids,
        blocked_reason,
        blocked_at,
        blocked_by,
        created_at,
        updated_at,
    } = row;

    let status = TaskStatus::new(persisted_status).map_err(TaskRepositoryError::persistence)?;
    let blocked = match (blocked_reason, blocked_at, blocked_by) {
        (Some(reason), Some(at), Some(by)) => Some(BlockedState {
            reason: BlockedReason::new(reason).map_err(TaskRepositoryError::persistence)?,
            at,
            by: UserId::from_uuid(by),
        }),
        _ => None,
    };

    Ok(Task::from_persisted(PersistedTaskData {
        id: TaskId::from_uuid(id),
        project_id: ProjectId::from_uuid(project_id),
        code,
        title,
        status,
        department_id: department_id.map(DepartmentId::from_uuid),
        owner_id: owner_id.map(UserId::from_uuid),
        assignee_ids: assignee_ids.into_iter().map(UserId::from_uuid).collect(),
        blocked,
        created_at,
        updated_at,
    }))
}
