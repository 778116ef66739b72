//! `PostgreSQL` repository implementations for status and checklist history.

use super::{
    models::{ChecklistHistoryRow, StatusHistoryRow},
    schema::{checklist_state_history, task_status_history},
};
use crate::audit::{
    domain::{
        Actor, ChecklistAction, ChecklistStateHistoryEntry, HistoryEntryId, Page,
        PersistedChecklistStateHistoryEntry, PersistedStatusHistoryEntry, TaskStatusHistoryEntry,
    },
    ports::{
        AuditRepositoryError, AuditRepositoryResult, ChecklistHistoryRepository,
        StatusHistoryRepository,
    },
};
use crate::checklist::domain::ChecklistItemId;
use crate::task::{
    adapters::postgres::TaskPgPool,
    domain::{TaskId, TaskStatus, UserId},
};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};

async fn run_blocking<F, T>(pool: &TaskPgPool, f: F) -> AuditRepositoryResult<T>
where
    F: FnOnce(&mut PgConnection) -> AuditRepositoryResult<T> + Send + 'static,
    T: Send + 'static,
{
    let shared = pool.clone();
    tokio::task::spawn_blocking(move || {
        let mut connection = shared.get().map_err(AuditRepositoryError::persistence)?;
        f(&mut connection)
    })
    .await
    .map_err(AuditRepositoryError::persistence)?
}

fn insert_error(id: HistoryEntryId) -> impl FnOnce(DieselError) -> AuditRepositoryError {
    move |err| match err {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
            AuditRepositoryError::DuplicateEntry(id)
        }
        _ => AuditRepositoryError::persistence(err),
    }
}

fn page_bounds(page: Page) -> AuditRepositoryResult<(i64, i64)> {
    let offset = i64::try_from(page.offset()).map_err(AuditRepositoryError::persistence)?;
    let limit = i64::try_from(page.limit()).map_err(AuditRepositoryError::persistence)?;
    Ok((offset, limit))
}

/// Inserts one status history row on an existing connection.
///
/// Used by the task adapter to write the entry inside its own transaction.
pub(crate) fn insert_status_entry(
    connection: &mut PgConnection,
    entry: &TaskStatusHistoryEntry,
) -> AuditRepositoryResult<()> {
    let row = StatusHistoryRow {
        id: entry.id().into_inner(),
        task_id: entry.task_id().into_inner(),
        from_status: entry.from_status().map(|status| status.as_str().to_owned()),
        to_status: entry.to_status().as_str().to_owned(),
        changed_by: entry.changed_by().into_inner(),
        note: entry.note().map(str::to_owned),
        created_at: entry.created_at(),
    };
    diesel::insert_into(task_status_history::table)
        .values(&row)
        .execute(connection)
        .map_err(insert_error(entry.id()))?;
    Ok(())
}

/// `PostgreSQL`-backed status history.
#[derive(Debug, Clone)]
pub struct PostgresStatusHistory {
    pool: TaskPgPool,
}

impl PostgresStatusHistory {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: TaskPgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl StatusHistoryRepository for PostgresStatusHistory {
    async fn append(&self, entry: &TaskStatusHistoryEntry) -> AuditRepositoryResult<()> {
        let entry = entry.clone();
        run_blocking(&self.pool, move |connection| {
            insert_status_entry(connection, &entry)
        })
        .await
    }

    async fn find_by_task(
        &self,
        task_id: TaskId,
    ) -> AuditRepositoryResult<Vec<TaskStatusHistoryEntry>> {
        run_blocking(&self.pool, move |connection| {
            task_status_history::table
                .filter(task_status_history::task_id.eq(task_id.into_inner()))
                .order(task_status_history::seq.asc())
                .select(StatusHistoryRow::as_select())
                .load::<StatusHistoryRow>(connection)
                .map_err(AuditRepositoryError::persistence)?
                .into_iter()
                .map(row_to_status_entry)
                .collect()
        })
        .await
    }

    async fn find_latest_for_task(
        &self,
        task_id: TaskId,
    ) -> AuditRepositoryResult<Option<TaskStatusHistoryEntry>> {
        run_blocking(&self.pool, move |connection| {
            task_status_history::table
                .filter(task_status_history::task_id.eq(task_id.into_inner()))
                .order(task_status_history::seq.desc())
                .select(StatusHistoryRow::as_select())
                .first::<StatusHistoryRow>(connection)
                .optional()
                .map_err(AuditRepositoryError::persistence)?
                .map(row_to_status_entry)
                .transpose()
        })
        .await
    }

    async fn find_by_actor(
        &self,
        actor_id: UserId,
        page: Page,
    ) -> AuditRepositoryResult<Vec<TaskStatusHistoryEntry>> {
        let (offset, limit) = page_bounds(page)?;
        run_blocking(&self.pool, move |connection| {
            task_status_history::table
                .filter(task_status_history::changed_by.eq(actor_id.into_inner()))
                .order(task_status_history::seq.desc())
                .offset(offset)
                .limit(limit)
                .select(StatusHistoryRow::as_select())
                .load::<StatusHistoryRow>(connection)
                .map_err(AuditRepositoryError::persistence)?
                .into_iter()
                .map(row_to_status_entry)
                .collect()
        })
        .await
    }
}

fn row_to_status_entry(row: StatusHistoryRow) -> AuditRepositoryResult<TaskStatusHistoryEntry> {
    let from_status = row
        .from_status
        .map(TaskStatus::new)
        .transpose()
        .map_err(AuditRepositoryError::persistence)?;
    let to_status = TaskStatus::new(row.to_status).map_err(AuditRepositoryError::persistence)?;
    Ok(TaskStatusHistoryEntry::from_persisted(
        PersistedStatusHistoryEntry {
            id: HistoryEntryId::from_uuid(row.id),
            task_id: TaskId::from_uuid(row.task_id),
            from_status,
            to_status,
            changed_by: UserId::from_uuid(row.changed_by),
            note: row.note,
            created_at: row.created_at,
        },
    ))
}

/// `PostgreSQL`-backed checklist history.
#[derive(Debug, Clone)]
pub struct PostgresChecklistHistory {
    pool: TaskPgPool,
}

impl PostgresChecklistHistory {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: TaskPgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ChecklistHistoryRepository for PostgresChecklistHistory {
    async fn append(&self, entry: &ChecklistStateHistoryEntry) -> AuditRepositoryResult<()> {
        let entry_id = entry.id();
        let row = ChecklistHistoryRow {
            id: entry_id.into_inner(),
            checklist_item_id: entry.checklist_item_id().into_inner(),
            task_id: entry.task_id().into_inner(),
            action: entry.action().as_str().to_owned(),
            actor_id: entry.actor().id.into_inner(),
            actor_name: entry.actor().name.clone(),
            reason: entry.reason().map(str::to_owned),
            created_at: entry.created_at(),
        };
        run_blocking(&self.pool, move |connection| {
            diesel::insert_into(checklist_state_history::table)
                .values(&row)
                .execute(connection)
                .map_err(insert_error(entry_id))?;
            Ok(())
        })
        .await
    }

    async fn find_by_item(
        &self,
        item_id: ChecklistItemId,
    ) -> AuditRepositoryResult<Vec<ChecklistStateHistoryEntry>> {
        run_blocking(&self.pool, move |connection| {
            checklist_state_history::table
                .filter(checklist_state_history::checklist_item_id.eq(item_id.into_inner()))
                .order(checklist_state_history::seq.asc())
                .select(ChecklistHistoryRow::as_select())
                .load::<ChecklistHistoryRow>(connection)
                .map_err(AuditRepositoryError::persistence)?
                .into_iter()
                .map(row_to_checklist_entry)
                .collect()
        })
        .await
    }

    async fn find_by_task(
        &self,
        task_id: TaskId,
    ) -> AuditRepositoryResult<Vec<ChecklistStateHistoryEntry>> {
        run_blocking(&self.pool, move |connection| {
            checklist_state_history::table
                .filter(checklist_state_history::task_id.eq(task_id.into_inner()))
                .order(checklist_state_history::seq.asc())
                .select(ChecklistHistoryRow::as_select())
                .load::<ChecklistHistoryRow>(connection)
                .map_err(AuditRepositoryError::persistence)?
                .into_iter()
                .map(row_to_checklist_entry)
                .collect()
        })
        .await
    }

    async fn find_by_actor(
        &self,
        actor_id: UserId,
        page: Page,
    ) -> AuditRepositoryResult<Vec<ChecklistStateHistoryEntry>> {
        let (offset, limit) = page_bounds(page)?;
        run_blocking(&self.pool, move |connection| {
            checklist_state_history::table
                .filter(checklist_state_history::actor_id.eq(actor_id.into_inner()))
                .order(checklist_state_history::seq.desc())
                .offset(offset)
                .limit(limit)
                .select(ChecklistHistoryRow::as_select())
                .load::<ChecklistHistoryRow>(connection)
                .map_err(AuditRepositoryError::persistence)?
                .into_iter()
                .map(row_to_checklist_entry)
                .collect()
        })
        .await
    }
}

fn row_to_checklist_entry(
    row: ChecklistHistoryRow,
) -> AuditRepositoryResult<ChecklistStateHistoryEntry> {
    let action =
        ChecklistAction::try_from(row.action.as_str()).map_err(AuditRepositoryError::persistence)?;
    Ok(ChecklistStateHistoryEntry::from_persisted(
        PersistedChecklistStateHistoryEntry {
            id: HistoryEntryId::from_uuid(row.id),
            checklist_item_id: ChecklistItemId::from_uuid(row.checklist_item_id),
            task_id: TaskId::from_uuid(row.task_id),
            action,
            actor: Actor::new(UserId::from_uuid(row.actor_id), row.actor_name),
            reason: row.reason,
            created_at: row.created_at,
        },
    ))
}
