//! `PostgreSQL` repository implementation for checklist items.

use super::{models::ChecklistItemRow, schema::checklist_items};
use crate::checklist::{
    domain::{ChecklistItem, ChecklistItemId, PersistedChecklistItem},
    ports::{ChecklistRepository, ChecklistRepositoryError, ChecklistRepositoryResult},
};
use crate::task::{
    adapters::postgres::TaskPgPool,
    domain::{TaskId, UserId},
};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};

/// `PostgreSQL`-backed checklist repository.
#[derive(Debug, Clone)]
pub struct PostgresChecklistRepository {
    pool: TaskPgPool,
}

impl PostgresChecklistRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: TaskPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> ChecklistRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> ChecklistRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(ChecklistRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(ChecklistRepositoryError::persistence)?
    }

    async fn load_for_task(
        &self,
        task_id: TaskId,
        outstanding_mandatory_only: bool,
    ) -> ChecklistRepositoryResult<Vec<ChecklistItem>> {
        self.run_blocking(move |connection| {
            let mut query = checklist_items::table
                .filter(checklist_items::task_id.eq(task_id.into_inner()))
                .into_boxed();
            if outstanding_mandatory_only {
                query = query
                    .filter(checklist_items::is_mandatory.eq(true))
                    .filter(checklist_items::is_completed.eq(false));
            }
            let rows = query
                .order((checklist_items::created_at.asc(), checklist_items::id.asc()))
                .select(ChecklistItemRow::as_select())
                .load::<ChecklistItemRow>(connection)
                .map_err(ChecklistRepositoryError::persistence)?;
            Ok(rows.into_iter().map(row_to_item).collect())
        })
        .await
    }
}

#[async_trait]
impl ChecklistRepository for PostgresChecklistRepository {
    async fn store(&self, item: &ChecklistItem) -> ChecklistRepositoryResult<()> {
        let item_id = item.id();
        let row = to_row(item);
        self.run_blocking(move |connection| {
            diesel::insert_into(checklist_items::table)
                .values(&row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        ChecklistRepositoryError::DuplicateItem(item_id)
                    }
                    _ => ChecklistRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn update(&self, item: &ChecklistItem) -> ChecklistRepositoryResult<()> {
        let item_id = item.id();
        let row = to_row(item);
        self.run_blocking(move |connection| {
            let updated = diesel::update(
                checklist_items::table.filter(checklist_items::id.eq(item_id.into_inner())),
            )
            .set(&row)
            .execute(connection)
            .map_err(ChecklistRepositoryError::persistence)?;
            if updated == 0 {
                return Err(ChecklistRepositoryError::NotFound(item_id));
            }
            Ok(())
        })
        .await
    }

    async fn find_by_id(
        &self,
        id: ChecklistItemId,
    ) -> ChecklistRepositoryResult<Option<ChecklistItem>> {
        self.run_blocking(move |connection| {
            let row = checklist_items::table
                .filter(checklist_items::id.eq(id.into_inner()))
                .select(ChecklistItemRow::as_select())
                .first::<ChecklistItemRow>(connection)
                .optional()
                .map_err(ChecklistRepositoryError::persistence)?;
            Ok(row.map(row_to_item))
        })
        .await
    }

    async fn find_by_task(&self, task_id: TaskId) -> ChecklistRepositoryResult<Vec<ChecklistItem>> {
        self.load_for_task(task_id, false).await
    }

    async fn find_uncompleted_mandatory(
        &self,
        task_id: TaskId,
    ) -> ChecklistRepositoryResult<Vec<ChecklistItem>> {
        self.load_for_task(task_id, true).await
    }

    async fn delete(&self, id: ChecklistItemId) -> ChecklistRepositoryResult<bool> {
        self.run_blocking(move |connection| {
            let removed = diesel::delete(
                checklist_items::table.filter(checklist_items::id.eq(id.into_inner())),
            )
            .execute(connection)
            .map_err(ChecklistRepositoryError::persistence)?;
            Ok(removed > 0)
        })
        .await
    }
}

fn to_row(item: &ChecklistItem) -> ChecklistItemRow {
    ChecklistItemRow {
        id: item.id().into_inner(),
        task_id: item.task_id().into_inner(),
        text: item.text().to_owned(),
        is_mandatory: item.is_mandatory(),
        is_completed: item.is_completed(),
        completed_by: item.completed_by().map(UserId::into_inner),
        completed_at: item.completed_at(),
        unchecked_by: item.unchecked_by().map(UserId::into_inner),
        unchecked_reason: item.unchecked_reason().map(str::to_owned),
        created_at: item.created_at(),
        updated_at: item.updated_at(),
    }
}

fn row_to_item(row: ChecklistItemRow) -> ChecklistItem {
    ChecklistItem::from_persisted(PersistedChecklistItem {
        id: ChecklistItemId::from_uuid(row.id),
        task_id: TaskId::from_uuid(row.task_id),
        text: row.text,
        is_mandatory: row.is_mandatory,
        is_completed: row.is_completed,
        completed_by: row.completed_by.map(UserId::from_uuid),
        completed_at: row.completed_at,
        unchecked_by: row.unchecked_by.map(UserId::from_uuid),
        unchecked_reason: row.unchecked_reason,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}
