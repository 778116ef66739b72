//! `PostgreSQL` repository implementation for dependency edges.

use super::{
    models::{DependencyRow, NewDependencyRow},
    schema::task_dependencies,
};
use crate::dependency::{
    domain::{BlockingEdges, DependencyId, DependencyType, PersistedDependency, TaskDependency},
    ports::{DependencyRepository, DependencyRepositoryError, DependencyRepositoryResult},
};
use crate::task::{
    adapters::postgres::TaskPgPool,
    domain::{TaskId, UserId},
};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};

/// Lock that conflicts with itself and with every row write, so concurrent
/// `insert_acyclic` calls run one at a time while plain reads continue.
const EDGE_WRITE_LOCK: &str = "LOCK TABLE task_dependencies IN SHARE ROW EXCLUSIVE MODE";

/// `PostgreSQL`-backed dependency repository.
#[derive(Debug, Clone)]
pub struct PostgresDependencyRepository {
    pool: TaskPgPool,
}

impl PostgresDependencyRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: TaskPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> DependencyRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> DependencyRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(DependencyRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(DependencyRepositoryError::persistence)?
    }

    async fn load_where<F>(&self, query: F) -> DependencyRepositoryResult<Vec<TaskDependency>>
    where
        F: FnOnce(&mut PgConnection) -> QueryResult<Vec<DependencyRow>> + Send + 'static,
    {
        self.run_blocking(move |connection| {
            query(connection)
                .map_err(DependencyRepositoryError::persistence)?
                .into_iter()
                .map(row_to_dependency)
                .collect()
        })
        .await
    }
}

#[async_trait]
impl DependencyRepository for PostgresDependencyRepository {
    async fn insert_acyclic(&self, dependency: &TaskDependency) -> DependencyRepositoryResult<()> {
        let task_id = dependency.task_id();
        let depends_on_task_id = dependency.depends_on_task_id();
        let blocking = dependency.dependency_type().is_blocking();
        let new_row = to_new_row(dependency);

        self.run_blocking(move |connection| {
            connection
                .build_transaction()
                .serializable()
                .run(|tx| -> QueryResult<DependencyRepositoryResult<()>> {
                    diesel::sql_query(EDGE_WRITE_LOCK).execute(tx)?;

                    let existing = task_dependencies::table
                        .filter(task_dependencies::task_id.eq(task_id.into_inner()))
                        .filter(
                            task_dependencies::depends_on_task_id
                                .eq(depends_on_task_id.into_inner()),
                        )
                        .count()
                        .get_result::<i64>(tx)?;
                    if existing > 0 {
                        return Ok(Err(DependencyRepositoryError::DuplicateDependency {
                            task_id,
                            depends_on_task_id,
                        }));
                    }

                    if blocking {
                        let check = load_blocking_edges(tx)?
                            .check_new_edge(task_id, depends_on_task_id);
                        if let Some(path) = check.path {
                            return Ok(Err(DependencyRepositoryError::CycleDetected { path }));
                        }
                    }

                    diesel::insert_into(task_dependencies::table)
                        .values(&new_row)
                        .execute(tx)?;
                    Ok(Ok(()))
                })
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        DependencyRepositoryError::DuplicateDependency {
                            task_id,
                            depends_on_task_id,
                        }
                    }
                    _ => DependencyRepositoryError::persistence(err),
                })?
        })
        .await
    }

    async fn find_by_id(
        &self,
        id: DependencyId,
    ) -> DependencyRepositoryResult<Option<TaskDependency>> {
        self.run_blocking(move |connection| {
            let row = task_dependencies::table
                .filter(task_dependencies::id.eq(id.into_inner()))
                .select(DependencyRow::as_select())
                .first::<DependencyRow>(connection)
                .optional()
                .map_err(DependencyRepositoryError::persistence)?;
            row.map(row_to_dependency).transpose()
        })
        .await
    }

    async fn find_by_tasks(
        &self,
        task_id: TaskId,
        depends_on_task_id: TaskId,
    ) -> DependencyRepositoryResult<Option<TaskDependency>> {
        self.run_blocking(move |connection| {
            let row = task_dependencies::table
                .filter(task_dependencies::task_id.eq(task_id.into_inner()))
                .filter(task_dependencies::depends_on_task_id.eq(depends_on_task_id.into_inner()))
                .select(DependencyRow::as_select())
                .first::<DependencyRow>(connection)
                .optional()
                .map_err(DependencyRepositoryError::persistence)?;
            row.map(row_to_dependency).transpose()
        })
        .await
    }

    async fn find_outgoing(
        &self,
        task_id: TaskId,
    ) -> DependencyRepositoryResult<Vec<TaskDependency>> {
        self.load_where(move |connection| {
            task_dependencies::table
                .filter(task_dependencies::task_id.eq(task_id.into_inner()))
                .order(task_dependencies::created_at.asc())
                .select(DependencyRow::as_select())
                .load(connection)
        })
        .await
    }

    async fn find_incoming(
        &self,
        task_id: TaskId,
    ) -> DependencyRepositoryResult<Vec<TaskDependency>> {
        self.load_where(move |connection| {
            task_dependencies::table
                .filter(task_dependencies::depends_on_task_id.eq(task_id.into_inner()))
                .order(task_dependencies::created_at.asc())
                .select(DependencyRow::as_select())
                .load(connection)
        })
        .await
    }

    async fn find_touching(
        &self,
        task_ids: &[TaskId],
    ) -> DependencyRepositoryResult<Vec<TaskDependency>> {
        if task_ids.is_empty() {
            return Ok(Vec::new());
        }
        let lookup: Vec<uuid::Uuid> = task_ids.iter().copied().map(TaskId::into_inner).collect();
        self.load_where(move |connection| {
            task_dependencies::table
                .filter(
                    task_dependencies::task_id
                        .eq_any(lookup.clone())
                        .or(task_dependencies::depends_on_task_id.eq_any(lookup)),
                )
                .order(task_dependencies::created_at.asc())
                .select(DependencyRow::as_select())
                .load(connection)
        })
        .await
    }

    async fn blocking_edges(&self) -> DependencyRepositoryResult<BlockingEdges> {
        self.run_blocking(|connection| {
            load_blocking_edges(connection).map_err(DependencyRepositoryError::persistence)
        })
        .await
    }

    async fn delete(&self, id: DependencyId) -> DependencyRepositoryResult<bool> {
        self.run_blocking(move |connection| {
            let removed = diesel::delete(
                task_dependencies::table.filter(task_dependencies::id.eq(id.into_inner())),
            )
            .execute(connection)
            .map_err(DependencyRepositoryError::persistence)?;
            Ok(removed > 0)
        })
        .await
    }

    async fn delete_by_tasks(
        &self,
        task_id: TaskId,
        depends_on_task_id: TaskId,
    ) -> DependencyRepositoryResult<bool> {
        self.run_blocking(move |connection| {
            let removed = diesel::delete(
                task_dependencies::table
                    .filter(task_dependencies::task_id.eq(task_id.into_inner()))
                    .filter(
                        task_dependencies::depends_on_task_id.eq(depends_on_task_id.into_inner()),
                    ),
            )
            .execute(connection)
            .map_err(DependencyRepositoryError::persistence)?;
            Ok(removed > 0)
        })
        .await
    }
}

fn load_blocking_edges(connection: &mut PgConnection) -> QueryResult<BlockingEdges> {
    let pairs = task_dependencies::table
        .filter(task_dependencies::dependency_type.eq(DependencyType::Blocks.as_str()))
        .select((
            task_dependencies::task_id,
            task_dependencies::depends_on_task_id,
        ))
        .load::<(uuid::Uuid, uuid::Uuid)>(connection)?;
    Ok(pairs
        .into_iter()
        .map(|(task, prerequisite)| (TaskId::from_uuid(task), TaskId::from_uuid(prerequisite)))
        .collect())
}

fn to_new_row(dependency: &TaskDependency) -> NewDependencyRow {
    NewDependencyRow {
        id: dependency.id().into_inner(),
        task_id: dependency.task_id().into_inner(),
        depends_on_task_id: dependency.depends_on_task_id().into_inner(),
        dependency_type: dependency.dependency_type().as_str().to_owned(),
        created_by: dependency.created_by().into_inner(),
        created_at: dependency.created_at(),
    }
}

fn row_to_dependency(row: DependencyRow) -> DependencyRepositoryResult<TaskDependency> {
    let dependency_type = DependencyType::try_from(row.dependency_type.as_str())
        .map_err(DependencyRepositoryError::persistence)?;
    Ok(TaskDependency::from_persisted(PersistedDependency {
        id: DependencyId::from_uuid(row.id),
        task_id: TaskId::from_uuid(row.task_id),
        depends_on_task_id: TaskId::from_uuid(row.depends_on_task_id),
        dependency_type,
        created_by: UserId::from_uuid(row.created_by),
        created_at: row.created_at,
    }))
}
