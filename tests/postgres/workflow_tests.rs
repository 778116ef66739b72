//! Workflow transitions persisted through the `PostgreSQL` adapters.

use crate::postgres::helpers::{PgStack, TestDatabase};
use eyre::{bail, ensure};
use taskflow::{
    audit::{
        adapters::postgres::PostgresStatusHistory, domain::TaskStatusHistoryEntry,
        ports::StatusHistoryRepository,
    },
    checklist::services::AddChecklistItemRequest,
    config::WorkflowConfig,
    enforcement::{
        adapters::postgres::PostgresEnforcementSettings,
        domain::{EnforcementMode, EnforcementPolicy, EnforcementScope},
        services::CachedEnforcementSettings,
    },
    task::{
        domain::{DepartmentId, TaskStatus},
        ports::TaskRepository,
        services::{UpdateStatusRequest, WorkflowError},
    },
};
use mockable::DefaultClock;
use std::sync::Arc;

#[tokio::test(flavor = "multi_thread")]
async fn block_and_unblock_round_trip_through_storage() -> eyre::Result<()> {
    let Some(database) = TestDatabase::create()? else {
        return Ok(());
    };
    let stack = PgStack::new(&database, WorkflowConfig::default());
    let task = stack.task("PG-1").await?;

    stack
        .workflow
        .block_task(task.id(), "waiting on vendor", stack.actor)
        .await?;
    let blocked = stack
        .tasks
        .find_by_id(task.id())
        .await?
        .ok_or_else(|| eyre::eyre!("blocked task must be stored"))?;
    stack
        .workflow
        .unblock_task(task.id(), TaskStatus::from_static("In Progress"), stack.actor, None)
        .await?;
    let unblocked = stack
        .tasks
        .find_by_id(task.id())
        .await?
        .ok_or_else(|| eyre::eyre!("unblocked task must be stored"))?;
    let history = stack.workflow.get_task_status_history(task.id()).await?;

    ensure!(blocked.blocked_by() == Some(stack.actor), "blocker is persisted");
    ensure!(blocked.blocked_at().is_some(), "blocked time is persisted");
    ensure!(unblocked.blocked().is_none(), "blocking columns are cleared");
    let path: Vec<&str> = history.iter().map(|entry| entry.to_status().as_str()).collect();
    ensure!(
        path == ["To Do", "Blocked", "In Progress"],
        "unexpected history {path:?}"
    );
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn department_block_mode_survives_a_fresh_cache() -> eyre::Result<()> {
    let Some(database) = TestDatabase::create()? else {
        return Ok(());
    };
    let department = DepartmentId::new();
    let stack = PgStack::new(&database, WorkflowConfig::default());
    stack
        .workflow
        .set_enforcement_mode(
            EnforcementScope::Department(department),
            EnforcementPolicy::MandatoryChecklist,
            EnforcementMode::Block,
        )
        .await?;

    let fresh = CachedEnforcementSettings::new(
        Arc::new(PostgresEnforcementSettings::new(database.pool.clone())),
        EnforcementMode::Warn,
    );
    let mode = fresh
        .resolve_mode(EnforcementPolicy::MandatoryChecklist, Some(department))
        .await?;

    ensure!(mode == EnforcementMode::Block, "stored mode must be read back");
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn block_mode_keeps_status_when_checklist_is_open() -> eyre::Result<()> {
    let Some(database) = TestDatabase::create()? else {
        return Ok(());
    };
    let stack = PgStack::new(&database, WorkflowConfig::strict());
    let task = stack.task("PG-2").await?;
    stack
        .checklist
        .add_item(AddChecklistItemRequest::new(task.id(), "Pen test").mandatory())
        .await?;

    let result = stack
        .workflow
        .update_task_status(UpdateStatusRequest::new(
            task.id(),
            TaskStatus::from_static("Done"),
            stack.actor,
        ))
        .await;
    let stored = stack
        .tasks
        .find_by_id(task.id())
        .await?
        .ok_or_else(|| eyre::eyre!("task must be stored"))?;

    let Err(err @ WorkflowError::EnforcementBlocked { .. }) = &result else {
        bail!("expected enforcement rejection, got {result:?}");
    };
    ensure!(err.code() == "MANDATORY_CHECKLIST_INCOMPLETE", "code {}", err.code());
    ensure!(stored.status().as_str() == "To Do", "status must be unchanged");
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn rejected_history_insert_rolls_back_the_status_write() -> eyre::Result<()> {
    let Some(database) = TestDatabase::create()? else {
        return Ok(());
    };
    let stack = PgStack::new(&database, WorkflowConfig::default());
    let history = PostgresStatusHistory::new(database.pool.clone());
    let task = stack.task("PG-4").await?;

    let mut moved = task.clone();
    moved.move_to(TaskStatus::from_static("In Progress"), &DefaultClock);
    let entry = TaskStatusHistoryEntry::transition(
        task.id(),
        task.status().clone(),
        moved.status().clone(),
        stack.actor,
        None,
        &DefaultClock,
    );
    history.append(&entry).await?;
    let result = stack
        .tasks
        .update_status_with_history(&moved, task.status(), &entry)
        .await;
    let stored = stack
        .tasks
        .find_by_id(task.id())
        .await?
        .ok_or_else(|| eyre::eyre!("task must be stored"))?;

    ensure!(result.is_err(), "duplicate history entry must be rejected");
    ensure!(
        stored.status().as_str() == "To Do",
        "status write must roll back with the history insert"
    );
    ensure!(
        history.find_by_task(task.id()).await?.len() == 2,
        "only the creation entry and the pre-inserted entry exist"
    );
    Ok(())
}
