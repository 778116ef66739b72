//! In-memory task repository tests for writes paired with status history.

use crate::audit::{
    adapters::memory::InMemoryStatusHistory,
    domain::TaskStatusHistoryEntry,
    ports::{AuditRepositoryError, StatusHistoryRepository},
};
use crate::task::{
    adapters::memory::InMemoryTaskRepository,
    domain::{BlockedReason, PersistedTaskData, ProjectId, Task, TaskDraft, TaskStatus, UserId},
    ports::{TaskRepository, TaskRepositoryError},
};
use eyre::{ensure, eyre};
use mockable::DefaultClock;
use rstest::{fixture, rstest};

struct Store {
    tasks: InMemoryTaskRepository,
    history: InMemoryStatusHistory,
    clock: DefaultClock,
    actor: UserId,
}

#[fixture]
fn store() -> Store {
    let tasks = InMemoryTaskRepository::new();
    Store {
        history: tasks.history(),
        tasks,
        clock: DefaultClock,
        actor: UserId::new(),
    }
}

impl Store {
    fn draft_task(&self, code: &str) -> Task {
        Task::new(
            TaskDraft::new(ProjectId::new(), code, "Rotate signing keys"),
            TaskStatus::from_static("To Do"),
            &self.clock,
        )
        .expect("valid task")
    }

    async fn stored(&self, task: &Task) -> eyre::Result<Task> {
        self.tasks
            .find_by_id(task.id())
            .await?
            .ok_or_else(|| eyre!("task {} should be stored", task.code()))
    }

    fn creation_entry(&self, task: &Task) -> TaskStatusHistoryEntry {
        TaskStatusHistoryEntry::creation(task.id(), task.status().clone(), self.actor, &self.clock)
    }
}

fn is_duplicate_entry(result: &Result<(), TaskRepositoryError>) -> bool {
    matches!(
        result,
        Err(TaskRepositoryError::History(
            AuditRepositoryError::DuplicateEntry(_)
        ))
    )
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn rejected_creation_entry_stores_nothing(store: Store) -> eyre::Result<()> {
    let task = store.draft_task("RP-1");
    let entry = store.creation_entry(&task);
    store.history.append(&entry).await?;

    let result = store.tasks.store_with_history(&task, &entry).await;

    ensure!(
        is_duplicate_entry(&result),
        "expected duplicate entry, got {result:?}"
    );
    ensure!(
        store.tasks.find_by_id(task.id()).await?.is_none(),
        "task must not be stored without its creation entry"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn rejected_transition_entry_keeps_stored_status(store: Store) -> eyre::Result<()> {
    let task = store.draft_task("RP-2");
    let created = store.creation_entry(&task);
    store.tasks.store_with_history(&task, &created).await?;

    let mut moved = task.clone();
    moved.move_to(TaskStatus::from_static("In Progress"), &store.clock);
    let taken = TaskStatusHistoryEntry::transition(
        task.id(),
        task.status().clone(),
        moved.status().clone(),
        store.actor,
        None,
        &store.clock,
    );
    store.history.append(&taken).await?;
    let result = store
        .tasks
        .update_status_with_history(&moved, task.status(), &taken)
        .await;

    ensure!(
        is_duplicate_entry(&result),
        "expected duplicate entry, got {result:?}"
    );
    ensure!(
        store.stored(&task).await?.status().as_str() == "To Do",
        "status must not change when its history entry is rejected"
    );

    let retry = TaskStatusHistoryEntry::transition(
        task.id(),
        task.status().clone(),
        moved.status().clone(),
        store.actor,
        None,
        &store.clock,
    );
    store
        .tasks
        .update_status_with_history(&moved, task.status(), &retry)
        .await?;
    let latest = store.history.find_latest_for_task(task.id()).await?;
    ensure!(
        store.stored(&task).await?.status().as_str() == "In Progress",
        "retry must commit the transition"
    );
    ensure!(
        latest.is_some_and(|entry| entry.id() == retry.id()),
        "retry must record its own entry"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn stale_expected_status_writes_no_history(store: Store) -> eyre::Result<()> {
    let task = store.draft_task("RP-3");
    let created = store.creation_entry(&task);
    store.tasks.store_with_history(&task, &created).await?;

    let mut moved = task.clone();
    moved.move_to(TaskStatus::from_static("Done"), &store.clock);
    let entry = TaskStatusHistoryEntry::transition(
        task.id(),
        TaskStatus::from_static("In Progress"),
        moved.status().clone(),
        store.actor,
        None,
        &store.clock,
    );
    let result = store
        .tasks
        .update_status_with_history(&moved, &TaskStatus::from_static("In Progress"), &entry)
        .await;

    ensure!(
        matches!(result, Err(TaskRepositoryError::StatusConflict { .. })),
        "expected a status conflict, got {result:?}"
    );
    ensure!(store.history.len() == 1, "only the creation entry may exist");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn status_write_leaves_other_fields_alone(store: Store) -> eyre::Result<()> {
    let task = store.draft_task("RP-4");
    store.tasks.store(&task).await?;

    let owner = UserId::new();
    let edited = Task::from_persisted(PersistedTaskData {
        id: task.id(),
        project_id: task.project_id(),
        code: task.code().to_owned(),
        title: "Rotate signing keys and notify partners".to_owned(),
        status: task.status().clone(),
        department_id: None,
        owner_id: Some(owner),
        assignee_ids: Vec::new(),
        blocked: None,
        created_at: task.created_at(),
        updated_at: task.updated_at(),
    });
    store.tasks.update(&edited).await?;

    let mut blocked = task.clone();
    blocked.block(
        TaskStatus::from_static("Blocked"),
        BlockedReason::new("partner contact missing")?,
        store.actor,
        &store.clock,
    );
    store.tasks.update_status(&blocked, task.status()).await?;
    let stored = store.stored(&task).await?;

    ensure!(stored.status().as_str() == "Blocked", "status must be written");
    ensure!(
        stored.blocked_by() == Some(store.actor),
        "blocking details must be written"
    );
    ensure!(
        stored.title() == "Rotate signing keys and notify partners",
        "a concurrent title edit must survive"
    );
    ensure!(
        stored.owner_id() == Some(owner),
        "a concurrent owner edit must survive"
    );
    Ok(())
}
