//! Domain-focused tests for task values and blocking state.

use crate::task::domain::{
    BlockedReason, ProjectId, Task, TaskDomainError, TaskDraft, TaskStatus, UserId,
};
use mockable::DefaultClock;
use rstest::{fixture, rstest};

#[fixture]
fn clock() -> DefaultClock {
    DefaultClock
}

fn draft(code: &str, title: &str) -> TaskDraft {
    TaskDraft::new(ProjectId::new(), code, title)
}

#[rstest]
#[case("")]
#[case("   ")]
fn status_rejects_blank_names(#[case] raw: &str) {
    assert_eq!(TaskStatus::new(raw), Err(TaskDomainError::EmptyStatus));
}

#[rstest]
fn status_rejects_names_longer_than_column() {
    let raw = "x".repeat(TaskStatus::MAX_LENGTH + 1);
    assert_eq!(
        TaskStatus::new(raw.clone()),
        Err(TaskDomainError::StatusTooLong(raw))
    );
}

#[rstest]
fn status_trims_and_matches_case_insensitively() {
    let status = TaskStatus::new("  In Review ").expect("valid status");

    assert_eq!(status.as_str(), "In Review");
    assert!(status.matches(&TaskStatus::from_static("in review")));
    assert!(!status.matches(&TaskStatus::from_static("In Progress")));
}

#[rstest]
fn blocked_reason_rejects_whitespace() {
    assert_eq!(
        BlockedReason::new(" \n\t"),
        Err(TaskDomainError::EmptyBlockedReason)
    );
    assert_eq!(
        BlockedReason::new(" vendor outage ")
            .expect("valid reason")
            .as_str(),
        "vendor outage"
    );
}

#[rstest]
#[case("", "Title", TaskDomainError::EmptyCode)]
#[case("T-1", "  ", TaskDomainError::EmptyTitle)]
fn task_requires_code_and_title(
    clock: DefaultClock,
    #[case] code: &str,
    #[case] title: &str,
    #[case] expected: TaskDomainError,
) {
    let result = Task::new(draft(code, title), TaskStatus::from_static("To Do"), &clock);
    assert_eq!(result, Err(expected));
}

#[rstest]
fn new_task_starts_unblocked(clock: DefaultClock) {
    let owner = UserId::new();
    let task = Task::new(
        draft(" T-2 ", "Write migration").with_owner(owner),
        TaskStatus::from_static("To Do"),
        &clock,
    )
    .expect("valid task");

    assert_eq!(task.code(), "T-2");
    assert_eq!(task.owner_id(), Some(owner));
    assert!(task.blocked().is_none());
    assert_eq!(task.created_at(), task.updated_at());
}

#[rstest]
fn blocking_records_reason_and_moving_clears_it(clock: DefaultClock) {
    let actor = UserId::new();
    let mut task = Task::new(
        draft("T-3", "Ship release"),
        TaskStatus::from_static("In Progress"),
        &clock,
    )
    .expect("valid task");

    task.block(
        TaskStatus::from_static("Blocked"),
        BlockedReason::new("awaiting approval").expect("valid reason"),
        actor,
        &clock,
    );
    assert_eq!(task.status().as_str(), "Blocked");
    assert_eq!(
        task.blocked_reason().map(BlockedReason::as_str),
        Some("awaiting approval")
    );
    assert_eq!(task.blocked_by(), Some(actor));
    assert!(task.blocked_at().is_some());

    task.move_to(TaskStatus::from_static("Done"), &clock);
    assert_eq!(task.status().as_str(), "Done");
    assert!(task.blocked().is_none());
    assert!(task.blocked_reason().is_none());
    assert!(task.updated_at() >= task.created_at());
}
