//! Audit trail projections over workflow and checklist activity.

use crate::in_memory::helpers::{Stack, runtime, stack};
use eyre::{bail, ensure};
use rstest::rstest;
use std::io;
use taskflow::{
    audit::domain::{ChecklistAction, Page},
    checklist::services::{AddChecklistItemRequest, SetCompletionRequest},
    task::{domain::TaskStatus, services::UpdateStatusRequest},
};
use tokio::runtime::Runtime;

#[rstest]
fn status_history_follows_the_task(
    runtime: io::Result<Runtime>,
    stack: Stack,
) -> eyre::Result<()> {
    let rt = runtime?;
    let task = stack.task(&rt, "OPS-1")?;
    for target in ["In Progress", "Done"] {
        rt.block_on(stack.workflow.update_task_status(UpdateStatusRequest::new(
            task.id(),
            TaskStatus::from_static(target),
            stack.actor.id,
        )))?;
    }

    let history = rt.block_on(stack.trail.status_history_for_task(task.id()))?;
    let latest = rt.block_on(stack.trail.latest_status_change(task.id()))?;
    let by_actor = rt.block_on(
        stack
            .trail
            .status_changes_by_actor(stack.actor.id, Page::new(0, 2)),
    )?;

    let path: Vec<&str> = history
        .iter()
        .map(|entry| entry.to_status().as_str())
        .collect();
    ensure!(path == ["To Do", "In Progress", "Done"], "unexpected path {path:?}");
    ensure!(
        latest.is_some_and(
            |entry| entry.from_status().map(TaskStatus::as_str) == Some("In Progress")
        ),
        "latest entry leaves In Progress"
    );
    let [newest, older] = by_actor.as_slice() else {
        bail!("expected a page of two entries, got {}", by_actor.len());
    };
    ensure!(newest.to_status().as_str() == "Done", "newest first");
    ensure!(older.to_status().as_str() == "In Progress", "then the older one");
    ensure!(
        stack.progress.recalculated() == [stack.project],
        "completion triggers one recalculation"
    );
    Ok(())
}

#[rstest]
fn checklist_flips_are_audited_with_reasons(
    runtime: io::Result<Runtime>,
    stack: Stack,
) -> eyre::Result<()> {
    let rt = runtime?;
    let task = stack.task(&rt, "OPS-2")?;
    let item = rt.block_on(
        stack
            .checklist
            .add_item(AddChecklistItemRequest::new(task.id(), "Rotate keys").mandatory()),
    )?;

    rt.block_on(
        stack
            .checklist
            .set_completed(SetCompletionRequest::check(item.id(), stack.actor.clone())),
    )?;
    let repeated = rt.block_on(
        stack
            .checklist
            .set_completed(SetCompletionRequest::check(item.id(), stack.actor.clone())),
    )?;
    rt.block_on(stack.checklist.set_completed(
        SetCompletionRequest::uncheck(item.id(), stack.actor.clone()).with_reason("keys leaked"),
    ))?;

    let for_task = rt.block_on(stack.trail.checklist_history_for_task(task.id()))?;
    let for_actor =
        rt.block_on(stack.trail.checklist_changes_by_actor(stack.actor.id, Page::default()))?;

    ensure!(repeated.recorded.is_none(), "re-checking is not a flip");
    let actions: Vec<ChecklistAction> = for_task.iter().map(|entry| entry.action()).collect();
    ensure!(
        actions == [ChecklistAction::Checked, ChecklistAction::Unchecked],
        "unexpected actions {actions:?}"
    );
    let Some(newest) = for_actor.first() else {
        bail!("actor history must not be empty");
    };
    ensure!(newest.reason() == Some("keys leaked"), "reason is kept");
    ensure!(newest.actor().name == "Robin", "actor name is kept");
    Ok(())
}
