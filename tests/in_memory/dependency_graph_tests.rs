//! Dependency graph behaviour across the in-memory stores.

use crate::in_memory::helpers::{Stack, runtime, stack};
use eyre::ensure;
use rstest::rstest;
use std::io;
use taskflow::{
    dependency::{domain::NewDependency, services::DependencyError},
    task::{domain::TaskStatus, services::UpdateStatusRequest},
};
use tokio::runtime::Runtime;

#[rstest]
fn cycle_rejection_leaves_graph_unchanged(
    runtime: io::Result<Runtime>,
    stack: Stack,
) -> eyre::Result<()> {
    let rt = runtime?;
    let a = stack.task(&rt, "A")?;
    let b = stack.task(&rt, "B")?;
    let c = stack.task(&rt, "C")?;
    let deps = stack.workflow.dependencies();
    rt.block_on(deps.add_dependency(NewDependency::blocks(a.id(), b.id(), stack.actor.id)))?;
    rt.block_on(deps.add_dependency(NewDependency::blocks(b.id(), c.id(), stack.actor.id)))?;
    let before = rt.block_on(deps.get_dependency_graph(stack.project))?;

    let result =
        rt.block_on(deps.add_dependency(NewDependency::blocks(c.id(), a.id(), stack.actor.id)));
    let after = rt.block_on(deps.get_dependency_graph(stack.project))?;

    ensure!(
        matches!(&result, Err(DependencyError::CycleDetected { path }) if path.len() == 3),
        "expected a three-task cycle, got {result:?}"
    );
    ensure!(before.edges == after.edges, "edge set must be unchanged");
    ensure!(after.nodes.len() == 3, "every task is a node");
    Ok(())
}

#[rstest]
fn removal_unblocks_completion_check(
    runtime: io::Result<Runtime>,
    stack: Stack,
) -> eyre::Result<()> {
    let rt = runtime?;
    let feature = stack.task(&rt, "FEAT")?;
    let schema = stack.task(&rt, "SCHEMA")?;
    let deps = stack.workflow.dependencies();
    let added = rt.block_on(deps.add_dependency(NewDependency::blocks(
        feature.id(),
        schema.id(),
        stack.actor.id,
    )))?;
    let blocked = rt.block_on(stack.workflow.can_start_task(feature.id()))?;

    let removed = rt.block_on(deps.remove_dependency(added.dependency.id()))?;
    let removed_again = rt.block_on(deps.remove_dependency(added.dependency.id()))?;
    let ready = rt.block_on(stack.workflow.can_start_task(feature.id()))?;

    ensure!(blocked.has_blocking, "open prerequisite must block");
    ensure!(removed, "first removal deletes the edge");
    ensure!(!removed_again, "second removal is a no-op");
    ensure!(!ready.has_blocking, "no prerequisites remain");
    Ok(())
}

#[rstest]
fn completed_prerequisite_stops_blocking(
    runtime: io::Result<Runtime>,
    stack: Stack,
) -> eyre::Result<()> {
    let rt = runtime?;
    let release = stack.task(&rt, "REL")?;
    let qa = stack.task(&rt, "QA")?;
    rt.block_on(stack.workflow.dependencies().add_dependency(NewDependency::blocks(
        release.id(),
        qa.id(),
        stack.actor.id,
    )))?;

    rt.block_on(stack.workflow.update_task_status(UpdateStatusRequest::new(
        qa.id(),
        TaskStatus::from_static("Done"),
        stack.actor.id,
    )))?;
    let readiness = rt.block_on(stack.workflow.can_start_task(release.id()))?;

    ensure!(!readiness.has_blocking, "a completed prerequisite does not block");
    ensure!(readiness.blocking_tasks.is_empty(), "no tasks listed");
    Ok(())
}

#[rstest]
fn relates_to_edges_are_informational(
    runtime: io::Result<Runtime>,
    stack: Stack,
) -> eyre::Result<()> {
    let rt = runtime?;
    let docs = stack.task(&rt, "DOCS")?;
    let api = stack.task(&rt, "API")?;
    let deps = stack.workflow.dependencies();
    rt.block_on(deps.add_dependency(NewDependency::blocks(docs.id(), api.id(), stack.actor.id)))?;

    let backwards = rt.block_on(deps.add_dependency(NewDependency::relates_to(
        api.id(),
        docs.id(),
        stack.actor.id,
    )))?;
    let readiness = rt.block_on(stack.workflow.can_start_task(api.id()))?;
    let dependents = rt.block_on(deps.get_task_dependents(docs.id()))?;

    ensure!(
        !backwards.dependency.dependency_type().is_blocking(),
        "stored as RELATES_TO"
    );
    ensure!(!readiness.has_blocking, "RELATES_TO never blocks");
    ensure!(dependents.len() == 1, "docs is depended on by api only");
    Ok(())
}
