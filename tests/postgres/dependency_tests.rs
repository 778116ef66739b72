//! Dependency edges persisted through the `PostgreSQL` adapters.

use crate::postgres::helpers::{PgStack, TestDatabase};
use eyre::ensure;
use taskflow::{
    config::WorkflowConfig,
    dependency::{domain::NewDependency, services::DependencyError},
};

#[tokio::test(flavor = "multi_thread")]
async fn cycle_and_duplicate_are_rejected() -> eyre::Result<()> {
    let Some(database) = TestDatabase::create()? else {
        return Ok(());
    };
    let stack = PgStack::new(&database, WorkflowConfig::default());
    let a = stack.task("A").await?;
    let b = stack.task("B").await?;
    let deps = stack.workflow.dependencies();
    deps.add_dependency(NewDependency::blocks(a.id(), b.id(), stack.actor))
        .await?;

    let cycle = deps
        .add_dependency(NewDependency::blocks(b.id(), a.id(), stack.actor))
        .await;
    let duplicate = deps
        .add_dependency(NewDependency::relates_to(a.id(), b.id(), stack.actor))
        .await;
    let graph = deps.get_dependency_graph(stack.project).await?;

    ensure!(
        matches!(cycle, Err(DependencyError::CycleDetected { .. })),
        "expected cycle rejection, got {cycle:?}"
    );
    ensure!(
        matches!(duplicate, Err(DependencyError::DuplicateDependency { .. })),
        "expected duplicate rejection, got {duplicate:?}"
    );
    ensure!(graph.edges.len() == 1, "only the first edge is stored");
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn concurrent_opposite_edges_store_exactly_one() -> eyre::Result<()> {
    let Some(database) = TestDatabase::create()? else {
        return Ok(());
    };
    let stack = PgStack::new(&database, WorkflowConfig::default());
    let a = stack.task("A").await?;
    let b = stack.task("B").await?;
    let (a_id, b_id) = (a.id(), b.id());
    let forward = stack.workflow.dependencies().clone();
    let backward = stack.workflow.dependencies().clone();
    let actor = stack.actor;

    let (left, right) = tokio::join!(
        tokio::spawn(async move {
            forward
                .add_dependency(NewDependency::blocks(a_id, b_id, actor))
                .await
        }),
        tokio::spawn(async move {
            backward
                .add_dependency(NewDependency::blocks(b_id, a_id, actor))
                .await
        }),
    );
    let stored = [left?, right?].iter().filter(|result| result.is_ok()).count();
    let graph = stack
        .workflow
        .dependencies()
        .get_dependency_graph(stack.project)
        .await?;

    ensure!(stored == 1, "exactly one direction may be stored");
    ensure!(graph.edges.len() == 1, "graph holds a single edge");
    Ok(())
}
