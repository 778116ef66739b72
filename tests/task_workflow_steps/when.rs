//! When steps for task workflow BDD scenarios.

use super::world::{WorkflowWorld, run_async};
use eyre::WrapErr;
use rstest_bdd_macros::when;
use taskflow::{
    dependency::domain::NewDependency,
    task::{domain::TaskStatus, services::UpdateStatusRequest},
};

#[when(r#"task "{dependent}" is made to depend on task "{prerequisite}""#)]
fn add_dependency(
    world: &mut WorkflowWorld,
    dependent: String,
    prerequisite: String,
) -> Result<(), eyre::Report> {
    let input = NewDependency::blocks(
        world.task_id(&dependent)?,
        world.task_id(&prerequisite)?,
        world.actor,
    );
    world.last_dependency = Some(run_async(world.workflow.dependencies().add_dependency(input)));
    Ok(())
}

#[when(r#"task "{code}" is moved to "{status}""#)]
fn move_task(world: &mut WorkflowWorld, code: String, status: String) -> Result<(), eyre::Report> {
    let task_id = world.task_id(&code)?;
    let target = TaskStatus::new(status).wrap_err("parse target status in scenario")?;
    let request = UpdateStatusRequest::new(task_id, target, world.actor);
    world.last_transition = Some(run_async(world.workflow.update_task_status(request)));
    Ok(())
}

#[when(r#"task "{code}" is blocked without a reason"#)]
fn block_without_reason(world: &mut WorkflowWorld, code: String) -> Result<(), eyre::Report> {
    let task_id = world.task_id(&code)?;
    world.last_transition = Some(run_async(world.workflow.block_task(task_id, "", world.actor)));
    Ok(())
}

#[when(r#"task "{code}" is blocked with reason "{reason}""#)]
fn block_with_reason(
    world: &mut WorkflowWorld,
    code: String,
    reason: String,
) -> Result<(), eyre::Report> {
    let task_id = world.task_id(&code)?;
    world.last_transition = Some(run_async(
        world.workflow.block_task(task_id, &reason, world.actor),
    ));
    Ok(())
}

#[when(r#"task "{code}" is unblocked into "{status}""#)]
fn unblock_task(
    world: &mut WorkflowWorld,
    code: String,
    status: String,
) -> Result<(), eyre::Report> {
    let task_id = world.task_id(&code)?;
    let target = TaskStatus::new(status).wrap_err("parse unblock status in scenario")?;
    world.last_transition = Some(run_async(
        world.workflow.unblock_task(task_id, target, world.actor, None),
    ));
    Ok(())
}

#[when(r#"the readiness of task "{code}" is checked"#)]
fn check_readiness(world: &mut WorkflowWorld, code: String) -> Result<(), eyre::Report> {
    let task_id = world.task_id(&code)?;
    let readiness = run_async(world.workflow.can_start_task(task_id))
        .wrap_err("check blocking prerequisites")?;
    world.last_readiness = Some(readiness);
    Ok(())
}
