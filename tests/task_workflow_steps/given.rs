//! Given steps for task workflow BDD scenarios.

use super::world::{WorkflowWorld, run_async};
use eyre::WrapErr;
use rstest_bdd_macros::given;
use taskflow::{
    checklist::services::AddChecklistItemRequest,
    dependency::domain::NewDependency,
    enforcement::domain::{EnforcementMode, EnforcementPolicy, EnforcementScope},
    task::domain::TaskDraft,
};

#[given(r#"a task "{code}" in the project"#)]
fn task_in_project(world: &mut WorkflowWorld, code: String) -> Result<(), eyre::Report> {
    let draft = TaskDraft::new(world.project, code.as_str(), format!("Task {code}"));
    let task = run_async(world.workflow.register_task(draft, world.actor))
        .wrap_err("register task for workflow scenario")?;
    world.task_ids.insert(code, task.id());
    Ok(())
}

#[given(r#"a task "{code}" owned by the actor in department "{department}""#)]
fn owned_task_in_department(
    world: &mut WorkflowWorld,
    code: String,
    department: String,
) -> Result<(), eyre::Report> {
    let department_id = world.department(&department);
    let draft = TaskDraft::new(world.project, code.as_str(), format!("Task {code}"))
        .with_owner(world.actor)
        .with_department(department_id);
    let task = run_async(world.workflow.register_task(draft, world.actor))
        .wrap_err("register owned task for workflow scenario")?;
    world.task_ids.insert(code, task.id());
    Ok(())
}

#[given(r#"task "{code}" has a mandatory checklist item "{text}""#)]
fn mandatory_checklist_item(
    world: &mut WorkflowWorld,
    code: String,
    text: String,
) -> Result<(), eyre::Report> {
    let task_id = world.task_id(&code)?;
    run_async(
        world
            .checklist
            .add_item(AddChecklistItemRequest::new(task_id, text).mandatory()),
    )
    .wrap_err("add mandatory checklist item")?;
    Ok(())
}

#[given(r#"the checklist policy is "{mode}" for department "{department}""#)]
fn checklist_policy_for_department(
    world: &mut WorkflowWorld,
    mode: String,
    department: String,
) -> Result<(), eyre::Report> {
    let parsed = EnforcementMode::try_from(mode.as_str())
        .map_err(|err| eyre::eyre!("invalid enforcement mode in scenario: {err}"))?;
    let department_id = world.department(&department);
    run_async(world.workflow.set_enforcement_mode(
        EnforcementScope::Department(department_id),
        EnforcementPolicy::MandatoryChecklist,
        parsed,
    ))
    .wrap_err("store checklist enforcement mode")?;
    Ok(())
}

#[given(r#"task "{dependent}" depends on task "{prerequisite}""#)]
fn task_depends_on(
    world: &mut WorkflowWorld,
    dependent: String,
    prerequisite: String,
) -> Result<(), eyre::Report> {
    let input = NewDependency::blocks(
        world.task_id(&dependent)?,
        world.task_id(&prerequisite)?,
        world.actor,
    );
    run_async(world.workflow.dependencies().add_dependency(input))
        .wrap_err("add dependency in scenario setup")?;
    Ok(())
}

#[given(r#"task "{code}" is blocked because "{reason}""#)]
fn task_is_blocked(
    world: &mut WorkflowWorld,
    code: String,
    reason: String,
) -> Result<(), eyre::Report> {
    let task_id = world.task_id(&code)?;
    run_async(world.workflow.block_task(task_id, &reason, world.actor))
        .wrap_err("block task in scenario setup")?;
    Ok(())
}
