//! Then steps for task workflow BDD scenarios.

use super::world::{WorkflowWorld, run_async};
use eyre::WrapErr;
use rstest_bdd_macros::then;
use taskflow::{
    enforcement::domain::IssueCode,
    task::services::{TransitionOutcome, WorkflowError},
};

fn last_transition(
    world: &WorkflowWorld,
) -> Result<&Result<TransitionOutcome, WorkflowError>, eyre::Report> {
    world
        .last_transition
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing transition result"))
}

#[then(r#"the dependency is rejected with code "{code}""#)]
fn dependency_rejected(world: &WorkflowWorld, code: String) -> Result<(), eyre::Report> {
    let result = world
        .last_dependency
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing dependency result"))?;

    match result {
        Err(err) if err.code() == code => Ok(()),
        Err(err) => Err(eyre::eyre!("expected {code}, got {}", err.code())),
        Ok(added) => Err(eyre::eyre!(
            "expected {code}, but dependency {} was stored",
            added.dependency.id()
        )),
    }
}

#[then("the project has {count:usize} dependency")]
fn project_dependency_count(world: &WorkflowWorld, count: usize) -> Result<(), eyre::Report> {
    let graph = run_async(world.workflow.dependencies().get_dependency_graph(world.project))
        .wrap_err("load dependency graph")?;

    if graph.edges.len() != count {
        return Err(eyre::eyre!(
            "expected {count} dependency edge(s), found {}",
            graph.edges.len()
        ));
    }
    Ok(())
}

#[then(r#"the transition is rejected with code "{code}""#)]
fn transition_rejected(world: &WorkflowWorld, code: String) -> Result<(), eyre::Report> {
    match last_transition(world)? {
        Err(err) if err.code() == code => Ok(()),
        Err(err) => Err(eyre::eyre!("expected {code}, got {}", err.code())),
        Ok(outcome) => Err(eyre::eyre!(
            "expected {code}, but task moved to {}",
            outcome.task.status()
        )),
    }
}

#[then(r#"task "{code}" still has status "{status}""#)]
fn task_still_has_status(
    world: &WorkflowWorld,
    code: String,
    status: String,
) -> Result<(), eyre::Report> {
    let task = world.stored_task(&code)?;
    if task.status().as_str() != status {
        return Err(eyre::eyre!(
            "expected status {status}, found {}",
            task.status()
        ));
    }
    Ok(())
}

#[then(r#"the transition succeeds with status "{status}""#)]
fn transition_succeeds(world: &WorkflowWorld, status: String) -> Result<(), eyre::Report> {
    let outcome = match last_transition(world)? {
        Ok(outcome) => outcome,
        Err(err) => return Err(eyre::eyre!("expected success, got {err}")),
    };
    if !outcome.changed || outcome.task.status().as_str() != status {
        return Err(eyre::eyre!(
            "expected a change into {status}, got {} (changed: {})",
            outcome.task.status(),
            outcome.changed
        ));
    }
    Ok(())
}

#[then(r#"the transition warns about "{item}""#)]
fn transition_warns_about(world: &WorkflowWorld, item: String) -> Result<(), eyre::Report> {
    let Ok(outcome) = last_transition(world)? else {
        return Err(eyre::eyre!("expected a successful transition"));
    };
    let named = outcome.warnings.iter().any(|warning| {
        warning.code == IssueCode::MandatoryChecklistIncomplete
            && warning.items.iter().any(|found| found.label == item)
    });
    if !named {
        return Err(eyre::eyre!(
            "expected a checklist warning naming {item}, got {:?}",
            outcome.warnings
        ));
    }
    Ok(())
}

#[then(r#"the latest history entry for task "{code}" moves to "{status}" noting "{note}""#)]
fn latest_history_entry(
    world: &WorkflowWorld,
    code: String,
    status: String,
    note: String,
) -> Result<(), eyre::Report> {
    let task_id = world.task_id(&code)?;
    let latest = run_async(world.workflow.get_latest_task_status_change(task_id))
        .wrap_err("load latest status change")?
        .ok_or_else(|| eyre::eyre!("task {code} has no history"))?;

    if latest.to_status().as_str() != status {
        return Err(eyre::eyre!(
            "expected latest entry into {status}, found {}",
            latest.to_status()
        ));
    }
    if !latest.note().is_some_and(|text| text.contains(note.as_str())) {
        return Err(eyre::eyre!(
            "expected note containing {note}, found {:?}",
            latest.note()
        ));
    }
    Ok(())
}

#[then(r#"task "{code}" has no blocking details"#)]
fn task_has_no_blocking_details(world: &WorkflowWorld, code: String) -> Result<(), eyre::Report> {
    let task = world.stored_task(&code)?;
    if task.blocked().is_some() {
        return Err(eyre::eyre!(
            "expected blocking details to be cleared, found {:?}",
            task.blocked()
        ));
    }
    Ok(())
}

#[then(r#"task "{code}" is blocked only by "{prerequisite}""#)]
fn blocked_only_by(
    world: &WorkflowWorld,
    code: String,
    prerequisite: String,
) -> Result<(), eyre::Report> {
    let readiness = world
        .last_readiness
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing readiness check for task {code}"))?;
    let blockers: Vec<&str> = readiness
        .blocking_tasks
        .iter()
        .map(|task| task.code())
        .collect();

    if !readiness.has_blocking || blockers != [prerequisite.as_str()] {
        return Err(eyre::eyre!(
            "expected task {code} to be blocked only by {prerequisite}, got {blockers:?}"
        ));
    }
    Ok(())
}
