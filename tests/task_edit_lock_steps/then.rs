//! Then steps for edit lock BDD scenarios.

use super::world::{EditLockWorld, run_async};
use flightdeck::task::{domain::Task, services::MutationOutcome};
use rstest_bdd_macros::then;

fn last_outcome(world: &EditLockWorld) -> Result<&MutationOutcome<Task>, eyre::Report> {
    world
        .last_outcome
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing mutation outcome"))
}

#[then("the change is applied")]
fn change_applied(world: &EditLockWorld) -> Result<(), eyre::Report> {
    let outcome = last_outcome(world)?;
    eyre::ensure!(outcome.is_applied(), "expected applied change, got {outcome:?}");
    Ok(())
}

#[then("the change is refused because the task is locked")]
fn change_locked(world: &EditLockWorld) -> Result<(), eyre::Report> {
    let outcome = last_outcome(world)?;
    eyre::ensure!(
        *outcome == MutationOutcome::EditLocked,
        "expected EditLocked, got {outcome:?}"
    );
    Ok(())
}

#[then("the change is refused as an invalid transition")]
fn change_invalid(world: &EditLockWorld) -> Result<(), eyre::Report> {
    let outcome = last_outcome(world)?;
    eyre::ensure!(
        matches!(outcome, MutationOutcome::InvalidTransition { .. }),
        "expected InvalidTransition, got {outcome:?}"
    );
    Ok(())
}

#[then(r#"the stored task title is "{title}""#)]
fn stored_title(world: &EditLockWorld, title: String) -> Result<(), eyre::Report> {
    let task_id = world.task()?.id();
    let stored = run_async(world.service.find_by_id(task_id))?
        .ok_or_else(|| eyre::eyre!("task {task_id} is no longer stored"))?;
    eyre::ensure!(
        stored.title() == title,
        "expected title {title}, found {}",
        stored.title()
    );
    Ok(())
}
