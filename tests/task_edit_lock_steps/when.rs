//! When steps for edit lock BDD scenarios.

use super::world::{EditLockWorld, run_async};
use chrono::TimeDelta;
use eyre::WrapErr;
use flightdeck::task::domain::TaskPatch;
use rstest_bdd_macros::when;

#[when("{hours:i64} hours pass")]
fn hours_pass(world: &mut EditLockWorld, hours: i64) {
    world.clock.advance(TimeDelta::hours(hours));
}

#[when(r#"the task is retitled "{title}""#)]
fn task_retitled(world: &mut EditLockWorld, title: String) -> Result<(), eyre::Report> {
    let task_id = world.task()?.id();
    let outcome = run_async(
        world
            .service
            .update(task_id, TaskPatch::new().with_title(title)),
    )
    .wrap_err("update scenario task")?;
    world.last_outcome = Some(outcome);
    Ok(())
}

#[when("the task is deleted")]
fn task_deleted(world: &mut EditLockWorld) -> Result<(), eyre::Report> {
    let task_id = world.task()?.id();
    let outcome = run_async(world.service.delete(task_id)).wrap_err("delete scenario task")?;
    world.last_outcome = Some(outcome);
    Ok(())
}

#[when("the task is started")]
fn task_started(world: &mut EditLockWorld) -> Result<(), eyre::Report> {
    let task_id = world.task()?.id();
    let outcome = run_async(world.service.start(task_id)).wrap_err("start scenario task")?;
    world.last_outcome = Some(outcome);
    Ok(())
}
