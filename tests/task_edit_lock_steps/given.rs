//! Given steps for edit lock BDD scenarios.

use super::world::{EditLockWorld, run_async};
use eyre::WrapErr;
use flightdeck::task::{
    domain::{Priority, TaskType},
    services::CreateTaskRequest,
};
use rstest_bdd_macros::given;

#[given(r#"a task titled "{title}""#)]
fn task_titled(world: &mut EditLockWorld, title: String) -> Result<(), eyre::Report> {
    let request = CreateTaskRequest::new(title, "scenario task", Priority::High, TaskType::Daily);
    let created = run_async(world.service.create(request)).wrap_err("create scenario task")?;
    world.task = Some(created);
    Ok(())
}

#[given("the task has been completed")]
fn task_completed(world: &mut EditLockWorld) -> Result<(), eyre::Report> {
    let task_id = world.task()?.id();
    let completed = run_async(world.service.complete(task_id))
        .wrap_err("complete scenario task")?
        .applied()
        .ok_or_else(|| eyre::eyre!("completion was refused"))?;
    world.task = Some(completed);
    Ok(())
}

#[given("the task has been marked missed")]
fn task_marked_missed(world: &mut EditLockWorld) -> Result<(), eyre::Report> {
    let task_id = world.task()?.id();
    let missed = run_async(world.service.mark_missed(task_id))
        .wrap_err("mark scenario task missed")?
        .applied()
        .ok_or_else(|| eyre::eyre!("mark missed was refused"))?;
    world.task = Some(missed);
    Ok(())
}
