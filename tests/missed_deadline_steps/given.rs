//! Given steps for missed deadline BDD scenarios.

use super::world::{DeadlineWorld, run_async};
use chrono::TimeDelta;
use eyre::WrapErr;
use flightdeck::{
    settings::NotificationSettings,
    task::{
        domain::{Priority, TaskType},
        services::CreateTaskRequest,
    },
};
use rstest_bdd_macros::given;

#[given("deadline notifications are disabled")]
fn notifications_disabled(world: &mut DeadlineWorld) -> Result<(), eyre::Report> {
    let disabled = NotificationSettings {
        enabled: false,
        ..NotificationSettings::default()
    };
    run_async(world.settings.save(disabled)).wrap_err("save notification settings")?;
    Ok(())
}

#[given(r#"a pending task "{title}" due in {minutes:i64} minutes"#)]
fn pending_task_due(
    world: &mut DeadlineWorld,
    title: String,
    minutes: i64,
) -> Result<(), eyre::Report> {
    let request = CreateTaskRequest::new(title, "scenario task", Priority::Low, TaskType::Deadline)
        .with_deadline(world.clock.now() + TimeDelta::minutes(minutes));
    let created = run_async(world.service.create(request)).wrap_err("create scenario task")?;
    world.task = Some(created);
    Ok(())
}

#[given("the task has been completed")]
fn task_completed(world: &mut DeadlineWorld) -> Result<(), eyre::Report> {
    let task_id = world.task()?.id();
    let completed = run_async(world.service.complete(task_id))
        .wrap_err("complete scenario task")?
        .applied()
        .ok_or_else(|| eyre::eyre!("completion was refused"))?;
    world.task = Some(completed);
    Ok(())
}
