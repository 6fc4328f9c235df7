//! Then steps for missed deadline BDD scenarios.

use super::world::{DeadlineWorld, run_async};
use flightdeck::task::{adapters::memory::RecordedNotification, domain::TaskStatus};
use rstest_bdd_macros::then;

#[then(r#"the task status is "{status}""#)]
fn task_status_is(world: &DeadlineWorld, status: String) -> Result<(), eyre::Report> {
    let expected = TaskStatus::try_from(status.as_str())
        .map_err(|err| eyre::eyre!("invalid expected status in scenario: {err}"))?;
    let task_id = world.task()?.id();
    let stored = run_async(world.service.find_by_id(task_id))?
        .ok_or_else(|| eyre::eyre!("task {task_id} is no longer stored"))?;
    eyre::ensure!(
        stored.status() == expected,
        "expected status {expected}, found {}",
        stored.status()
    );
    Ok(())
}

#[then("the number of missed deadline notifications is {count:usize}")]
fn missed_notification_count(world: &DeadlineWorld, count: usize) -> Result<(), eyre::Report> {
    let sent = world
        .notifier
        .sent()
        .into_iter()
        .filter(|notification| matches!(notification, RecordedNotification::MissedDeadline(_)))
        .count();
    eyre::ensure!(
        sent == count,
        "expected {count} missed deadline notifications, found {sent}"
    );
    Ok(())
}
