//! In-memory integration tests for deadline reminders and reconciliation.

use chrono::TimeDelta;
use flightdeck::task::{
    adapters::memory::RecordedNotification,
    domain::{Priority, TaskStatus},
};
use rstest::rstest;

use super::helpers::{Engine, engine};

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn reminders_follow_a_task_until_it_is_missed(engine: Engine) -> eyre::Result<()> {
    let task = engine
        .add("Essay", Priority::High, Some(TimeDelta::hours(24)))
        .await?;

    let day_before = engine.poller.tick().await?;
    engine.clock.advance(TimeDelta::hours(23));
    let hour_before = engine.poller.tick().await?;
    engine.clock.advance(TimeDelta::minutes(30));
    let half_hour_before = engine.poller.tick().await?;
    engine.clock.advance(TimeDelta::minutes(31));
    let after = engine.poller.tick().await?;
    let again = engine.poller.tick().await?;

    eyre::ensure!(day_before.upcoming_notified == 1, "day reminder missing");
    eyre::ensure!(hour_before.upcoming_notified == 1, "hour reminder missing");
    eyre::ensure!(
        half_hour_before.upcoming_notified == 1,
        "half hour reminder missing"
    );
    eyre::ensure!(after.missed_marked == 1, "task should be marked missed");
    eyre::ensure!(again.missed_marked == 0, "missed task marked twice");
    let sent = engine.notifier.sent();
    eyre::ensure!(
        sent == vec![
            RecordedNotification::UpcomingDeadline {
                task_id: task.id(),
                minutes_until: 1440,
            },
            RecordedNotification::UpcomingDeadline {
                task_id: task.id(),
                minutes_until: 60,
            },
            RecordedNotification::UpcomingDeadline {
                task_id: task.id(),
                minutes_until: 30,
            },
            RecordedNotification::MissedDeadline(task.id()),
        ],
        "unexpected notifications: {sent:?}"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn completing_before_the_deadline_stops_reminders(engine: Engine) -> eyre::Result<()> {
    let task = engine
        .add("Invoice", Priority::Low, Some(TimeDelta::minutes(60)))
        .await?;
    let follow_up = engine.add("Follow up", Priority::Low, None).await?;
    engine.poller.tick().await?;

    let completed = engine
        .service
        .complete(task.id())
        .await?
        .applied()
        .ok_or_else(|| eyre::eyre!("completion should apply"))?;
    let suggested = engine.poller.announce_completion(&completed).await?;
    engine.clock.advance(TimeDelta::hours(2));
    let later = engine.poller.tick().await?;

    eyre::ensure!(
        suggested.map(|next| next.id()) == Some(follow_up.id()),
        "follow up should be suggested"
    );
    eyre::ensure!(later.missed_marked == 0, "completed task must not be missed");
    let stored = engine
        .service
        .find_by_id(task.id())
        .await?
        .ok_or_else(|| eyre::eyre!("task should exist"))?;
    eyre::ensure!(stored.status() == TaskStatus::Completed, "status changed");
    let sent = engine.notifier.sent();
    eyre::ensure!(
        sent.last() == Some(&RecordedNotification::NextTask(follow_up.id())),
        "unexpected notifications: {sent:?}"
    );
    Ok(())
}
