//! In-memory integration tests for task lifecycle operations.

use chrono::TimeDelta;
use flightdeck::task::{
    domain::{AuditAction, PageRequest, Priority, Task, TaskFilter, TaskPatch, TaskStatus},
    services::MutationOutcome,
};
use rstest::rstest;

use super::helpers::{Engine, engine};

fn titles(tasks: &[Task]) -> Vec<&str> {
    tasks.iter().map(Task::title).collect()
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn queue_reflects_priority_then_deadline(engine: Engine) -> eyre::Result<()> {
    engine.add("Someday", Priority::High, None).await?;
    engine
        .add("Due soon", Priority::Low, Some(TimeDelta::minutes(10)))
        .await?;
    engine.add("Urgent", Priority::Higher, None).await?;
    engine
        .add("Due later", Priority::High, Some(TimeDelta::hours(2)))
        .await?;

    let queue = engine.service.priority_queue().await?;

    eyre::ensure!(
        titles(&queue) == vec!["Urgent", "Due later", "Someday", "Due soon"],
        "unexpected queue order: {:?}",
        titles(&queue)
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn completed_task_leaves_queue_and_locks_after_a_day(engine: Engine) -> eyre::Result<()> {
    let task = engine.add("Tax return", Priority::Higher, None).await?;
    let started = engine.service.start(task.id()).await?;
    eyre::ensure!(started.is_applied(), "start should apply");
    let completed = engine.service.complete(task.id()).await?;
    eyre::ensure!(completed.is_applied(), "completion should apply");

    let queue = engine.service.priority_queue().await?;
    eyre::ensure!(queue.is_empty(), "completed task must leave the queue");

    engine.clock.advance(TimeDelta::hours(25));
    let edit = engine
        .service
        .update(task.id(), TaskPatch::new().with_title("Amended"))
        .await?;
    let delete = engine.service.delete(task.id()).await?;

    eyre::ensure!(edit == MutationOutcome::EditLocked, "edit got {edit:?}");
    eyre::ensure!(delete == MutationOutcome::EditLocked, "delete got {delete:?}");
    let stored = engine
        .service
        .find_by_id(task.id())
        .await?
        .ok_or_else(|| eyre::eyre!("locked task must remain stored"))?;
    eyre::ensure!(stored.title() == "Tax return", "locked task was modified");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn audit_trail_follows_every_mutation(engine: Engine) -> eyre::Result<()> {
    let task = engine.add("Garden", Priority::Low, None).await?;
    let outcomes = [
        engine
            .service
            .update(task.id(), TaskPatch::new().with_priority(Priority::High))
            .await?,
        engine.service.complete(task.id()).await?,
        engine.service.delete(task.id()).await?,
    ];
    eyre::ensure!(
        outcomes.iter().all(MutationOutcome::is_applied),
        "every mutation should apply: {outcomes:?}"
    );

    let actions = engine.audit.actions_for(task.id());

    eyre::ensure!(
        actions
            == vec![
                AuditAction::Created,
                AuditAction::Updated,
                AuditAction::Updated,
                AuditAction::Completed,
                AuditAction::Deleted,
            ],
        "unexpected audit trail: {actions:?}"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn paging_and_search_see_the_same_task_set(engine: Engine) -> eyre::Result<()> {
    for index in 0..5 {
        engine
            .add(&format!("Report {index}"), Priority::Low, None)
            .await?;
    }
    engine.add("Groceries", Priority::High, None).await?;

    let reports = engine.service.search("report").await?;
    let first = engine
        .service
        .page(&TaskFilter::new().with_query("report"), PageRequest::new(0, 2))
        .await?;
    let last = engine
        .service
        .page(&TaskFilter::new().with_query("report"), PageRequest::new(4, 2))
        .await?;
    let pending = engine.service.by_status(TaskStatus::Pending).await?;

    eyre::ensure!(reports.len() == 5, "expected five reports");
    eyre::ensure!(first.total == 5 && first.items.len() == 2, "bad first page");
    eyre::ensure!(last.total == 5 && last.items.len() == 1, "bad last page");
    eyre::ensure!(pending.len() == 6, "all tasks start pending");
    Ok(())
}
