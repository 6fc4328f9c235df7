//! Summaries generated from live service state.

use std::sync::Arc;

use chrono::TimeDelta;
use flightdeck::{
    summary::{SummaryKind, SummaryService},
    task::domain::Priority,
};
use rstest::rstest;

use super::helpers::{Engine, engine};

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn daily_summary_counts_today_and_lists_focus(engine: Engine) -> eyre::Result<()> {
    let done = engine.add("Morning run", Priority::Low, None).await?;
    engine
        .add("Ship release", Priority::Higher, Some(TimeDelta::hours(6)))
        .await?;
    engine
        .add("Overdue bill", Priority::High, Some(TimeDelta::hours(-1)))
        .await?;
    let completed = engine.service.complete(done.id()).await?;
    eyre::ensure!(completed.is_applied(), "completion should apply");

    let summaries = SummaryService::new(Arc::new(engine.clock.clone()));
    let report = summaries.generate(SummaryKind::Daily, &engine.service.list_all().await?)?;

    eyre::ensure!(report.metrics.created == 3, "created: {:?}", report.metrics);
    eyre::ensure!(report.metrics.completed == 1, "completed: {:?}", report.metrics);
    eyre::ensure!(report.metrics.overdue == 1, "overdue: {:?}", report.metrics);
    eyre::ensure!(
        report
            .plain
            .starts_with("Daily Task Summary - Mon Sep 07 2026"),
        "unexpected heading: {}",
        report.plain
    );
    eyre::ensure!(
        report.plain.contains("- [higher] Ship release (Due 2026-09-07)"),
        "focus list missing: {}",
        report.plain
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn weekly_summary_lists_recent_completions(engine: Engine) -> eyre::Result<()> {
    let first = engine.add("Plan sprint", Priority::High, None).await?;
    let second = engine.add("Review notes", Priority::Low, None).await?;
    for id in [first.id(), second.id()] {
        let completed = engine.service.complete(id).await?;
        eyre::ensure!(completed.is_applied(), "completion should apply");
        engine.clock.advance(TimeDelta::hours(1));
    }
    engine.clock.advance(TimeDelta::days(2));

    let summaries = SummaryService::new(Arc::new(engine.clock.clone()));
    let report = summaries.generate(SummaryKind::Weekly, &engine.service.list_all().await?)?;

    eyre::ensure!(
        report.plain.ends_with("Recently Completed:\n- Review notes\n- Plan sprint"),
        "unexpected weekly summary: {}",
        report.plain
    );
    eyre::ensure!(
        report.metrics.listed == vec![second.id(), first.id()],
        "listed order should be newest first"
    );
    Ok(())
}
