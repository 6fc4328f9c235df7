//! Periodic deadline checks and notification dispatch.

use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use mockable::Clock;
use thiserror::Error;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use super::{
    lifecycle::{TaskLifecycleError, TaskLifecycleService},
    outcome::MutationOutcome,
};
use crate::settings::{
    NotificationSettings, SentReminder, SentReminders, SettingsError, SettingsService,
};
use crate::task::{
    domain::{Task, TaskId, TaskStatus, minutes_until_deadline},
    ports::{AuditLog, Notifier, NotifierError, TaskStore},
};

/// Timing options for [`DeadlinePoller`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollerOptions {
    /// Time between ticks.
    pub poll_interval: Duration,
    /// How far `minutes_until` may drift from a reminder interval and still
    /// match it.
    pub match_tolerance_minutes: i64,
}

impl Default for PollerOptions {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(300),
            match_tolerance_minutes: 5,
        }
    }
}

/// Counts gathered during one poll.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Upcoming-deadline reminders dispatched.
    pub upcoming_notified: usize,
    /// Tasks newly marked missed.
    pub missed_marked: usize,
    /// Notifications the notifier failed to deliver.
    pub notifications_failed: usize,
}

/// Errors that abort a poll.
#[derive(Debug, Error)]
pub enum PollError {
    /// Task operations failed.
    #[error(transparent)]
    Lifecycle(#[from] TaskLifecycleError),
    /// Notification settings could not be read.
    #[error(transparent)]
    Settings(#[from] SettingsError),
}

/// Polls the task engine for approaching and passed deadlines.
///
/// Each reminder interval fires at most once per task and deadline. Delivered
/// reminders are kept in the [`SentReminders`] settings blob, so separate
/// pollers over the same store (one per `poll` invocation, say) never repeat
/// them, while a failed delivery is retried on the next poll. Passed
/// deadlines are reconciled by marking the task missed, after which later
/// polls skip it.
pub struct DeadlinePoller<S, A, C, N>
where
    S: TaskStore,
    A: AuditLog,
    C: Clock + Send + Sync,
    N: Notifier,
{
    lifecycle: TaskLifecycleService<S, A, C>,
    settings: SettingsService<S>,
    notifier: Arc<N>,
    options: PollerOptions,
}

impl<S, A, C, N> DeadlinePoller<S, A, C, N>
where
    S: TaskStore,
    A: AuditLog,
    C: Clock + Send + Sync,
    N: Notifier,
{
    /// Creates a poller.
    #[must_use]
    pub fn new(
        lifecycle: TaskLifecycleService<S, A, C>,
        settings: SettingsService<S>,
        notifier: Arc<N>,
        options: PollerOptions,
    ) -> Self {
        Self {
            lifecycle,
            settings,
            notifier,
            options,
        }
    }

    /// Runs one poll.
    ///
    /// # Errors
    ///
    /// Returns [`PollError`] when settings or tasks cannot be read or a
    /// missed task cannot be saved. Notification failures are counted in the
    /// report instead.
    pub async fn tick(&self) -> Result<TickReport, PollError> {
        let settings = self.settings.notifications().await?;
        let mut report = TickReport::default();

        if settings.enabled {
            self.remind_upcoming(&settings, &mut report).await?;
        } else {
            debug!("deadline reminders disabled");
        }
        self.reconcile_missed(settings.enabled, &mut report).await?;

        debug!(
            upcoming = report.upcoming_notified,
            missed = report.missed_marked,
            failed = report.notifications_failed,
            "deadline poll finished"
        );
        Ok(report)
    }

    /// Polls every [`PollerOptions::poll_interval`] until `shutdown` turns
    /// `true` or its sender is dropped.
    ///
    /// The first poll runs immediately. Failed polls are logged and the loop
    /// continues.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        let mut interval = tokio::time::interval(self.options.poll_interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        info!(
            interval_secs = self.options.poll_interval.as_secs(),
            "deadline poller started"
        );

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    if let Err(err) = self.tick().await {
                        warn!(error = %err, "deadline poll failed");
                    }
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }
        info!("deadline poller stopped");
    }

    /// Announces a completed task and suggests the next one.
    ///
    /// Returns the suggested task, if any.
    ///
    /// # Errors
    ///
    /// Returns [`PollError::Lifecycle`] when the queue cannot be read.
    /// Delivery failures are logged.
    pub async fn announce_completion(&self, task: &Task) -> Result<Option<Task>, PollError> {
        log_delivery(
            self.notifier.notify_task_completed(task).await,
            task.id(),
            "task completed",
        );
        self.suggest_next_task().await
    }

    /// Sends a "next task" notification for the head of the priority queue.
    ///
    /// Returns the suggested task, or `None` when the queue is empty.
    ///
    /// # Errors
    ///
    /// Returns [`PollError::Lifecycle`] when the queue cannot be read.
    pub async fn suggest_next_task(&self) -> Result<Option<Task>, PollError> {
        let Some(next) = self.lifecycle.next_task().await? else {
            debug!("queue empty, no next task to suggest");
            return Ok(None);
        };
        log_delivery(
            self.notifier.notify_next_task(&next).await,
            next.id(),
            "next task",
        );
        Ok(Some(next))
    }

    async fn remind_upcoming(
        &self,
        settings: &NotificationSettings,
        report: &mut TickReport,
    ) -> Result<(), PollError> {
        let now = self.lifecycle.now();
        let stored: SentReminders = self.settings.load().await?;
        let stored_count = stored.sent.len();
        let mut sent: BTreeSet<SentReminder> = stored
            .sent
            .into_iter()
            .filter(|reminder| reminder.deadline > now)
            .collect();
        let mut changed = sent.len() != stored_count;

        for &interval in &settings.intervals {
            let lookahead = TimeDelta::minutes(i64::from(interval));
            for task in self.lifecycle.upcoming_deadlines(lookahead).await? {
                let Some((reminder, minutes_until)) = self.reminder_due(&task, interval, now)
                else {
                    continue;
                };
                if sent.contains(&reminder) {
                    continue;
                }

                info!(task_id = %task.id(), minutes_until, interval, "deadline approaching");
                let result = self
                    .notifier
                    .notify_upcoming_deadline(&task, minutes_until)
                    .await;
                report.upcoming_notified += 1;
                if log_delivery(result, task.id(), "upcoming deadline") {
                    sent.insert(reminder);
                    changed = true;
                } else {
                    report.notifications_failed += 1;
                }
            }
        }

        if changed {
            self.settings
                .save(SentReminders {
                    sent: sent.into_iter().collect(),
                })
                .await?;
        }
        Ok(())
    }

    /// Returns the reminder for `interval` when `task` is within tolerance of
    /// it, with the whole minutes left.
    fn reminder_due(
        &self,
        task: &Task,
        interval: u32,
        now: DateTime<Utc>,
    ) -> Option<(SentReminder, i64)> {
        let deadline = task.deadline()?;
        let minutes_until = minutes_until_deadline(task, now)?;
        let drift = (minutes_until - i64::from(interval)).abs();
        (drift <= self.options.match_tolerance_minutes).then_some((
            SentReminder {
                task_id: task.id(),
                interval,
                deadline,
            },
            minutes_until,
        ))
    }

    async fn reconcile_missed(
        &self,
        notify: bool,
        report: &mut TickReport,
    ) -> Result<(), PollError> {
        for task in self.lifecycle.missed_deadlines().await? {
            if task.status() == TaskStatus::Missed {
                continue;
            }
            let missed = match self.lifecycle.mark_missed(task.id()).await? {
                MutationOutcome::Applied(missed) => missed,
                MutationOutcome::NotFound => {
                    debug!(task_id = %task.id(), "task vanished before it could be marked missed");
                    continue;
                }
                MutationOutcome::EditLocked | MutationOutcome::InvalidTransition { .. } => {
                    debug!(task_id = %task.id(), status = %task.status(), "task not marked missed");
                    continue;
                }
            };

            info!(task_id = %missed.id(), "deadline missed");
            report.missed_marked += 1;
            if notify {
                let result = self.notifier.notify_missed_deadline(&missed).await;
                if !log_delivery(result, missed.id(), "missed deadline") {
                    report.notifications_failed += 1;
                }
            }
        }
        Ok(())
    }
}

/// Logs a delivery failure and returns whether delivery succeeded.
fn log_delivery(result: Result<(), NotifierError>, task_id: TaskId, kind: &str) -> bool {
    match result {
        Ok(()) => true,
        Err(err) => {
            warn!(%task_id, kind, error = %err, "notification delivery failed");
            false
        }
    }
}
