//! Notifier that records notifications instead of delivering them.

use async_trait::async_trait;
use std::sync::{Arc, RwLock};

use crate::task::{
    domain::{Task, TaskId},
    ports::{Notifier, NotifierError},
};

/// One notification captured by [`RecordingNotifier`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordedNotification {
    /// Upcoming deadline with minutes remaining.
    UpcomingDeadline {
        /// Task concerned.
        task_id: TaskId,
        /// Whole minutes until the deadline.
        minutes_until: i64,
    },
    /// Deadline missed.
    MissedDeadline(TaskId),
    /// Next task suggestion.
    NextTask(TaskId),
    /// Task completed.
    TaskCompleted(TaskId),
}

/// Thread-safe notifier that keeps every notification in memory.
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    sent: Arc<RwLock<Vec<RecordedNotification>>>,
}

impl RecordingNotifier {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns every notification recorded so far, in order.
    #[must_use]
    pub fn sent(&self) -> Vec<RecordedNotification> {
        self.sent
            .read()
            .map(|sent| sent.clone())
            .unwrap_or_default()
    }

    fn record(&self, notification: RecordedNotification) -> Result<(), NotifierError> {
        let mut sent = self
            .sent
            .write()
            .map_err(|err| NotifierError::Unavailable(err.to_string()))?;
        sent.push(notification);
        Ok(())
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify_upcoming_deadline(
        &self,
        task: &Task,
        minutes_until: i64,
    ) -> Result<(), NotifierError> {
        self.record(RecordedNotification::UpcomingDeadline {
            task_id: task.id(),
            minutes_until,
        })
    }

    async fn notify_missed_deadline(&self, task: &Task) -> Result<(), NotifierError> {
        self.record(RecordedNotification::MissedDeadline(task.id()))
    }

    async fn notify_next_task(&self, task: &Task) -> Result<(), NotifierError> {
        self.record(RecordedNotification::NextTask(task.id()))
    }

    async fn notify_task_completed(&self, task: &Task) -> Result<(), NotifierError> {
        self.record(RecordedNotification::TaskCompleted(task.id()))
    }
}
