//! Notifier that emits notifications as structured log events.

use async_trait::async_trait;

use crate::task::{
    domain::Task,
    ports::{Notifier, NotifierError},
};

/// Rendered notification text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationMessage {
    /// Short headline.
    pub title: String,
    /// Body text.
    pub body: String,
}

impl NotificationMessage {
    /// Message for a deadline `minutes_until` minutes away.
    #[must_use]
    pub fn upcoming_deadline(task: &Task, minutes_until: i64) -> Self {
        Self {
            title: format!("Deadline Approaching: {}", task.title()),
            body: format!(
                "Task \"{}\" is due in {minutes_until} minutes!",
                task.title()
            ),
        }
    }

    /// Message for a deadline that passed.
    #[must_use]
    pub fn missed_deadline(task: &Task) -> Self {
        Self {
            title: format!("Missed Deadline: {}", task.title()),
            body: format!("Task \"{}\" has passed its deadline.", task.title()),
        }
    }

    /// Message suggesting the next task to work on.
    #[must_use]
    pub fn next_task(task: &Task) -> Self {
        let deadline = task
            .deadline()
            .map(|deadline| format!(" | Deadline: {}", deadline.format("%Y-%m-%d %H:%M UTC")))
            .unwrap_or_default();
        Self {
            title: format!("Next Task: {}", task.title()),
            body: format!(
                "Priority: {}{deadline}",
                task.priority().as_str().to_uppercase()
            ),
        }
    }

    /// Message for a completed task.
    #[must_use]
    pub fn task_completed(task: &Task) -> Self {
        Self {
            title: format!("Task Completed: {}", task.title()),
            body: "Great job! Task marked as completed.".to_owned(),
        }
    }
}

/// Notifier that writes every notification to the `flightdeck::notify`
/// tracing target at `INFO` level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl TracingNotifier {
    fn emit(task: &Task, message: &NotificationMessage) {
        tracing::info!(
            target: "flightdeck::notify",
            task_id = %task.id(),
            title = %message.title,
            "{}",
            message.body
        );
    }
}

#[async_trait]
impl Notifier for TracingNotifier {
    async fn notify_upcoming_deadline(
        &self,
        task: &Task,
        minutes_until: i64,
    ) -> Result<(), NotifierError> {
        Self::emit(
            task,
            &NotificationMessage::upcoming_deadline(task, minutes_until),
        );
        Ok(())
    }

    async fn notify_missed_deadline(&self, task: &Task) -> Result<(), NotifierError> {
        Self::emit(task, &NotificationMessage::missed_deadline(task));
        Ok(())
    }

    async fn notify_next_task(&self, task: &Task) -> Result<(), NotifierError> {
        Self::emit(task, &NotificationMessage::next_task(task));
        Ok(())
    }

    async fn notify_task_completed(&self, task: &Task) -> Result<(), NotifierError> {
        Self::emit(task, &NotificationMessage::task_completed(task));
        Ok(())
    }
}
