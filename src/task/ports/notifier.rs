//! Notifier port for user-visible task notifications.

use crate::task::domain::Task;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Delivers task notifications.
///
/// Callers treat every method as fire-and-forget: a failure is logged and
/// never undoes the task mutation that triggered it.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Notifier: Send + Sync {
    /// A deadline is `minutes_until` minutes away.
    async fn notify_upcoming_deadline(
        &self,
        task: &Task,
        minutes_until: i64,
    ) -> Result<(), NotifierError>;

    /// A deadline has passed without completion.
    async fn notify_missed_deadline(&self, task: &Task) -> Result<(), NotifierError>;

    /// Suggests the task at the head of the priority queue.
    async fn notify_next_task(&self, task: &Task) -> Result<(), NotifierError>;

    /// A task was completed.
    async fn notify_task_completed(&self, task: &Task) -> Result<(), NotifierError>;
}

/// Errors returned by notifier implementations.
#[derive(Debug, Clone, Error)]
pub enum NotifierError {
    /// The notification channel is not available.
    #[error("notification channel unavailable: {0}")]
    Unavailable(String),

    /// Delivery failed.
    #[error("notification delivery failed: {0}")]
    Delivery(Arc<dyn std::error::Error + Send + Sync>),
}

impl NotifierError {
    /// Wraps a delivery error.
    pub fn delivery(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Delivery(Arc::new(err))
    }
}
