//! Partial field updates for the task aggregate.

use super::{Priority, TaskStatus, TaskType};
use chrono::{DateTime, Utc};

/// Partial update merged onto an existing task.
///
/// Fields left as `None` are not touched. Optional task fields use a nested
/// `Option`: `Some(None)` clears the value, `Some(Some(v))` replaces it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskPatch {
    /// Replacement title.
    pub title: Option<String>,
    /// Replacement description.
    pub description: Option<String>,
    /// Replacement priority.
    pub priority: Option<Priority>,
    /// Requested status; checked against the lifecycle.
    pub status: Option<TaskStatus>,
    /// Replacement classification tag.
    pub task_type: Option<TaskType>,
    /// Deadline set or clear.
    pub deadline: Option<Option<DateTime<Utc>>>,
    /// Issue tracker key set or clear.
    pub issue_key: Option<Option<String>>,
    /// Project reference set or clear.
    pub project_id: Option<Option<String>>,
    /// Planned session length set or clear.
    pub duration_minutes: Option<Option<u32>>,
}

impl TaskPatch {
    /// Creates an empty patch.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the replacement title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Sets the replacement description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the replacement priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Requests a status change.
    #[must_use]
    pub const fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Sets the replacement classification tag.
    #[must_use]
    pub const fn with_task_type(mut self, task_type: TaskType) -> Self {
        self.task_type = Some(task_type);
        self
    }

    /// Sets (`Some`) or clears (`None`) the deadline.
    #[must_use]
    pub const fn with_deadline(mut self, deadline: Option<DateTime<Utc>>) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Sets (`Some`) or clears (`None`) the issue tracker key.
    #[must_use]
    pub fn with_issue_key(mut self, issue_key: Option<String>) -> Self {
        self.issue_key = Some(issue_key);
        self
    }

    /// Sets (`Some`) or clears (`None`) the project reference.
    #[must_use]
    pub fn with_project_id(mut self, project_id: Option<String>) -> Self {
        self.project_id = Some(project_id);
        self
    }

    /// Sets (`Some`) or clears (`None`) the planned session length.
    #[must_use]
    pub const fn with_duration_minutes(mut self, duration_minutes: Option<u32>) -> Self {
        self.duration_minutes = Some(duration_minutes);
        self
    }

    /// Returns `true` when the patch changes nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}
