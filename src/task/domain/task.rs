//! Task aggregate root and related task lifecycle types.

use super::{ParseTaskStatusError, TaskDomainError, TaskId, TaskPatch};
use chrono::{DateTime, TimeDelta, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Hours after completion during which a completed task may still be edited
/// or deleted.
pub const EDIT_LOCK_HOURS: i64 = 24;

/// Task lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Task has been created but work has not started.
    Pending,
    /// Task is being worked on.
    InProgress,
    /// Task has been completed.
    Completed,
    /// Task deadline passed before completion.
    Missed,
}

impl TaskStatus {
    /// All statuses in lifecycle order.
    pub const ALL: [Self; 4] = [
        Self::Pending,
        Self::InProgress,
        Self::Completed,
        Self::Missed,
    ];

    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Missed => "missed",
        }
    }

    /// Returns `true` when this status admits no transition to another
    /// status.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Missed)
    }

    /// Returns `true` for statuses that take part in the priority queue.
    #[must_use]
    pub const fn is_active(self) -> bool {
        matches!(self, Self::Pending | Self::InProgress)
    }

    /// Returns whether the lifecycle permits moving from `self` to `target`.
    ///
    /// Re-applying the current status is always permitted.
    #[must_use]
    pub const fn can_transition_to(self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Pending, _)
                | (Self::InProgress, Self::InProgress | Self::Completed | Self::Missed)
                | (Self::Completed, Self::Completed)
                | (Self::Missed, Self::Missed)
        )
    }
}

impl TryFrom<&str> for TaskStatus {
    type Error = ParseTaskStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "pending" => Ok(Self::Pending),
            "in_progress" | "in-progress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            "missed" => Ok(Self::Missed),
            _ => Err(ParseTaskStatusError(value.to_owned())),
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Task urgency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    /// Least urgent.
    Low,
    /// Urgent.
    High,
    /// Most urgent.
    Higher,
}

impl Priority {
    /// Numeric weight used only for ordering.
    #[must_use]
    pub const fn weight(self) -> u8 {
        match self {
            Self::Low => 1,
            Self::High => 2,
            Self::Higher => 3,
        }
    }

    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::High => "high",
            Self::Higher => "higher",
        }
    }
}

impl TryFrom<&str> for Priority {
    type Error = TaskDomainError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "low" => Ok(Self::Low),
            "high" => Ok(Self::High),
            "higher" => Ok(Self::Higher),
            _ => Err(TaskDomainError::InvalidPriority(value.to_owned())),
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classification tag carried with each task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskType {
    /// Recurring daily work.
    Daily,
    /// Work bound to a deadline.
    Deadline,
}

impl TaskType {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Deadline => "deadline",
        }
    }
}

impl TryFrom<&str> for TaskType {
    type Error = TaskDomainError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "daily" => Ok(Self::Daily),
            "deadline" => Ok(Self::Deadline),
            _ => Err(TaskDomainError::InvalidTaskType(value.to_owned())),
        }
    }
}

impl fmt::Display for TaskType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validated title and description of a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDetails {
    title: String,
    description: String,
}

impl TaskDetails {
    /// Creates validated task details.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyTitle`] or
    /// [`TaskDomainError::EmptyDescription`] when either value is blank.
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Result<Self, TaskDomainError> {
        Ok(Self {
            title: required_text(title.into(), TaskDomainError::EmptyTitle)?,
            description: required_text(description.into(), TaskDomainError::EmptyDescription)?,
        })
    }

    /// Returns the title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }
}

/// Parameter object for creating a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    /// Validated title and description.
    pub details: TaskDetails,
    /// Initial priority.
    pub priority: Priority,
    /// Classification tag.
    pub task_type: TaskType,
    /// Optional deadline.
    pub deadline: Option<DateTime<Utc>>,
    /// Optional issue tracker key.
    pub issue_key: Option<String>,
    /// Optional project reference.
    pub project_id: Option<String>,
    /// Optional planned session length.
    pub duration_minutes: Option<u32>,
}

/// Task aggregate root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    id: TaskId,
    title: String,
    description: String,
    priority: Priority,
    status: TaskStatus,
    #[serde(rename = "type")]
    task_type: TaskType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    deadline: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    started_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    completed_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    updated_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    issue_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    project_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    duration_minutes: Option<u32>,
}

/// Parameter object for reconstructing a persisted task aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTaskData {
    /// Persisted task identifier.
    pub id: TaskId,
    /// Persisted title.
    pub title: String,
    /// Persisted description.
    pub description: String,
    /// Persisted priority.
    pub priority: Priority,
    /// Persisted lifecycle status.
    pub status: TaskStatus,
    /// Persisted classification tag.
    pub task_type: TaskType,
    /// Persisted deadline, if any.
    pub deadline: Option<DateTime<Utc>>,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted start timestamp, if any.
    pub started_at: Option<DateTime<Utc>>,
    /// Persisted completion timestamp, if any.
    pub completed_at: Option<DateTime<Utc>>,
    /// Persisted latest mutation timestamp, if any.
    pub updated_at: Option<DateTime<Utc>>,
    /// Persisted issue tracker key, if any.
    pub issue_key: Option<String>,
    /// Persisted project reference, if any.
    pub project_id: Option<String>,
    /// Persisted planned session length, if any.
    pub duration_minutes: Option<u32>,
}

impl Task {
    /// Creates a new pending task.
    #[must_use]
    pub fn new(new_task: NewTask, clock: &impl Clock) -> Self {
        let NewTask {
            details,
            priority,
            task_type,
            deadline,
            issue_key,
            project_id,
            duration_minutes,
        } = new_task;

        Self {
            id: TaskId::new(),
            title: details.title,
            description: details.description,
            priority,
            status: TaskStatus::Pending,
            task_type,
            deadline,
            created_at: clock.utc(),
            started_at: None,
            completed_at: None,
            updated_at: None,
            issue_key,
            project_id,
            duration_minutes,
        }
    }

    /// Reconstructs a task from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedTaskData) -> Self {
        Self {
            id: data.id,
            title: data.title,
            description: data.description,
            priority: data.priority,
            status: data.status,
            task_type: data.task_type,
            deadline: data.deadline,
            created_at: data.created_at,
            started_at: data.started_at,
            completed_at: data.completed_at,
            updated_at: data.updated_at,
            issue_key: data.issue_key,
            project_id: data.project_id,
            duration_minutes: data.duration_minutes,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the priority.
    #[must_use]
    pub const fn priority(&self) -> Priority {
        self.priority
    }

    /// Returns the lifecycle status.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns the classification tag.
    #[must_use]
    pub const fn task_type(&self) -> TaskType {
        self.task_type
    }

    /// Returns the deadline, if any.
    #[must_use]
    pub const fn deadline(&self) -> Option<DateTime<Utc>> {
        self.deadline
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns when work started, if it has.
    #[must_use]
    pub const fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    /// Returns when the task was completed, if it was.
    #[must_use]
    pub const fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    /// Returns the latest mutation timestamp, if the task was ever mutated.
    #[must_use]
    pub const fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }

    /// Returns the issue tracker key, if any.
    #[must_use]
    pub fn issue_key(&self) -> Option<&str> {
        self.issue_key.as_deref()
    }

    /// Returns the project reference, if any.
    #[must_use]
    pub fn project_id(&self) -> Option<&str> {
        self.project_id.as_deref()
    }

    /// Returns the planned session length, if any.
    #[must_use]
    pub const fn duration_minutes(&self) -> Option<u32> {
        self.duration_minutes
    }

    /// Returns `true` when the task was completed more than
    /// [`EDIT_LOCK_HOURS`] before `now` and may no longer be edited or
    /// deleted.
    #[must_use]
    pub fn is_edit_locked(&self, now: DateTime<Utc>) -> bool {
        if self.status != TaskStatus::Completed {
            return false;
        }
        self.completed_at
            .is_some_and(|completed_at| completed_at < now - TimeDelta::hours(EDIT_LOCK_HOURS))
    }

    /// Moves the task to `target`, stamping lifecycle timestamps.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidStatusTransition`] when the
    /// lifecycle does not permit the move; the task is left unchanged.
    pub fn transition_to(
        &mut self,
        target: TaskStatus,
        now: DateTime<Utc>,
    ) -> Result<(), TaskDomainError> {
        self.ensure_transition(target)?;
        self.enter(target, now);
        self.touch(now);
        Ok(())
    }

    /// Merges a partial update onto the task.
    ///
    /// The patch is validated as a whole before any field changes, so a
    /// rejected patch leaves the task untouched.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError`] when a replacement title or description
    /// is blank or the requested status change is not permitted.
    pub fn apply_patch(
        &mut self,
        patch: TaskPatch,
        now: DateTime<Utc>,
    ) -> Result<(), TaskDomainError> {
        let TaskPatch {
            title,
            description,
            priority,
            status,
            task_type,
            deadline,
            issue_key,
            project_id,
            duration_minutes,
        } = patch;

        let new_title = title
            .map(|value| required_text(value, TaskDomainError::EmptyTitle))
            .transpose()?;
        let new_description = description
            .map(|value| required_text(value, TaskDomainError::EmptyDescription))
            .transpose()?;
        if let Some(target) = status {
            self.ensure_transition(target)?;
        }

        if let Some(value) = new_title {
            self.title = value;
        }
        if let Some(value) = new_description {
            self.description = value;
        }
        if let Some(value) = priority {
            self.priority = value;
        }
        if let Some(value) = task_type {
            self.task_type = value;
        }
        if let Some(value) = deadline {
            self.deadline = value;
        }
        if let Some(value) = issue_key {
            self.issue_key = value;
        }
        if let Some(value) = project_id {
            self.project_id = value;
        }
        if let Some(value) = duration_minutes {
            self.duration_minutes = value;
        }
        if let Some(target) = status {
            self.enter(target, now);
        }
        self.touch(now);
        Ok(())
    }

    fn ensure_transition(&self, target: TaskStatus) -> Result<(), TaskDomainError> {
        if self.status.can_transition_to(target) {
            return Ok(());
        }
        Err(TaskDomainError::InvalidStatusTransition {
            task_id: self.id,
            from: self.status,
            to: target,
        })
    }

    fn enter(&mut self, target: TaskStatus, now: DateTime<Utc>) {
        match target {
            TaskStatus::InProgress if self.started_at.is_none() => self.started_at = Some(now),
            TaskStatus::Completed => self.completed_at = Some(now),
            _ => {}
        }
        self.status = target;
    }

    fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = Some(now);
    }
}

/// Trims `value`, returning `empty_error` when nothing remains.
fn required_text(value: String, empty_error: TaskDomainError) -> Result<String, TaskDomainError> {
    let normalized = value.trim();
    if normalized.is_empty() {
        return Err(empty_error);
    }
    Ok(normalized.to_owned())
}
