//! Audit trail records for task mutations.

use super::{Task, TaskId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Kind of mutation recorded in the audit trail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    /// A task was created.
    Created,
    /// A task was updated.
    Updated,
    /// A task was completed.
    Completed,
    /// A task was marked as missed.
    Missed,
    /// A task was deleted.
    Deleted,
}

impl AuditAction {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Updated => "updated",
            Self::Completed => "completed",
            Self::Missed => "missed",
            Self::Deleted => "deleted",
        }
    }
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One append-only audit record.
///
/// Snapshots are the serialized task as stored in the index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditEntry {
    /// When the mutation happened.
    pub timestamp: DateTime<Utc>,
    /// Task the mutation applied to.
    pub task_id: TaskId,
    /// Kind of mutation.
    pub action: AuditAction,
    /// Task snapshot before the mutation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_value: Option<Value>,
    /// Task snapshot after the mutation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_value: Option<Value>,
}

impl AuditEntry {
    /// Creates an entry without snapshots.
    #[must_use]
    pub const fn new(timestamp: DateTime<Utc>, task_id: TaskId, action: AuditAction) -> Self {
        Self {
            timestamp,
            task_id,
            action,
            previous_value: None,
            new_value: None,
        }
    }

    /// Records the state before the mutation.
    #[must_use]
    pub fn with_previous(mut self, task: &Task) -> Self {
        self.previous_value = snapshot(task);
        self
    }

    /// Records the state after the mutation.
    #[must_use]
    pub fn with_new(mut self, task: &Task) -> Self {
        self.new_value = snapshot(task);
        self
    }
}

fn snapshot(task: &Task) -> Option<Value> {
    serde_json::to_value(task).ok()
}
