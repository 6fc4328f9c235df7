//! Store port for the task index and named settings blobs.

use crate::task::domain::{Task, TaskId};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;
use thiserror::Error;

/// Result type for task store operations.
pub type TaskStoreResult<T> = Result<T, TaskStoreError>;

/// Whole set of persisted tasks keyed by identifier.
///
/// A store that has never been written yields [`TaskIndex::default`], which
/// carries no timestamp until the first save stamps one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskIndex {
    /// Tasks keyed by identifier.
    pub tasks: BTreeMap<TaskId, Task>,
    /// When the index was last written.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<DateTime<Utc>>,
}

impl TaskIndex {
    /// Returns the tasks in index iteration order.
    #[must_use]
    pub fn to_vec(&self) -> Vec<Task> {
        self.tasks.values().cloned().collect()
    }
}

/// Durable storage contract.
///
/// Implementations treat each call as atomic: a failed `save_index` leaves
/// the previously saved index intact.
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Loads the whole task index.
    ///
    /// A store that has never been written returns an empty index.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::Corrupt`] when persisted data cannot be
    /// decoded or [`TaskStoreError::Persistence`] on I/O failure.
    async fn load_index(&self) -> TaskStoreResult<TaskIndex>;

    /// Replaces the whole task index.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::Persistence`] when the write fails.
    async fn save_index(&self, index: &TaskIndex) -> TaskStoreResult<()>;

    /// Loads a named settings blob.
    ///
    /// Returns `None` when the blob has never been saved.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::InvalidConfigName`] for names that are not
    /// plain identifiers, or a corruption/persistence error.
    async fn load_config(&self, name: &str) -> TaskStoreResult<Option<Value>>;

    /// Saves a named settings blob, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::InvalidConfigName`] for names that are not
    /// plain identifiers, or [`TaskStoreError::Persistence`] on failure.
    async fn save_config(&self, name: &str, value: &Value) -> TaskStoreResult<()>;
}

/// Errors returned by task store implementations.
#[derive(Debug, Clone, Error)]
pub enum TaskStoreError {
    /// Persisted data exists but cannot be decoded.
    #[error("corrupt store data in {location}: {reason}")]
    Corrupt {
        /// Index or blob that failed to decode.
        location: String,
        /// Decoder message.
        reason: String,
    },

    /// A settings blob name contains characters other than ASCII
    /// alphanumerics, `-` and `_`.
    #[error("invalid settings name '{0}'")]
    InvalidConfigName(String),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl TaskStoreError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}

/// Checks that a settings blob name is a plain identifier.
///
/// # Errors
///
/// Returns [`TaskStoreError::InvalidConfigName`] for empty names or names
/// with characters other than ASCII alphanumerics, `-` and `_`.
pub fn validate_config_name(name: &str) -> TaskStoreResult<()> {
    let is_valid = !name.is_empty()
        && name
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || ch == '-' || ch == '_');
    if is_valid {
        Ok(())
    } else {
        Err(TaskStoreError::InvalidConfigName(name.to_owned()))
    }
}
