//! Persisted user settings.
//!
//! Settings live in named JSON blobs next to the task index. Each blob is a
//! [`SettingsBlob`] with its own defaults, so a fresh store behaves as if the
//! defaults had been saved.

mod blobs;
mod service;


pub use blobs::{FeatureFlags, NotificationSettings, SentReminder, SentReminders, SettingsBlob};
pub use service::SettingsService;

use crate::task::ports::TaskStoreError;
use thiserror::Error;

/// Errors raised while loading or saving settings.
#[derive(Debug, Clone, Error)]
pub enum SettingsError {
    /// The value failed validation.
    #[error("invalid {name} settings: {reason}")]
    Invalid {
        /// Blob name.
        name: &'static str,
        /// Validation message.
        reason: String,
    },
    /// The value could not be serialized.
    #[error("failed to encode settings: {0}")]
    Encoding(String),
    /// The store failed.
    #[error(transparent)]
    Store(#[from] TaskStoreError),
}
