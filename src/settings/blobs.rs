//! Typed settings blobs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

use super::SettingsError;
use crate::task::domain::TaskId;

/// A settings document persisted under a fixed blob name.
pub trait SettingsBlob: Serialize + DeserializeOwned + Default + Send + Sync {
    /// Name the blob is stored under.
    const NAME: &'static str;

    /// Validates and canonicalizes the value before it is saved.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Invalid`] when the value cannot be stored.
    fn normalize(self) -> Result<Self, SettingsError> {
        Ok(self)
    }
}

/// Deadline reminder preferences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationSettings {
    /// Whether deadline notifications are sent at all.
    pub enabled: bool,
    /// Minutes before a deadline at which to remind.
    pub intervals: Vec<u32>,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            intervals: vec![30, 60, 1440],
        }
    }
}

impl SettingsBlob for NotificationSettings {
    const NAME: &'static str = "notifications";

    fn normalize(mut self) -> Result<Self, SettingsError> {
        if self.intervals.contains(&0) {
            return Err(SettingsError::Invalid {
                name: Self::NAME,
                reason: "reminder intervals must be positive".to_owned(),
            });
        }
        self.intervals.sort_unstable();
        self.intervals.dedup();
        Ok(self)
    }
}

/// Optional behaviour toggles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureFlags {
    /// Show the start-up splash.
    pub enable_splash: bool,
    /// Show contextual tooltips.
    pub enable_tooltips: bool,
    /// Produce periodic email summaries.
    pub enable_email_summaries: bool,
}

impl Default for FeatureFlags {
    fn default() -> Self {
        Self {
            enable_splash: true,
            enable_tooltips: true,
            enable_email_summaries: true,
        }
    }
}

impl SettingsBlob for FeatureFlags {
    const NAME: &'static str = "feature-flags";
}

/// One delivered deadline reminder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SentReminder {
    /// Task the reminder was about.
    pub task_id: TaskId,
    /// Reminder interval in minutes.
    pub interval: u32,
    /// Deadline the reminder was computed against.
    pub deadline: DateTime<Utc>,
}

/// Reminders already delivered, shared by every poller over one store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SentReminders {
    /// Delivered reminders whose deadline has not yet passed.
    pub sent: Vec<SentReminder>,
}

impl SettingsBlob for SentReminders {
    const NAME: &'static str = "sent-reminders";

    fn normalize(mut self) -> Result<Self, SettingsError> {
        self.sent.sort_unstable();
        self.sent.dedup();
        Ok(self)
    }
}
