//! Loading and saving settings blobs through the task store.

use std::sync::Arc;

use tracing::{debug, warn};

use super::{FeatureFlags, NotificationSettings, SettingsBlob, SettingsError};
use crate::task::ports::TaskStore;

/// Reads and writes typed settings blobs.
pub struct SettingsService<S>
where
    S: TaskStore,
{
    store: Arc<S>,
}

impl<S> Clone for SettingsService<S>
where
    S: TaskStore,
{
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S> SettingsService<S>
where
    S: TaskStore,
{
    /// Creates a settings service over `store`.
    #[must_use]
    pub const fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Loads blob `T`.
    ///
    /// Falls back to `T::default()` when the blob was never saved or no
    /// longer matches the expected shape.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Store`] when the store cannot be read.
    pub async fn load<T: SettingsBlob>(&self) -> Result<T, SettingsError> {
        let Some(raw) = self.store.load_config(T::NAME).await? else {
            debug!(name = T::NAME, "settings blob absent, using defaults");
            return Ok(T::default());
        };
        match serde_json::from_value(raw) {
            Ok(value) => Ok(value),
            Err(err) => {
                warn!(name = T::NAME, error = %err, "settings blob unreadable, using defaults");
                Ok(T::default())
            }
        }
    }

    /// Validates and saves blob `T`, returning the stored form.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Invalid`] when validation fails,
    /// [`SettingsError::Encoding`] when serialization fails, or
    /// [`SettingsError::Store`] when the write fails.
    pub async fn save<T: SettingsBlob>(&self, value: T) -> Result<T, SettingsError> {
        let normalized = value.normalize()?;
        let raw = serde_json::to_value(&normalized)
            .map_err(|err| SettingsError::Encoding(err.to_string()))?;
        self.store.save_config(T::NAME, &raw).await?;
        debug!(name = T::NAME, "settings blob saved");
        Ok(normalized)
    }

    /// Loads the notification settings.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Store`] when the store cannot be read.
    pub async fn notifications(&self) -> Result<NotificationSettings, SettingsError> {
        self.load().await
    }

    /// Loads the feature flags.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Store`] when the store cannot be read.
    pub async fn feature_flags(&self) -> Result<FeatureFlags, SettingsError> {
        self.load().await
    }
}
