//! Layered configuration loading using figment.
//!
//! Sources, lowest precedence first:
//! 1. Built-in defaults
//! 2. User-level `~/.config/flightdeck/config.toml`
//! 3. An explicitly supplied config file
//! 4. Environment variables (`FLIGHTDECK_*`, `__` separates sections, so
//!    `FLIGHTDECK_SCHEDULER__POLL_INTERVAL_SECS` sets
//!    `scheduler.poll_interval_secs`)

use std::time::Duration;

use camino::{Utf8Path, Utf8PathBuf};
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::task::services::PollerOptions;

const ENV_PREFIX: &str = "FLIGHTDECK_";
const APP_DIR: &str = "flightdeck";

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Figment extraction or merge failed.
    #[error("configuration error: {0}")]
    Figment(#[from] Box<figment::Error>),

    /// An explicitly requested config file does not exist.
    #[error("config file '{0}' does not exist")]
    MissingFile(Utf8PathBuf),

    /// A value is out of range.
    #[error("invalid configuration value for '{field}': {reason}")]
    InvalidValue {
        /// Dotted key of the offending value.
        field: &'static str,
        /// What is wrong with it.
        reason: String,
    },
}

/// Deadline poller settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Seconds between deadline polls.
    pub poll_interval_secs: u64,
    /// Allowed drift, in minutes, between a deadline and a reminder interval.
    pub match_tolerance_minutes: i64,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: 300,
            match_tolerance_minutes: 5,
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Directory holding the task index, settings blobs and audit logs.
    pub data_dir: Utf8PathBuf,
    /// Default tracing filter directive.
    pub log_level: String,
    /// Deadline poller settings.
    pub scheduler: SchedulerConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        let data_dir = dirs::data_dir()
            .and_then(|dir| Utf8PathBuf::from_path_buf(dir).ok())
            .map_or_else(|| Utf8PathBuf::from(".flightdeck"), |dir| dir.join(APP_DIR));
        Self {
            data_dir,
            log_level: "info".to_owned(),
            scheduler: SchedulerConfig::default(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from every source, optionally layering
    /// `config_file` above the user-level file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingFile`] when `config_file` does not
    /// exist, [`ConfigError::Figment`] when a source cannot be parsed, or
    /// [`ConfigError::InvalidValue`] when a value is out of range.
    pub fn load(config_file: Option<&Utf8Path>) -> Result<Self, ConfigError> {
        if let Some(path) = config_file {
            if !path.exists() {
                return Err(ConfigError::MissingFile(path.to_owned()));
            }
        }
        let config: Self = Self::figment(config_file).extract().map_err(Box::new)?;
        config.validate()?;
        Ok(config)
    }

    /// Builds the provider chain.
    #[must_use]
    pub fn figment(config_file: Option<&Utf8Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }
        if let Some(path) = config_file {
            figment = figment.merge(Toml::file(path.as_std_path()));
        }
        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Poller timing derived from [`SchedulerConfig`].
    #[must_use]
    pub const fn poller_options(&self) -> PollerOptions {
        PollerOptions {
            poll_interval: Duration::from_secs(self.scheduler.poll_interval_secs),
            match_tolerance_minutes: self.scheduler.match_tolerance_minutes,
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.scheduler.poll_interval_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "scheduler.poll_interval_secs",
                reason: "must be at least 1".to_owned(),
            });
        }
        if self.scheduler.match_tolerance_minutes < 0 {
            return Err(ConfigError::InvalidValue {
                field: "scheduler.match_tolerance_minutes",
                reason: "must not be negative".to_owned(),
            });
        }
        Ok(())
    }

    fn global_config_path() -> Option<std::path::PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR).join("config.toml"))
    }
}
