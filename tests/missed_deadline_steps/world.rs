//! Shared world state for missed deadline BDD scenarios.

use std::sync::Arc;

use chrono::{TimeZone, Utc};
use flightdeck::{
    settings::SettingsService,
    task::{
        adapters::{
            ManualClock,
            memory::{InMemoryAuditLog, InMemoryTaskStore, RecordingNotifier},
        },
        domain::Task,
        services::{DeadlinePoller, PollerOptions, TaskLifecycleService},
    },
};
use rstest::fixture;

/// Lifecycle service type used by the BDD world.
pub type TestTaskService = TaskLifecycleService<InMemoryTaskStore, InMemoryAuditLog, ManualClock>;

/// Poller type used by the BDD world.
pub type TestPoller =
    DeadlinePoller<InMemoryTaskStore, InMemoryAuditLog, ManualClock, RecordingNotifier>;

/// Scenario world for missed deadline behaviour tests.
pub struct DeadlineWorld {
    pub clock: ManualClock,
    pub service: TestTaskService,
    pub settings: SettingsService<InMemoryTaskStore>,
    pub notifier: RecordingNotifier,
    pub poller: TestPoller,
    pub task: Option<Task>,
}

impl DeadlineWorld {
    /// Creates a world with an empty store and a recording notifier.
    #[must_use]
    pub fn new() -> Self {
        let start = Utc
            .with_ymd_and_hms(2026, 11, 2, 13, 0, 0)
            .single()
            .unwrap_or_default();
        let store = Arc::new(InMemoryTaskStore::new());
        let clock = ManualClock::new(start);
        let notifier = RecordingNotifier::new();
        let service = TaskLifecycleService::new(
            Arc::clone(&store),
            Arc::new(InMemoryAuditLog::new()),
            Arc::new(clock.clone()),
        );
        let poller = DeadlinePoller::new(
            service.clone(),
            SettingsService::new(Arc::clone(&store)),
            Arc::new(notifier.clone()),
            PollerOptions::default(),
        );

        Self {
            clock,
            service,
            settings: SettingsService::new(store),
            notifier,
            poller,
            task: None,
        }
    }

    /// Returns the task created by the scenario.
    ///
    /// # Errors
    ///
    /// Returns an error when no task has been created yet.
    pub fn task(&self) -> Result<&Task, eyre::Report> {
        self.task
            .as_ref()
            .ok_or_else(|| eyre::eyre!("missing created task in scenario world"))
    }
}

impl Default for DeadlineWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> DeadlineWorld {
    DeadlineWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
