//! Shared world state for edit lock BDD scenarios.

use std::sync::Arc;

use chrono::{TimeZone, Utc};
use flightdeck::task::{
    adapters::{
        ManualClock,
        memory::{InMemoryAuditLog, InMemoryTaskStore},
    },
    domain::Task,
    services::{MutationOutcome, TaskLifecycleService},
};
use rstest::fixture;

/// Service type used by the BDD world.
pub type TestTaskService = TaskLifecycleService<InMemoryTaskStore, InMemoryAuditLog, ManualClock>;

/// Scenario world for edit lock behaviour tests.
pub struct EditLockWorld {
    pub clock: ManualClock,
    pub service: TestTaskService,
    pub task: Option<Task>,
    pub last_outcome: Option<MutationOutcome<Task>>,
}

impl EditLockWorld {
    /// Creates a world whose clock starts at a fixed instant.
    #[must_use]
    pub fn new() -> Self {
        let start = Utc
            .with_ymd_and_hms(2026, 4, 20, 17, 0, 0)
            .single()
            .unwrap_or_default();
        let clock = ManualClock::new(start);
        let service = TaskLifecycleService::new(
            Arc::new(InMemoryTaskStore::new()),
            Arc::new(InMemoryAuditLog::new()),
            Arc::new(clock.clone()),
        );

        Self {
            clock,
            service,
            task: None,
            last_outcome: None,
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

impl Default for EditLockWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> EditLockWorld {
    EditLockWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
