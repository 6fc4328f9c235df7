//! Shared helpers for in-memory integration tests.

use std::sync::Arc;

use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use flightdeck::{
    settings::SettingsService,
    task::{
        adapters::{
            ManualClock,
            memory::{InMemoryAuditLog, InMemoryTaskStore, RecordingNotifier},
        },
        domain::{Priority, Task, TaskType},
        services::{CreateTaskRequest, DeadlinePoller, PollerOptions, TaskLifecycleService},
    },
};
use rstest::fixture;

/// Lifecycle service wired to in-memory adapters.
pub type MemoryService = TaskLifecycleService<InMemoryTaskStore, InMemoryAuditLog, ManualClock>;

/// Deadline poller wired to in-memory adapters.
pub type MemoryPoller =
    DeadlinePoller<InMemoryTaskStore, InMemoryAuditLog, ManualClock, RecordingNotifier>;

/// Fixed starting instant for every flow.
pub fn epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 9, 7, 8, 0, 0)
        .single()
        .unwrap_or_default()
}

/// In-memory engine plus handles for inspecting it.
pub struct Engine {
    pub clock: ManualClock,
    pub audit: Arc<InMemoryAuditLog>,
    pub notifier: RecordingNotifier,
    pub service: MemoryService,
    pub poller: MemoryPoller,
}

impl Engine {
    /// Builds an engine whose clock reads [`epoch`].
    pub fn new() -> Self {
        let store = Arc::new(InMemoryTaskStore::new());
        let audit = Arc::new(InMemoryAuditLog::new());
        let clock = ManualClock::new(epoch());
        let notifier = RecordingNotifier::new();
        let service = TaskLifecycleService::new(
            Arc::clone(&store),
            Arc::clone(&audit),
            Arc::new(clock.clone()),
        );
        let poller = DeadlinePoller::new(
            service.clone(),
            SettingsService::new(store),
            Arc::new(notifier.clone()),
            PollerOptions::default(),
        );
        Self {
            clock,
            audit,
            notifier,
            service,
            poller,
        }
    }

    /// Creates a task, failing the flow when creation is rejected.
    pub async fn add(
        &self,
        title: &str,
        priority: Priority,
        deadline: Option<TimeDelta>,
    ) -> eyre::Result<Task> {
        let mut request = CreateTaskRequest::new(title, "flow task", priority, TaskType::Deadline);
        if let Some(offset) = deadline {
            request = request.with_deadline(self.clock.now() + offset);
        }
        Ok(self.service.create(request).await?)
    }
}

/// Fixture that builds a fresh engine.
#[fixture]
pub fn engine() -> Engine {
    Engine::new()
}
