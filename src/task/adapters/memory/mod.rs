//! In-memory adapters for tests and embedders.

mod audit;
mod notifier;
mod task;

pub use audit::InMemoryAuditLog;
pub use notifier::{RecordedNotification, RecordingNotifier};
pub use task::InMemoryTaskStore;
