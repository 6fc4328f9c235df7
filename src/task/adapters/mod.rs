//! Adapter implementations for the task ports.

pub mod clock;
pub mod fs;
pub mod memory;

mod tracing_notifier;

pub use clock::ManualClock;
pub use tracing_notifier::{NotificationMessage, TracingNotifier};
