//! Port contracts for task lifecycle management.
//!
//! Ports define infrastructure-agnostic interfaces used by task services.

pub mod audit;
pub mod notifier;
pub mod store;

pub use audit::{AuditLog, AuditLogError};
pub use notifier::{Notifier, NotifierError};
pub use store::{TaskIndex, TaskStore, TaskStoreError, TaskStoreResult, validate_config_name};

#[cfg(test)]
pub use audit::MockAuditLog;
#[cfg(test)]
pub use notifier::MockNotifier;
