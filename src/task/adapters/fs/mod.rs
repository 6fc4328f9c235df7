//! Filesystem adapters backed by `cap-std` directories.

mod audit;
mod blocking;
mod store;

pub use audit::JsonLinesAuditLog;
pub use store::JsonFileTaskStore;
