//! Task lifecycle management.
//!
//! Tasks move through `pending`, `in_progress`, `completed` and `missed`.
//! Completed tasks lock against edits and deletion 24 hours after
//! completion. Every mutation is persisted as a whole-index write and
//! recorded in the audit log. The module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
