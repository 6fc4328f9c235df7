//! Flightdeck: personal task tracking with deadline reminders.
//!
//! The crate keeps a single JSON task index, enforces the task status
//! machine and the post-completion edit lock, orders work by priority and
//! deadline, and polls for approaching or passed deadlines.
//!
//! # Architecture
//!
//! Flightdeck follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for storage, audit and notification
//! - **Adapters**: Concrete implementations of ports (in-memory, JSON files,
//!   tracing)
//!
//! # Modules
//!
//! - [`task`]: Task records, lifecycle rules, queries and deadline polling
//! - [`settings`]: Persisted notification settings and feature flags
//! - [`project`]: Projects that tasks can be grouped under
//! - [`summary`]: Daily, weekly and monthly activity summaries
//! - [`config`]: Layered application configuration

pub mod config;
pub mod project;
pub mod settings;
pub mod summary;
pub mod task;
