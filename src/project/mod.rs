//! Projects that tasks can be grouped under.

mod domain;
mod service;


pub use domain::{Project, ProjectId, ProjectIndex, ProjectPatch};
pub use service::ProjectService;

use crate::task::ports::TaskStoreError;
use thiserror::Error;

/// Errors raised by project operations.
#[derive(Debug, Clone, Error)]
pub enum ProjectError {
    /// Project name is empty after trimming.
    #[error("project name must not be empty")]
    EmptyName,
    /// The project index could not be serialized.
    #[error("failed to encode projects: {0}")]
    Encoding(String),
    /// The store failed.
    #[error(transparent)]
    Store(#[from] TaskStoreError),
}
