//! Plain-text activity summaries over the task set.

mod service;
mod templates;


pub use service::{SummaryKind, SummaryMetrics, SummaryReport, SummaryService};

use thiserror::Error;

/// Errors raised while producing a summary.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SummaryError {
    /// Unrecognized summary kind name.
    #[error("unknown summary kind '{0}', expected daily, weekly or monthly")]
    UnknownKind(String),
    /// The template failed to render.
    #[error("failed to render {kind} summary: {reason}")]
    Render {
        /// Summary kind being rendered.
        kind: SummaryKind,
        /// Template engine message.
        reason: String,
    },
}
