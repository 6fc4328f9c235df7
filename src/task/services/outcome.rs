//! Result variants for task mutations.

use crate::task::domain::TaskStatus;

/// Outcome of a mutation that may be refused for ordinary reasons.
///
/// A missing task, an edit-locked task and a status change the lifecycle
/// forbids are expected outcomes, not errors.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub enum MutationOutcome<T> {
    /// The mutation was applied and persisted.
    Applied(T),
    /// No task with the requested identifier exists.
    NotFound,
    /// The task was completed too long ago to be changed.
    EditLocked,
    /// The requested status change is not permitted.
    InvalidTransition {
        /// Status before the attempted change.
        from: TaskStatus,
        /// Requested status.
        to: TaskStatus,
    },
}

impl<T> MutationOutcome<T> {
    /// Returns `true` when the mutation was applied.
    #[must_use]
    pub const fn is_applied(&self) -> bool {
        matches!(self, Self::Applied(_))
    }

    /// Returns the applied value, discarding the refusal reason.
    #[must_use]
    pub fn applied(self) -> Option<T> {
        match self {
            Self::Applied(value) => Some(value),
            Self::NotFound | Self::EditLocked | Self::InvalidTransition { .. } => None,
        }
    }

    /// Maps the applied value.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> MutationOutcome<U> {
        match self {
            Self::Applied(value) => MutationOutcome::Applied(f(value)),
            Self::NotFound => MutationOutcome::NotFound,
            Self::EditLocked => MutationOutcome::EditLocked,
            Self::InvalidTransition { from, to } => MutationOutcome::InvalidTransition { from, to },
        }
    }
}
