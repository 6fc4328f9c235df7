//! Application services for task lifecycle orchestration and deadline
//! polling.

mod lifecycle;
mod outcome;
mod poller;

pub use lifecycle::{
    CreateTaskRequest, TaskLifecycleError, TaskLifecycleResult, TaskLifecycleService,
};
pub use outcome::MutationOutcome;
pub use poller::{DeadlinePoller, PollError, PollerOptions, TickReport};
