//! Domain model for task lifecycle management.
//!
//! The task domain models the task aggregate, its status lifecycle and the
//! derived views (filtering, paging, priority ordering and deadline windows)
//! while keeping all infrastructure concerns outside of the domain boundary.

mod audit;
mod deadline;
mod error;
mod ids;
mod ordering;
mod patch;
mod query;
mod task;

pub use audit::{AuditAction, AuditEntry};
pub use deadline::{minutes_until_deadline, missed_deadlines, upcoming_deadlines};
pub use error::{ParseTaskStatusError, TaskDomainError};
pub use ids::TaskId;
pub use ordering::{next_task, priority_queue, queue_order};
pub use patch::TaskPatch;
pub use query::{
    FieldFilter, PageRequest, TaskFilter, TaskPage, filter_by_created_range, filter_by_priority,
    filter_by_status, matches_text, page, search,
};
pub use task::{
    EDIT_LOCK_HOURS, NewTask, PersistedTaskData, Priority, Task, TaskDetails, TaskStatus,
    TaskType,
};
