//! Filtering, search and paging over a task set.
//!
//! Every function here is a pure function of its inputs; services load the
//! task set from the store and hand it over.

use super::{Priority, Task, TaskStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Filter on one task field: either every value or a single exact value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldFilter<T> {
    /// Matches every value.
    All,
    /// Matches exactly this value.
    Only(T),
}

impl<T: PartialEq> FieldFilter<T> {
    /// Returns whether `value` passes the filter.
    pub fn matches(&self, value: &T) -> bool {
        match self {
            Self::All => true,
            Self::Only(expected) => expected == value,
        }
    }
}

impl<T> Default for FieldFilter<T> {
    fn default() -> Self {
        Self::All
    }
}

impl<T> From<Option<T>> for FieldFilter<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::All, Self::Only)
    }
}

/// Combined filter used by paged listing.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TaskFilter {
    /// Status filter, applied first.
    pub status: FieldFilter<TaskStatus>,
    /// Priority filter, applied second.
    pub priority: FieldFilter<Priority>,
    /// Free-text query, applied last.
    pub query: Option<String>,
}

impl TaskFilter {
    /// Creates a filter that matches every task.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Restricts the filter to one status.
    #[must_use]
    pub const fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = FieldFilter::Only(status);
        self
    }

    /// Restricts the filter to one priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = FieldFilter::Only(priority);
        self
    }

    /// Restricts the filter to tasks matching a free-text query.
    #[must_use]
    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }
}

/// Offset/limit window over a filtered task list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// Number of filtered tasks to skip.
    pub offset: usize,
    /// Maximum number of tasks to return.
    pub limit: usize,
}

impl PageRequest {
    /// Creates a page request.
    #[must_use]
    pub const fn new(offset: usize, limit: usize) -> Self {
        Self { offset, limit }
    }
}

/// One page of tasks plus the size of the filtered set it was cut from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskPage {
    /// Tasks on this page.
    pub items: Vec<Task>,
    /// Number of tasks matching the filter before slicing.
    pub total: usize,
}

/// Returns tasks with the given status.
#[must_use]
pub fn filter_by_status(tasks: &[Task], status: TaskStatus) -> Vec<Task> {
    tasks
        .iter()
        .filter(|task| task.status() == status)
        .cloned()
        .collect()
}

/// Returns tasks with the given priority.
#[must_use]
pub fn filter_by_priority(tasks: &[Task], priority: Priority) -> Vec<Task> {
    tasks
        .iter()
        .filter(|task| task.priority() == priority)
        .cloned()
        .collect()
}

/// Returns tasks created within `[start, end]`, both ends inclusive.
#[must_use]
pub fn filter_by_created_range(
    tasks: &[Task],
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> Vec<Task> {
    tasks
        .iter()
        .filter(|task| task.created_at() >= start && task.created_at() <= end)
        .cloned()
        .collect()
}

/// Case-insensitive substring match on title or description.
///
/// The query is trimmed first; an empty query matches every task.
#[must_use]
pub fn matches_text(task: &Task, query: &str) -> bool {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }
    task.title().to_lowercase().contains(&needle)
        || task.description().to_lowercase().contains(&needle)
}

/// Returns tasks whose title or description contain `query`.
#[must_use]
pub fn search(tasks: &[Task], query: &str) -> Vec<Task> {
    tasks
        .iter()
        .filter(|task| matches_text(task, query))
        .cloned()
        .collect()
}

/// Applies the filter (status, then priority, then text) and slices the
/// result to the requested page.
#[must_use]
pub fn page(tasks: &[Task], filter: &TaskFilter, request: PageRequest) -> TaskPage {
    let query = filter.query.as_deref().unwrap_or_default();
    let filtered: Vec<&Task> = tasks
        .iter()
        .filter(|task| filter.status.matches(&task.status()))
        .filter(|task| filter.priority.matches(&task.priority()))
        .filter(|task| matches_text(task, query))
        .collect();

    let total = filtered.len();
    let items = filtered
        .into_iter()
        .skip(request.offset)
        .take(request.limit)
        .cloned()
        .collect();
    TaskPage { items, total }
}
