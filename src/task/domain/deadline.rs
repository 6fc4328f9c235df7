//! Deadline window classification.

use super::{Task, TaskStatus};
use chrono::{DateTime, TimeDelta, Utc};

/// Returns tasks whose deadline falls in `(now, now + lookahead]`.
///
/// Completed tasks and tasks without a deadline are excluded.
#[must_use]
pub fn upcoming_deadlines(tasks: &[Task], now: DateTime<Utc>, lookahead: TimeDelta) -> Vec<Task> {
    let horizon = now + lookahead;
    tasks
        .iter()
        .filter(|task| task.status() != TaskStatus::Completed)
        .filter(|task| {
            task.deadline()
                .is_some_and(|deadline| deadline > now && deadline <= horizon)
        })
        .cloned()
        .collect()
}

/// Returns tasks whose deadline is strictly before `now`.
///
/// Completed tasks are excluded. Tasks already marked missed are included;
/// callers decide whether they still need reconciling.
#[must_use]
pub fn missed_deadlines(tasks: &[Task], now: DateTime<Utc>) -> Vec<Task> {
    tasks
        .iter()
        .filter(|task| task.status() != TaskStatus::Completed)
        .filter(|task| task.deadline().is_some_and(|deadline| deadline < now))
        .cloned()
        .collect()
}

/// Whole minutes from `now` until the task deadline, truncated toward zero.
///
/// Returns `None` for tasks without a deadline.
#[must_use]
pub fn minutes_until_deadline(task: &Task, now: DateTime<Utc>) -> Option<i64> {
    task.deadline()
        .map(|deadline| deadline.signed_duration_since(now).num_minutes())
}
