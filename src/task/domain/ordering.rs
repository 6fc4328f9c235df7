//! Priority queue derivation.

use super::Task;
use std::cmp::Ordering;

/// Compares two tasks by queue precedence.
///
/// Higher priority weight first; at equal priority a task with a deadline
/// precedes one without, and two deadlines compare soonest first; remaining
/// ties go to the older task.
#[must_use]
pub fn queue_order(left: &Task, right: &Task) -> Ordering {
    right
        .priority()
        .weight()
        .cmp(&left.priority().weight())
        .then_with(|| match (left.deadline(), right.deadline()) {
            (Some(left_deadline), Some(right_deadline)) => left_deadline.cmp(&right_deadline),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        })
        .then_with(|| left.created_at().cmp(&right.created_at()))
}

/// Returns the pending and in-progress tasks in queue order.
///
/// The sort is stable, so tasks that compare equal keep their input order.
#[must_use]
pub fn priority_queue(tasks: &[Task]) -> Vec<Task> {
    let mut queue: Vec<Task> = tasks
        .iter()
        .filter(|task| task.status().is_active())
        .cloned()
        .collect();
    queue.sort_by(queue_order);
    queue
}

/// Returns the head of the priority queue.
#[must_use]
pub fn next_task(tasks: &[Task]) -> Option<Task> {
    tasks
        .iter()
        .filter(|task| task.status().is_active())
        .min_by(|left, right| queue_order(left, right))
        .cloned()
}
