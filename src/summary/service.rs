//! Summary metrics and rendering.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use chrono::{DateTime, TimeDelta, Utc};
use minijinja::Environment;
use mockable::Clock;
use serde::Serialize;
use serde_json::{Value, json};

use super::{SummaryError, templates};
use crate::task::domain::{Task, TaskId, TaskStatus, priority_queue};

const DAILY_FOCUS_LIMIT: usize = 5;
const WEEKLY_COMPLETED_LIMIT: usize = 10;
const MONTHLY_HIGHLIGHT_LIMIT: usize = 15;

/// Reporting period of a summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SummaryKind {
    /// The current UTC calendar day.
    Daily,
    /// The last seven days.
    Weekly,
    /// The last thirty days.
    Monthly,
}

impl SummaryKind {
    /// Returns the lowercase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
        }
    }

    const fn template(self) -> &'static str {
        match self {
            Self::Daily => templates::DAILY,
            Self::Weekly => templates::WEEKLY,
            Self::Monthly => templates::MONTHLY,
        }
    }
}

impl fmt::Display for SummaryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SummaryKind {
    type Err = SummaryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "daily" => Ok(Self::Daily),
            "weekly" => Ok(Self::Weekly),
            "monthly" => Ok(Self::Monthly),
            _ => Err(SummaryError::UnknownKind(s.to_owned())),
        }
    }
}

/// Counts behind a summary.
///
/// `created` and `completed` cover the reporting period. `pending`,
/// `in_progress` and `overdue` describe the task set at generation time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SummaryMetrics {
    /// Tasks created in the period.
    pub created: usize,
    /// Tasks completed in the period.
    pub completed: usize,
    /// Tasks currently pending.
    pub pending: usize,
    /// Tasks currently in progress.
    pub in_progress: usize,
    /// Uncompleted tasks whose deadline has passed.
    pub overdue: usize,
    /// Tasks listed in the summary body, in listed order.
    pub listed: Vec<TaskId>,
}

/// A rendered summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryReport {
    /// Reporting period.
    pub kind: SummaryKind,
    /// Generation time.
    pub generated_at: DateTime<Utc>,
    /// Plain-text body.
    pub plain: String,
    /// Underlying counts.
    pub metrics: SummaryMetrics,
}

/// Produces daily, weekly and monthly summaries.
#[derive(Debug)]
pub struct SummaryService<C>
where
    C: Clock + Send + Sync,
{
    clock: Arc<C>,
}

impl<C> SummaryService<C>
where
    C: Clock + Send + Sync,
{
    /// Creates a summary service.
    #[must_use]
    pub const fn new(clock: Arc<C>) -> Self {
        Self { clock }
    }

    /// Summarizes `tasks` for the given period.
    ///
    /// # Errors
    ///
    /// Returns [`SummaryError::Render`] when the template fails to render.
    pub fn generate(
        &self,
        kind: SummaryKind,
        tasks: &[Task],
    ) -> Result<SummaryReport, SummaryError> {
        let now = self.clock.utc();
        let (metrics, listed) = match kind {
            SummaryKind::Daily => daily(tasks, now),
            SummaryKind::Weekly => trailing(tasks, now, 7, WEEKLY_COMPLETED_LIMIT),
            SummaryKind::Monthly => trailing(tasks, now, 30, MONTHLY_HIGHLIGHT_LIMIT),
        };
        let context = json!({
            "date": now.format("%a %b %d %Y").to_string(),
            "metrics": &metrics,
            "tasks": listed.iter().map(task_context).collect::<Vec<_>>(),
        });
        let plain = render_template(kind, &context)?;
        Ok(SummaryReport {
            kind,
            generated_at: now,
            plain,
            metrics,
        })
    }
}

fn daily(tasks: &[Task], now: DateTime<Utc>) -> (SummaryMetrics, Vec<Task>) {
    let today = now.date_naive();
    let focus: Vec<Task> = priority_queue(tasks)
        .into_iter()
        .take(DAILY_FOCUS_LIMIT)
        .collect();
    let metrics = SummaryMetrics {
        created: tasks
            .iter()
            .filter(|task| task.created_at().date_naive() == today)
            .count(),
        completed: tasks
            .iter()
            .filter(|task| {
                task.completed_at()
                    .is_some_and(|completed_at| completed_at.date_naive() == today)
            })
            .count(),
        pending: count_status(tasks, TaskStatus::Pending),
        in_progress: count_status(tasks, TaskStatus::InProgress),
        overdue: count_overdue(tasks, now),
        listed: focus.iter().map(Task::id).collect(),
    };
    (metrics, focus)
}

fn trailing(
    tasks: &[Task],
    now: DateTime<Utc>,
    days: i64,
    limit: usize,
) -> (SummaryMetrics, Vec<Task>) {
    let start = now - TimeDelta::days(days);
    let in_window = |at: DateTime<Utc>| at >= start && at <= now;

    let mut completed: Vec<&Task> = tasks
        .iter()
        .filter(|task| task.completed_at().is_some_and(in_window))
        .collect();
    completed.sort_by(|left, right| right.completed_at().cmp(&left.completed_at()));
    let completed_count = completed.len();
    let recent: Vec<Task> = completed.into_iter().take(limit).cloned().collect();

    let metrics = SummaryMetrics {
        created: tasks
            .iter()
            .filter(|task| in_window(task.created_at()))
            .count(),
        completed: completed_count,
        pending: count_status(tasks, TaskStatus::Pending),
        in_progress: count_status(tasks, TaskStatus::InProgress),
        overdue: count_overdue(tasks, now),
        listed: recent.iter().map(Task::id).collect(),
    };
    (metrics, recent)
}

fn count_status(tasks: &[Task], status: TaskStatus) -> usize {
    tasks.iter().filter(|task| task.status() == status).count()
}

fn count_overdue(tasks: &[Task], now: DateTime<Utc>) -> usize {
    tasks
        .iter()
        .filter(|task| {
            task.status() != TaskStatus::Completed
                && task.deadline().is_some_and(|deadline| deadline < now)
        })
        .count()
}

fn task_context(task: &Task) -> Value {
    json!({
        "title": task.title(),
        "priority": task.priority().as_str(),
        "due": task.deadline().map(|deadline| deadline.format("%Y-%m-%d").to_string()),
    })
}

fn render_template(kind: SummaryKind, context: &Value) -> Result<String, SummaryError> {
    let environment = Environment::new();
    environment
        .render_str(kind.template(), context)
        .map_err(|error| SummaryError::Render {
            kind,
            reason: error.to_string(),
        })
}
