//! Command-line definitions.

use camino::Utf8PathBuf;
use chrono::{DateTime, Utc};
use clap::{ArgAction, Args, Parser, Subcommand};
use flightdeck::project::ProjectId;
use flightdeck::summary::SummaryKind;
use flightdeck::task::domain::{
    ParseTaskStatusError, Priority, TaskDomainError, TaskId, TaskStatus, TaskType,
};

/// Track tasks, deadlines and reminders.
#[derive(Debug, Parser)]
#[command(name = "flightdeck", version, about)]
pub struct Cli {
    /// Extra configuration file layered over the user config.
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<Utf8PathBuf>,

    /// Increase log verbosity (repeat for more).
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Command to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Top-level commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Create a task.
    Add(AddArgs),
    /// List tasks page by page.
    List(ListArgs),
    /// Show one task as JSON.
    Show {
        /// Task identifier.
        id: TaskId,
    },
    /// Change fields of a task.
    Update(UpdateArgs),
    /// Start working on a task.
    Start {
        /// Task identifier.
        id: TaskId,
    },
    /// Mark a task completed.
    Complete {
        /// Task identifier.
        id: TaskId,
    },
    /// Delete a task.
    Delete {
        /// Task identifier.
        id: TaskId,
    },
    /// Find tasks by title or description.
    Search {
        /// Case-insensitive text to look for.
        query: String,
    },
    /// Show active tasks in priority order.
    Queue,
    /// Show the task to work on next.
    Next,
    /// Show tasks due soon.
    Upcoming {
        /// Lookahead in minutes.
        #[arg(long, default_value_t = 60)]
        minutes: u32,
    },
    /// Show uncompleted tasks whose deadline has passed.
    Missed,
    /// Print an activity summary.
    Summary {
        /// `daily`, `weekly` or `monthly`.
        kind: SummaryKind,
    },
    /// Manage projects.
    Projects {
        /// Project action.
        #[command(subcommand)]
        action: ProjectCommand,
    },
    /// Run one deadline poll. Reminders sent by earlier polls are not repeated.
    Poll,
    /// Poll deadlines until interrupted.
    Watch,
}

/// Arguments for `add`.
#[derive(Debug, Args)]
pub struct AddArgs {
    /// Task title.
    pub title: String,
    /// Task description.
    #[arg(short, long)]
    pub description: String,
    /// `low`, `high` or `higher`.
    #[arg(short, long, default_value = "low", value_parser = parse_priority)]
    pub priority: Priority,
    /// `daily` or `deadline`.
    #[arg(long = "type", default_value = "deadline", value_parser = parse_task_type)]
    pub task_type: TaskType,
    /// Deadline in RFC 3339 form.
    #[arg(long, value_parser = parse_deadline)]
    pub deadline: Option<DateTime<Utc>>,
    /// Issue tracker key.
    #[arg(long)]
    pub issue_key: Option<String>,
    /// Project reference.
    #[arg(long)]
    pub project: Option<String>,
    /// Planned session length in minutes.
    #[arg(long)]
    pub duration: Option<u32>,
}

/// Arguments for `list`.
#[derive(Debug, Args)]
pub struct ListArgs {
    /// Only tasks with this status.
    #[arg(long, value_parser = parse_status)]
    pub status: Option<TaskStatus>,
    /// Only tasks with this priority.
    #[arg(long, value_parser = parse_priority)]
    pub priority: Option<Priority>,
    /// Only tasks whose title or description contains this text.
    #[arg(long)]
    pub query: Option<String>,
    /// Tasks to skip.
    #[arg(long, default_value_t = 0)]
    pub offset: usize,
    /// Maximum tasks to show.
    #[arg(long, default_value_t = 20)]
    pub limit: usize,
}

/// Arguments for `update`.
#[derive(Debug, Args)]
pub struct UpdateArgs {
    /// Task identifier.
    pub id: TaskId,
    /// New title.
    #[arg(long)]
    pub title: Option<String>,
    /// New description.
    #[arg(long)]
    pub description: Option<String>,
    /// New priority.
    #[arg(long, value_parser = parse_priority)]
    pub priority: Option<Priority>,
    /// New status.
    #[arg(long, value_parser = parse_status)]
    pub status: Option<TaskStatus>,
    /// New type.
    #[arg(long = "type", value_parser = parse_task_type)]
    pub task_type: Option<TaskType>,
    /// New deadline in RFC 3339 form.
    #[arg(long, value_parser = parse_deadline, conflicts_with = "clear_deadline")]
    pub deadline: Option<DateTime<Utc>>,
    /// Remove the deadline.
    #[arg(long)]
    pub clear_deadline: bool,
    /// New issue tracker key.
    #[arg(long)]
    pub issue_key: Option<String>,
    /// New project reference.
    #[arg(long)]
    pub project: Option<String>,
    /// New planned session length in minutes.
    #[arg(long)]
    pub duration: Option<u32>,
}

/// Project actions.
#[derive(Debug, Subcommand)]
pub enum ProjectCommand {
    /// List active projects.
    List,
    /// Create a project.
    Add {
        /// Project name.
        name: String,
        /// Accent colour.
        #[arg(long)]
        color: Option<String>,
    },
    /// Hide a project from listings.
    Archive {
        /// Project identifier.
        id: ProjectId,
    },
    /// Remove a project.
    Delete {
        /// Project identifier.
        id: ProjectId,
    },
}

fn parse_priority(raw: &str) -> Result<Priority, TaskDomainError> {
    Priority::try_from(raw)
}

fn parse_task_type(raw: &str) -> Result<TaskType, TaskDomainError> {
    TaskType::try_from(raw)
}

fn parse_status(raw: &str) -> Result<TaskStatus, ParseTaskStatusError> {
    TaskStatus::try_from(raw)
}

fn parse_deadline(raw: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    DateTime::parse_from_rfc3339(raw).map(|deadline| deadline.with_timezone(&Utc))
}
