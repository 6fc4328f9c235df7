//! Flightdeck command-line interface.
//!
//! Usage:
//!
//! ```text
//! flightdeck [--config FILE] [-v] <command>
//! ```
//!
//! Tasks, settings and projects are read from and written to the configured
//! data directory. Command output goes to stdout; logs and notifications go
//! to stderr through `tracing`.

mod cli;

use std::io::{self, Write};
use std::sync::Arc;

use chrono::TimeDelta;
use clap::Parser;
use eyre::{WrapErr, bail};
use flightdeck::config::AppConfig;
use flightdeck::project::ProjectService;
use flightdeck::settings::SettingsService;
use flightdeck::summary::SummaryService;
use flightdeck::task::{
    adapters::{
        TracingNotifier,
        fs::{JsonFileTaskStore, JsonLinesAuditLog},
    },
    domain::{PageRequest, Task, TaskFilter, TaskId, TaskPatch, minutes_until_deadline},
    services::{CreateTaskRequest, DeadlinePoller, MutationOutcome, TaskLifecycleService},
};
use mockable::DefaultClock;
use tokio::sync::watch;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use cli::{AddArgs, Cli, Command, ListArgs, ProjectCommand, UpdateArgs};

type Lifecycle = TaskLifecycleService<JsonFileTaskStore, JsonLinesAuditLog, DefaultClock>;
type Poller = DeadlinePoller<JsonFileTaskStore, JsonLinesAuditLog, DefaultClock, TracingNotifier>;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    let cli = Cli::parse();
    let config =
        AppConfig::load(cli.config.as_deref()).wrap_err("failed to load configuration")?;
    init_tracing(&config.log_level, cli.verbose)?;

    let app = App::open(&config).await?;
    app.dispatch(cli.command).await
}

fn init_tracing(configured_level: &str, verbose: u8) -> eyre::Result<()> {
    let level = match verbose {
        0 => configured_level,
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_env("FLIGHTDECK_LOG").unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init()
        .map_err(|error| eyre::eyre!("failed to initialize tracing subscriber: {error}"))?;
    Ok(())
}

struct App {
    tasks: Lifecycle,
    projects: ProjectService<JsonFileTaskStore, DefaultClock>,
    summaries: SummaryService<DefaultClock>,
    poller: Poller,
}

impl App {
    async fn open(config: &AppConfig) -> eyre::Result<Self> {
        let store = Arc::new(
            JsonFileTaskStore::open(&config.data_dir)
                .wrap_err_with(|| format!("failed to open data directory {}", config.data_dir))?,
        );
        let audit = Arc::new(
            JsonLinesAuditLog::open(&config.data_dir.join("audit"))
                .wrap_err("failed to open audit log")?,
        );
        let clock = Arc::new(DefaultClock);

        let tasks = TaskLifecycleService::new(Arc::clone(&store), audit, Arc::clone(&clock));
        let settings = SettingsService::new(Arc::clone(&store));
        let projects = ProjectService::new(Arc::clone(&store), Arc::clone(&clock));
        projects
            .initialize()
            .await
            .wrap_err("failed to initialize projects")?;
        let poller = DeadlinePoller::new(
            tasks.clone(),
            settings,
            Arc::new(TracingNotifier),
            config.poller_options(),
        );

        Ok(Self {
            tasks,
            projects,
            summaries: SummaryService::new(clock),
            poller,
        })
    }

    async fn dispatch(&self, command: Command) -> eyre::Result<()> {
        let mut out = io::stdout().lock();
        match command {
            Command::Add(args) => self.add(&mut out, args).await,
            Command::List(args) => self.list(&mut out, args).await,
            Command::Show { id } => {
                let Some(task) = self.tasks.find_by_id(id).await? else {
                    bail!("task {id} not found");
                };
                writeln!(out, "{}", serde_json::to_string_pretty(&task)?)?;
                Ok(())
            }
            Command::Update(args) => self.update(&mut out, args).await,
            Command::Start { id } => {
                let task = applied(id, self.tasks.start(id).await?)?;
                writeln!(out, "started {}", task.id())?;
                Ok(())
            }
            Command::Complete { id } => {
                let task = applied(id, self.tasks.complete(id).await?)?;
                writeln!(out, "completed {}", task.id())?;
                if let Some(next) = self.poller.announce_completion(&task).await? {
                    write!(out, "next: ")?;
                    write_task(&mut out, &next)?;
                }
                Ok(())
            }
            Command::Delete { id } => {
                let task = applied(id, self.tasks.delete(id).await?)?;
                writeln!(out, "deleted {}", task.id())?;
                Ok(())
            }
            Command::Search { query } => write_tasks(&mut out, &self.tasks.search(&query).await?),
            Command::Queue => write_tasks(&mut out, &self.tasks.priority_queue().await?),
            Command::Next => {
                match self.tasks.next_task().await? {
                    Some(task) => write_task(&mut out, &task)?,
                    None => writeln!(out, "nothing to do")?,
                }
                Ok(())
            }
            Command::Upcoming { minutes } => {
                let now = self.tasks.now();
                let upcoming = self
                    .tasks
                    .upcoming_deadlines(TimeDelta::minutes(i64::from(minutes)))
                    .await?;
                for task in &upcoming {
                    let remaining = minutes_until_deadline(task, now).unwrap_or_default();
                    write!(out, "in {remaining:>5} min  ")?;
                    write_task(&mut out, task)?;
                }
                Ok(())
            }
            Command::Missed => write_tasks(&mut out, &self.tasks.missed_deadlines().await?),
            Command::Summary { kind } => {
                let tasks = self.tasks.list_all().await?;
                let report = self.summaries.generate(kind, &tasks)?;
                writeln!(out, "{}", report.plain)?;
                Ok(())
            }
            Command::Projects { action } => self.manage_projects(&mut out, action).await,
            Command::Poll => {
                let report = self.poller.tick().await?;
                writeln!(
                    out,
                    "reminders sent: {}, marked missed: {}, delivery failures: {}",
                    report.upcoming_notified, report.missed_marked, report.notifications_failed
                )?;
                Ok(())
            }
            Command::Watch => {
                drop(out);
                self.watch().await;
                Ok(())
            }
        }
    }

    async fn add(&self, out: &mut impl Write, args: AddArgs) -> eyre::Result<()> {
        let mut request =
            CreateTaskRequest::new(args.title, args.description, args.priority, args.task_type);
        if let Some(deadline) = args.deadline {
            request = request.with_deadline(deadline);
        }
        if let Some(issue_key) = args.issue_key {
            request = request.with_issue_key(issue_key);
        }
        if let Some(project) = args.project {
            request = request.with_project_id(project);
        }
        if let Some(duration) = args.duration {
            request = request.with_duration_minutes(duration);
        }
        let task = self.tasks.create(request).await?;
        writeln!(out, "{}", task.id())?;
        Ok(())
    }

    async fn list(&self, out: &mut impl Write, args: ListArgs) -> eyre::Result<()> {
        let mut filter = TaskFilter::new();
        if let Some(status) = args.status {
            filter = filter.with_status(status);
        }
        if let Some(priority) = args.priority {
            filter = filter.with_priority(priority);
        }
        if let Some(query) = args.query {
            filter = filter.with_query(query);
        }
        let page = self
            .tasks
            .page(&filter, PageRequest::new(args.offset, args.limit))
            .await?;
        write_tasks(out, &page.items)?;
        writeln!(
            out,
            "showing {} of {} (offset {})",
            page.items.len(),
            page.total,
            args.offset
        )?;
        Ok(())
    }

    async fn update(&self, out: &mut impl Write, args: UpdateArgs) -> eyre::Result<()> {
        let mut patch = TaskPatch::new();
        if let Some(title) = args.title {
            patch = patch.with_title(title);
        }
        if let Some(description) = args.description {
            patch = patch.with_description(description);
        }
        if let Some(priority) = args.priority {
            patch = patch.with_priority(priority);
        }
        if let Some(status) = args.status {
            patch = patch.with_status(status);
        }
        if let Some(task_type) = args.task_type {
            patch = patch.with_task_type(task_type);
        }
        if args.clear_deadline {
            patch = patch.with_deadline(None);
        } else if let Some(deadline) = args.deadline {
            patch = patch.with_deadline(Some(deadline));
        }
        if let Some(issue_key) = args.issue_key {
            patch = patch.with_issue_key(Some(issue_key));
        }
        if let Some(project) = args.project {
            patch = patch.with_project_id(Some(project));
        }
        if let Some(duration) = args.duration {
            patch = patch.with_duration_minutes(Some(duration));
        }
        if patch.is_empty() {
            bail!("nothing to update");
        }

        let task = applied(args.id, self.tasks.update(args.id, patch).await?)?;
        write_task(out, &task)?;
        Ok(())
    }

    async fn manage_projects(&self, out: &mut impl Write, action: ProjectCommand) -> eyre::Result<()> {
        match action {
            ProjectCommand::List => {
                for project in self.projects.list().await? {
                    let color = project.color.as_deref().unwrap_or("-");
                    writeln!(out, "{}  {:<8} {}", project.id, color, project.name)?;
                }
            }
            ProjectCommand::Add { name, color } => {
                let project = self.projects.create(&name, color).await?;
                writeln!(out, "{}", project.id)?;
            }
            ProjectCommand::Archive { id } => {
                if !self.projects.archive(id).await? {
                    bail!("project {id} not found");
                }
                writeln!(out, "archived {id}")?;
            }
            ProjectCommand::Delete { id } => {
                if !self.projects.delete(id).await? {
                    bail!("project {id} not found");
                }
                writeln!(out, "deleted {id}")?;
            }
        }
        Ok(())
    }

    async fn watch(&self) {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() && shutdown_tx.send(true).is_err() {
                debug!("poller already stopped");
            }
        });
        self.poller.run(shutdown_rx).await;
    }
}

fn applied(id: TaskId, outcome: MutationOutcome<Task>) -> eyre::Result<Task> {
    match outcome {
        MutationOutcome::Applied(task) => Ok(task),
        MutationOutcome::NotFound => bail!("task {id} not found"),
        MutationOutcome::EditLocked => {
            bail!("task {id} was completed more than 24 hours ago and can no longer be changed")
        }
        MutationOutcome::InvalidTransition { from, to } => {
            bail!("task {id} cannot move from {from} to {to}")
        }
    }
}

fn write_tasks(out: &mut impl Write, tasks: &[Task]) -> eyre::Result<()> {
    if tasks.is_empty() {
        writeln!(out, "no tasks")?;
    }
    for task in tasks {
        write_task(out, task)?;
    }
    Ok(())
}

fn write_task(out: &mut impl Write, task: &Task) -> eyre::Result<()> {
    let due = task
        .deadline()
        .map(|deadline| format!("  due {}", deadline.format("%Y-%m-%d %H:%M")))
        .unwrap_or_default();
    writeln!(
        out,
        "{}  [{:<6}] {:<11} {}{due}",
        task.id(),
        task.priority().as_str(),
        task.status().as_str(),
        task.title()
    )?;
    Ok(())
}
