//! Service layer for task creation, mutation and queries.

use super::outcome::MutationOutcome;
use crate::task::{
    domain::{
        self, AuditAction, AuditEntry, NewTask, PageRequest, Priority, Task, TaskDetails,
        TaskDomainError, TaskFilter, TaskId, TaskPage, TaskPatch, TaskStatus, TaskType,
    },
    ports::{AuditLog, TaskStore, TaskStoreError},
};
use chrono::{DateTime, TimeDelta, Utc};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Request payload for creating a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTaskRequest {
    title: String,
    description: String,
    priority: Priority,
    task_type: TaskType,
    deadline: Option<DateTime<Utc>>,
    issue_key: Option<String>,
    project_id: Option<String>,
    duration_minutes: Option<u32>,
}

impl CreateTaskRequest {
    /// Creates a request with the required task fields.
    #[must_use]
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        priority: Priority,
        task_type: TaskType,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            priority,
            task_type,
            deadline: None,
            issue_key: None,
            project_id: None,
            duration_minutes: None,
        }
    }

    /// Sets the deadline.
    #[must_use]
    pub const fn with_deadline(mut self, deadline: DateTime<Utc>) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Sets the issue tracker key.
    #[must_use]
    pub fn with_issue_key(mut self, issue_key: impl Into<String>) -> Self {
        self.issue_key = Some(issue_key.into());
        self
    }

    /// Sets the project reference.
    #[must_use]
    pub fn with_project_id(mut self, project_id: impl Into<String>) -> Self {
        self.project_id = Some(project_id.into());
        self
    }

    /// Sets the planned session length.
    #[must_use]
    pub const fn with_duration_minutes(mut self, duration_minutes: u32) -> Self {
        self.duration_minutes = Some(duration_minutes);
        self
    }
}

/// Service-level errors for task lifecycle operations.
#[derive(Debug, Error)]
pub enum TaskLifecycleError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] TaskDomainError),
    /// Store operation failed.
    #[error(transparent)]
    Store(#[from] TaskStoreError),
}

/// Result type for task lifecycle service operations.
pub type TaskLifecycleResult<T> = Result<T, TaskLifecycleError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EditLock {
    Enforce,
    Ignore,
}

/// Task lifecycle orchestration service.
///
/// Clones share the store, audit log, clock and write gate, so mutations
/// issued through any clone are serialized against each other.
pub struct TaskLifecycleService<S, A, C>
where
    S: TaskStore,
    A: AuditLog,
    C: Clock + Send + Sync,
{
    store: Arc<S>,
    audit: Arc<A>,
    clock: Arc<C>,
    write_gate: Arc<Mutex<()>>,
}

impl<S, A, C> Clone for TaskLifecycleService<S, A, C>
where
    S: TaskStore,
    A: AuditLog,
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            audit: Arc::clone(&self.audit),
            clock: Arc::clone(&self.clock),
            write_gate: Arc::clone(&self.write_gate),
        }
    }
}

impl<S, A, C> TaskLifecycleService<S, A, C>
where
    S: TaskStore,
    A: AuditLog,
    C: Clock + Send + Sync,
{
    /// Creates a new task lifecycle service.
    #[must_use]
    pub fn new(store: Arc<S>, audit: Arc<A>, clock: Arc<C>) -> Self {
        Self {
            store,
            audit,
            clock,
            write_gate: Arc::new(Mutex::new(())),
        }
    }

    /// Returns the current time according to the injected clock.
    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.utc()
    }

    /// Returns the underlying store.
    #[must_use]
    pub const fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Creates a new pending task and records a `created` audit entry.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Domain`] when the title or description
    /// is blank, or [`TaskLifecycleError::Store`] when persistence fails.
    pub async fn create(&self, request: CreateTaskRequest) -> TaskLifecycleResult<Task> {
        let details = TaskDetails::new(request.title, request.description)?;
        let _gate = self.write_gate.lock().await;
        let task = Task::new(
            NewTask {
                details,
                priority: request.priority,
                task_type: request.task_type,
                deadline: request.deadline,
                issue_key: request.issue_key,
                project_id: request.project_id,
                duration_minutes: request.duration_minutes,
            },
            &*self.clock,
        );

        let mut index = self.store.load_index().await?;
        index.tasks.insert(task.id(), task.clone());
        index.last_updated = Some(task.created_at());
        self.store.save_index(&index).await?;
        info!(task_id = %task.id(), priority = %task.priority(), "task created");

        self.record(AuditEntry::new(task.created_at(), task.id(), AuditAction::Created).with_new(&task))
            .await;
        Ok(task)
    }

    /// Merges `patch` onto the task and records an `updated` audit entry.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Domain`] when a replacement title or
    /// description is blank, or [`TaskLifecycleError::Store`] when
    /// persistence fails. Missing, locked and illegal-transition cases are
    /// reported through [`MutationOutcome`].
    pub async fn update(
        &self,
        task_id: TaskId,
        patch: TaskPatch,
    ) -> TaskLifecycleResult<MutationOutcome<Task>> {
        self.mutate(task_id, EditLock::Enforce, &[AuditAction::Updated], |task, now| {
            task.apply_patch(patch, now)
        })
        .await
    }

    /// Moves the task to `in_progress`.
    ///
    /// Starting bypasses the edit lock; the status machine still applies.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Store`] when persistence fails.
    pub async fn start(&self, task_id: TaskId) -> TaskLifecycleResult<MutationOutcome<Task>> {
        self.mutate(task_id, EditLock::Ignore, &[AuditAction::Updated], |task, now| {
            task.transition_to(TaskStatus::InProgress, now)
        })
        .await
    }

    /// Marks the task completed and records `updated` then `completed`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Store`] when persistence fails.
    pub async fn complete(&self, task_id: TaskId) -> TaskLifecycleResult<MutationOutcome<Task>> {
        self.mutate(
            task_id,
            EditLock::Enforce,
            &[AuditAction::Updated, AuditAction::Completed],
            |task, now| task.transition_to(TaskStatus::Completed, now),
        )
        .await
    }

    /// Marks the task missed and records a `missed` audit entry.
    ///
    /// Re-marking an already missed task is allowed and re-records the entry.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Store`] when persistence fails.
    pub async fn mark_missed(&self, task_id: TaskId) -> TaskLifecycleResult<MutationOutcome<Task>> {
        self.mutate(task_id, EditLock::Enforce, &[AuditAction::Missed], |task, now| {
            task.transition_to(TaskStatus::Missed, now)
        })
        .await
    }

    /// Removes the task and records a `deleted` audit entry.
    ///
    /// The applied value is the removed task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Store`] when persistence fails.
    pub async fn delete(&self, task_id: TaskId) -> TaskLifecycleResult<MutationOutcome<Task>> {
        let _gate = self.write_gate.lock().await;
        let now = self.clock.utc();
        let mut index = self.store.load_index().await?;
        let Some(task) = index.tasks.get(&task_id) else {
            debug!(%task_id, "delete requested for unknown task");
            return Ok(MutationOutcome::NotFound);
        };
        if task.is_edit_locked(now) {
            debug!(%task_id, "delete refused, task is edit-locked");
            return Ok(MutationOutcome::EditLocked);
        }

        let Some(removed) = index.tasks.remove(&task_id) else {
            return Ok(MutationOutcome::NotFound);
        };
        index.last_updated = Some(now);
        self.store.save_index(&index).await?;
        info!(%task_id, "task deleted");

        self.record(AuditEntry::new(now, task_id, AuditAction::Deleted).with_previous(&removed))
            .await;
        Ok(MutationOutcome::Applied(removed))
    }

    /// Returns every task in store order.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Store`] when loading fails.
    pub async fn list_all(&self) -> TaskLifecycleResult<Vec<Task>> {
        Ok(self.store.load_index().await?.to_vec())
    }

    /// Retrieves a task by identifier.
    ///
    /// Returns `Ok(None)` when no such task exists.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Store`] when loading fails.
    pub async fn find_by_id(&self, task_id: TaskId) -> TaskLifecycleResult<Option<Task>> {
        let mut index = self.store.load_index().await?;
        Ok(index.tasks.remove(&task_id))
    }

    /// Returns tasks with the given status.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Store`] when loading fails.
    pub async fn by_status(&self, status: TaskStatus) -> TaskLifecycleResult<Vec<Task>> {
        Ok(domain::filter_by_status(&self.list_all().await?, status))
    }

    /// Returns tasks with the given priority.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Store`] when loading fails.
    pub async fn by_priority(&self, priority: Priority) -> TaskLifecycleResult<Vec<Task>> {
        Ok(domain::filter_by_priority(&self.list_all().await?, priority))
    }

    /// Returns tasks created within `[start, end]`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Store`] when loading fails.
    pub async fn by_created_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> TaskLifecycleResult<Vec<Task>> {
        Ok(domain::filter_by_created_range(
            &self.list_all().await?,
            start,
            end,
        ))
    }

    /// Returns tasks whose title or description contains `query`,
    /// ignoring case.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Store`] when loading fails.
    pub async fn search(&self, query: &str) -> TaskLifecycleResult<Vec<Task>> {
        Ok(domain::search(&self.list_all().await?, query))
    }

    /// Returns one filtered page of tasks together with the filtered total.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Store`] when loading fails.
    pub async fn page(
        &self,
        filter: &TaskFilter,
        request: PageRequest,
    ) -> TaskLifecycleResult<TaskPage> {
        Ok(domain::page(&self.list_all().await?, filter, request))
    }

    /// Returns active tasks in queue order.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Store`] when loading fails.
    pub async fn priority_queue(&self) -> TaskLifecycleResult<Vec<Task>> {
        Ok(domain::priority_queue(&self.list_all().await?))
    }

    /// Returns the head of the priority queue.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Store`] when loading fails.
    pub async fn next_task(&self) -> TaskLifecycleResult<Option<Task>> {
        Ok(domain::next_task(&self.list_all().await?))
    }

    /// Returns uncompleted tasks due within `lookahead` from now.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Store`] when loading fails.
    pub async fn upcoming_deadlines(&self, lookahead: TimeDelta) -> TaskLifecycleResult<Vec<Task>> {
        Ok(domain::upcoming_deadlines(
            &self.list_all().await?,
            self.clock.utc(),
            lookahead,
        ))
    }

    /// Returns uncompleted tasks whose deadline has passed.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Store`] when loading fails.
    pub async fn missed_deadlines(&self) -> TaskLifecycleResult<Vec<Task>> {
        Ok(domain::missed_deadlines(
            &self.list_all().await?,
            self.clock.utc(),
        ))
    }

    async fn mutate<F>(
        &self,
        task_id: TaskId,
        edit_lock: EditLock,
        actions: &[AuditAction],
        change: F,
    ) -> TaskLifecycleResult<MutationOutcome<Task>>
    where
        F: FnOnce(&mut Task, DateTime<Utc>) -> Result<(), TaskDomainError> + Send,
    {
        let _gate = self.write_gate.lock().await;
        let now = self.clock.utc();
        let mut index = self.store.load_index().await?;
        let Some(previous) = index.tasks.get(&task_id).cloned() else {
            debug!(%task_id, "mutation requested for unknown task");
            return Ok(MutationOutcome::NotFound);
        };
        if edit_lock == EditLock::Enforce && previous.is_edit_locked(now) {
            debug!(%task_id, "mutation refused, task is edit-locked");
            return Ok(MutationOutcome::EditLocked);
        }

        let mut updated = previous.clone();
        match change(&mut updated, now) {
            Ok(()) => {}
            Err(TaskDomainError::InvalidStatusTransition { from, to, .. }) => {
                debug!(%task_id, %from, %to, "status transition refused");
                return Ok(MutationOutcome::InvalidTransition { from, to });
            }
            Err(err) => return Err(err.into()),
        }

        index.tasks.insert(task_id, updated.clone());
        index.last_updated = Some(now);
        self.store.save_index(&index).await?;
        info!(%task_id, status = %updated.status(), "task updated");

        for action in actions {
            let entry = match action {
                AuditAction::Completed => {
                    AuditEntry::new(now, task_id, *action).with_new(&updated)
                }
                _ => AuditEntry::new(now, task_id, *action)
                    .with_previous(&previous)
                    .with_new(&updated),
            };
            self.record(entry).await;
        }
        Ok(MutationOutcome::Applied(updated))
    }

    async fn record(&self, entry: AuditEntry) {
        if let Err(err) = self.audit.append(&entry).await {
            warn!(
                task_id = %entry.task_id,
                action = %entry.action,
                error = %err,
                "failed to append audit entry"
            );
        }
    }
}
