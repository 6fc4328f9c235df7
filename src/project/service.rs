//! Project management over the `projects` settings blob.

use std::collections::BTreeMap;
use std::sync::Arc;

use mockable::Clock;
use tokio::sync::Mutex;
use tracing::{debug, info};

use super::{
    ProjectError,
    domain::{Project, ProjectId, ProjectIndex, ProjectPatch, project_name},
};
use crate::task::ports::{TaskStore, TaskStoreError};

const PROJECTS_BLOB: &str = "projects";
const DEFAULT_PROJECT_NAME: &str = "General";

/// Creates, lists and retires projects.
pub struct ProjectService<S, C>
where
    S: TaskStore,
    C: Clock + Send + Sync,
{
    store: Arc<S>,
    clock: Arc<C>,
    write_gate: Arc<Mutex<()>>,
}

impl<S, C> Clone for ProjectService<S, C>
where
    S: TaskStore,
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            clock: Arc::clone(&self.clock),
            write_gate: Arc::clone(&self.write_gate),
        }
    }
}

impl<S, C> ProjectService<S, C>
where
    S: TaskStore,
    C: Clock + Send + Sync,
{
    /// Creates a project service.
    #[must_use]
    pub fn new(store: Arc<S>, clock: Arc<C>) -> Self {
        Self {
            store,
            clock,
            write_gate: Arc::new(Mutex::new(())),
        }
    }

    /// Seeds a "General" project when no project index has been saved.
    ///
    /// Returns `true` when the seed was written.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectError::Store`] when the store fails.
    pub async fn initialize(&self) -> Result<bool, ProjectError> {
        let _gate = self.write_gate.lock().await;
        if self.store.load_config(PROJECTS_BLOB).await?.is_some() {
            return Ok(false);
        }
        let now = self.clock.utc();
        let seed = Project {
            id: ProjectId::new(),
            name: DEFAULT_PROJECT_NAME.to_owned(),
            color: None,
            created_at: now,
            archived: false,
        };
        let mut index = ProjectIndex {
            projects: BTreeMap::new(),
            last_updated: now,
        };
        index.projects.insert(seed.id, seed);
        self.save_index(&mut index).await?;
        info!("seeded default project");
        Ok(true)
    }

    /// Returns non-archived projects, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectError::Store`] when the store fails or the index is
    /// corrupt.
    pub async fn list(&self) -> Result<Vec<Project>, ProjectError> {
        let index = self.load_index().await?;
        let mut projects: Vec<Project> = index
            .projects
            .into_values()
            .filter(|project| !project.archived)
            .collect();
        projects.sort_by(|left, right| {
            left.created_at
                .cmp(&right.created_at)
                .then_with(|| left.name.cmp(&right.name))
        });
        Ok(projects)
    }

    /// Creates a project.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectError::EmptyName`] for a blank name, or
    /// [`ProjectError::Store`] when the store fails.
    pub async fn create(
        &self,
        name: &str,
        color: Option<String>,
    ) -> Result<Project, ProjectError> {
        let validated = project_name(name)?;
        let _gate = self.write_gate.lock().await;
        let mut index = self.load_index().await?;
        let project = Project {
            id: ProjectId::new(),
            name: validated,
            color,
            created_at: self.clock.utc(),
            archived: false,
        };
        index.projects.insert(project.id, project.clone());
        self.save_index(&mut index).await?;
        info!(project_id = %project.id, name = %project.name, "project created");
        Ok(project)
    }

    /// Applies `patch` to a project.
    ///
    /// Returns `None` when no such project exists.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectError::EmptyName`] for a blank replacement name, or
    /// [`ProjectError::Store`] when the store fails.
    pub async fn update(
        &self,
        id: ProjectId,
        patch: ProjectPatch,
    ) -> Result<Option<Project>, ProjectError> {
        let _gate = self.write_gate.lock().await;
        let mut index = self.load_index().await?;
        let Some(project) = index.projects.get_mut(&id) else {
            debug!(project_id = %id, "update requested for unknown project");
            return Ok(None);
        };
        project.apply(patch)?;
        let updated = project.clone();
        self.save_index(&mut index).await?;
        Ok(Some(updated))
    }

    /// Hides a project from listings.
    ///
    /// Returns `false` when no such project exists.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectError::Store`] when the store fails.
    pub async fn archive(&self, id: ProjectId) -> Result<bool, ProjectError> {
        let archived = self
            .update(
                id,
                ProjectPatch {
                    archived: Some(true),
                    ..ProjectPatch::default()
                },
            )
            .await?;
        Ok(archived.is_some())
    }

    /// Removes a project.
    ///
    /// Returns `false` when no such project exists. Tasks referencing the
    /// project keep their reference.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectError::Store`] when the store fails.
    pub async fn delete(&self, id: ProjectId) -> Result<bool, ProjectError> {
        let _gate = self.write_gate.lock().await;
        let mut index = self.load_index().await?;
        if index.projects.remove(&id).is_none() {
            return Ok(false);
        }
        self.save_index(&mut index).await?;
        info!(project_id = %id, "project deleted");
        Ok(true)
    }

    async fn load_index(&self) -> Result<ProjectIndex, ProjectError> {
        let Some(raw) = self.store.load_config(PROJECTS_BLOB).await? else {
            return Ok(ProjectIndex {
                projects: BTreeMap::new(),
                last_updated: self.clock.utc(),
            });
        };
        serde_json::from_value(raw).map_err(|err| {
            ProjectError::Store(TaskStoreError::Corrupt {
                location: PROJECTS_BLOB.to_owned(),
                reason: err.to_string(),
            })
        })
    }

    async fn save_index(&self, index: &mut ProjectIndex) -> Result<(), ProjectError> {
        index.last_updated = self.clock.utc();
        let raw =
            serde_json::to_value(&*index).map_err(|err| ProjectError::Encoding(err.to_string()))?;
        self.store.save_config(PROJECTS_BLOB, &raw).await?;
        Ok(())
    }
}
