//! Project records and their persisted index.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::ProjectError;

/// Project identifier.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ProjectId(Uuid);

impl ProjectId {
    /// Creates a new random identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ProjectId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for ProjectId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim()).map(Self)
    }
}

/// A named grouping that tasks may reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    /// Identifier.
    pub id: ProjectId,
    /// Display name, trimmed and non-empty.
    pub name: String,
    /// Optional accent colour.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Archived projects are hidden from listings.
    #[serde(default)]
    pub archived: bool,
}

/// Partial update for a project.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectPatch {
    /// Replacement name.
    pub name: Option<String>,
    /// Replacement colour; `Some(None)` clears it.
    pub color: Option<Option<String>>,
    /// Replacement archive flag.
    pub archived: Option<bool>,
}

impl Project {
    pub(crate) fn apply(&mut self, patch: ProjectPatch) -> Result<(), ProjectError> {
        let name = patch.name.map(|value| project_name(&value)).transpose()?;
        if let Some(value) = name {
            self.name = value;
        }
        if let Some(value) = patch.color {
            self.color = value;
        }
        if let Some(value) = patch.archived {
            self.archived = value;
        }
        Ok(())
    }
}

/// Persisted form of the `projects` settings blob.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectIndex {
    /// Projects keyed by identifier.
    pub projects: BTreeMap<ProjectId, Project>,
    /// When the index was last written.
    pub last_updated: DateTime<Utc>,
}

pub(crate) fn project_name(raw: &str) -> Result<String, ProjectError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ProjectError::EmptyName);
    }
    Ok(trimmed.to_owned())
}
