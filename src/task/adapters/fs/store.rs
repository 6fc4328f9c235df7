//! JSON file task store rooted in a capability-scoped directory.

use async_trait::async_trait;
use camino::Utf8Path;
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use serde::Serialize;
use serde_json::Value;
use std::io::ErrorKind;
use std::sync::Arc;

use super::blocking::run_blocking;
use crate::task::ports::{
    TaskIndex, TaskStore, TaskStoreError, TaskStoreResult, validate_config_name,
};

const INDEX_FILE: &str = "index.json";

/// Task store that keeps `index.json` and `<name>.json` settings blobs in
/// one directory.
///
/// Every write lands in a temporary sibling file first and is renamed over
/// the target, so readers never observe a half-written file. File access
/// runs on the blocking thread pool.
#[derive(Debug, Clone)]
pub struct JsonFileTaskStore {
    dir: Arc<Dir>,
}

impl JsonFileTaskStore {
    /// Opens (creating if needed) the store directory at `root`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::Persistence`] when the directory cannot be
    /// created or opened.
    pub fn open(root: &Utf8Path) -> TaskStoreResult<Self> {
        Dir::create_ambient_dir_all(root, ambient_authority())
            .map_err(TaskStoreError::persistence)?;
        let dir = Dir::open_ambient_dir(root, ambient_authority())
            .map_err(TaskStoreError::persistence)?;
        tracing::debug!(root = %root, "opened json task store");
        Ok(Self { dir: Arc::new(dir) })
    }

    async fn read_optional(&self, file_name: String) -> TaskStoreResult<Option<String>> {
        let dir = Arc::clone(&self.dir);
        run_blocking(
            move || match dir.read_to_string(&file_name) {
                Ok(contents) => Ok(Some(contents)),
                Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
                Err(err) => Err(TaskStoreError::persistence(err)),
            },
            TaskStoreError::persistence,
        )
        .await
    }

    async fn write_atomic(&self, file_name: String, value: &impl Serialize) -> TaskStoreResult<()> {
        let contents = serde_json::to_string_pretty(value).map_err(TaskStoreError::persistence)?;
        let dir = Arc::clone(&self.dir);
        run_blocking(
            move || {
                let temp_name = format!(".{file_name}.tmp");
                dir.write(&temp_name, contents)
                    .map_err(TaskStoreError::persistence)?;
                dir.rename(&temp_name, &dir, &file_name)
                    .map_err(TaskStoreError::persistence)
            },
            TaskStoreError::persistence,
        )
        .await
    }
}

fn config_file_name(name: &str) -> TaskStoreResult<String> {
    validate_config_name(name)?;
    Ok(format!("{name}.json"))
}

fn corrupt(location: &str, err: &serde_json::Error) -> TaskStoreError {
    TaskStoreError::Corrupt {
        location: location.to_owned(),
        reason: err.to_string(),
    }
}

#[async_trait]
impl TaskStore for JsonFileTaskStore {
    async fn load_index(&self) -> TaskStoreResult<TaskIndex> {
        let Some(contents) = self.read_optional(INDEX_FILE.to_owned()).await? else {
            return Ok(TaskIndex::default());
        };
        serde_json::from_str(&contents).map_err(|err| corrupt(INDEX_FILE, &err))
    }

    async fn save_index(&self, index: &TaskIndex) -> TaskStoreResult<()> {
        self.write_atomic(INDEX_FILE.to_owned(), index).await?;
        tracing::trace!(tasks = index.tasks.len(), "saved task index");
        Ok(())
    }

    async fn load_config(&self, name: &str) -> TaskStoreResult<Option<Value>> {
        let file_name = config_file_name(name)?;
        let Some(contents) = self.read_optional(file_name.clone()).await? else {
            return Ok(None);
        };
        serde_json::from_str(&contents)
            .map(Some)
            .map_err(|err| corrupt(&file_name, &err))
    }

    async fn save_config(&self, name: &str, value: &Value) -> TaskStoreResult<()> {
        let file_name = config_file_name(name)?;
        self.write_atomic(file_name, value).await
    }
}
