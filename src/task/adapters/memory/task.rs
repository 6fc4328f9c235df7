//! In-memory task store for tests and embedding.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::task::ports::{
    TaskIndex, TaskStore, TaskStoreError, TaskStoreResult, validate_config_name,
};

/// Thread-safe in-memory task store.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTaskStore {
    state: Arc<RwLock<InMemoryStoreState>>,
}

#[derive(Debug, Default)]
struct InMemoryStoreState {
    index: Option<TaskIndex>,
    configs: HashMap<String, Value>,
    saves: usize,
}

impl InMemoryTaskStore {
    /// Creates an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with `index`.
    #[must_use]
    pub fn with_index(index: TaskIndex) -> Self {
        let store = Self::default();
        if let Ok(mut state) = store.state.write() {
            state.index = Some(index);
        }
        store
    }

    /// Returns how many times the index has been saved.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::Persistence`] when the state lock is
    /// poisoned.
    pub fn save_count(&self) -> TaskStoreResult<usize> {
        let state = self.state.read().map_err(poisoned)?;
        Ok(state.saves)
    }
}

fn poisoned<T>(err: std::sync::PoisonError<T>) -> TaskStoreError {
    TaskStoreError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl TaskStore for InMemoryTaskStore {
    async fn load_index(&self) -> TaskStoreResult<TaskIndex> {
        let state = self.state.read().map_err(poisoned)?;
        Ok(state.index.clone().unwrap_or_default())
    }

    async fn save_index(&self, index: &TaskIndex) -> TaskStoreResult<()> {
        let mut state = self.state.write().map_err(poisoned)?;
        state.index = Some(index.clone());
        state.saves += 1;
        Ok(())
    }

    async fn load_config(&self, name: &str) -> TaskStoreResult<Option<Value>> {
        validate_config_name(name)?;
        let state = self.state.read().map_err(poisoned)?;
        Ok(state.configs.get(name).cloned())
    }

    async fn save_config(&self, name: &str, value: &Value) -> TaskStoreResult<()> {
        validate_config_name(name)?;
        let mut state = self.state.write().map_err(poisoned)?;
        state.configs.insert(name.to_owned(), value.clone());
        Ok(())
    }
}
