//! In-memory source map store.

use std::{
    collections::HashMap,
    sync::{Arc, RwLock},
};

use tplmap_core::{
    application::{ApplicationError, ports::MapStore},
    error::TplmapResult,
};

/// Thread-safe in-memory map store.
#[derive(Debug, Clone, Default)]
pub struct InMemoryMapStore {
    inner: Arc<RwLock<HashMap<String, String>>>,
}

impl InMemoryMapStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the number of stored maps.
    pub fn len(&self) -> usize {
        self.inner.read().map(|inner| inner.len()).unwrap_or(0)
    }

    /// Check if store is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Clear all entries.
    pub fn clear(&self) -> TplmapResult<()> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| ApplicationError::StoreLockError)?;
        inner.clear();
        Ok(())
    }
}

impl MapStore for InMemoryMapStore {
    fn put(&self, key: &str, data: &str) -> TplmapResult<()> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| ApplicationError::StoreLockError)?;
        inner.insert(key.to_owned(), data.to_owned());
        Ok(())
    }

    fn get(&self, key: &str) -> TplmapResult<Option<String>> {
        let inner = self
            .inner
            .read()
            .map_err(|_| ApplicationError::StoreLockError)?;
        Ok(inner.get(key).cloned())
    }

    fn remove(&self, key: &str) -> TplmapResult<()> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| ApplicationError::StoreLockError)?;
        inner.remove(key);
        Ok(())
    }

    fn keys(&self) -> TplmapResult<Vec<String>> {
        let inner = self
            .inner
            .read()
            .map_err(|_| ApplicationError::StoreLockError)?;
        let mut keys: Vec<String> = inner.keys().cloned().collect();
        keys.sort();
        Ok(keys)
    }
}
