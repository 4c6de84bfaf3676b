//! In-memory template loader for embedded templates and testing.

use std::{
    collections::HashMap,
    sync::{
        Arc, RwLock,
        atomic::{AtomicUsize, Ordering},
    },
};

use tplmap_core::{
    application::{ApplicationError, ports::Loader},
    domain::Source,
    error::TplmapResult,
};

/// Thread-safe loader over a table of `logical path → Source`.
///
/// Several logical paths may map to the same filename (aliases); the source
/// map collapses them into one path entry.
#[derive(Debug, Clone, Default)]
pub struct MemoryLoader {
    inner: Arc<RwLock<HashMap<String, Source>>>,
    loads: Arc<AtomicUsize>,
}

impl MemoryLoader {
    /// Create a new empty loader.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style registration, for fixtures.
    #[must_use]
    pub fn with_template(
        self,
        path: impl Into<String>,
        filename: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        if let Ok(mut inner) = self.inner.write() {
            inner.insert(path.into(), Source::new(filename, content));
        }
        self
    }

    /// Register (or replace) the template behind a logical path.
    pub fn insert(
        &self,
        path: impl Into<String>,
        filename: impl Into<String>,
        content: impl Into<String>,
    ) -> TplmapResult<()> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| ApplicationError::StoreLockError)?;
        inner.insert(path.into(), Source::new(filename, content));
        Ok(())
    }

    /// Number of `load` calls served so far, successful or not.
    pub fn load_count(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }

    /// Get the number of registered logical paths.
    pub fn len(&self) -> usize {
        self.inner.read().map(|inner| inner.len()).unwrap_or(0)
    }

    /// Check if loader is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Loader for MemoryLoader {
    fn load(&self, path: &str) -> TplmapResult<Source> {
        self.loads.fetch_add(1, Ordering::SeqCst);

        let inner = self
            .inner
            .read()
            .map_err(|_| ApplicationError::StoreLockError)?;

        inner.get(path).cloned().ok_or_else(|| {
            ApplicationError::TemplateLoad {
                path: path.to_owned(),
                reason: "no such template registered".into(),
            }
            .into()
        })
    }

    fn exists(&self, path: &str) -> bool {
        self.inner
            .read()
            .map(|inner| inner.contains_key(path))
            .unwrap_or(false)
    }
}
