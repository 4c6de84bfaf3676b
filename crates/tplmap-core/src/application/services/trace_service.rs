//! Trace Service - source maps alongside a compiled-template cache.
//!
//! This service coordinates the source map lifecycle:
//! 1. Calculate a map when a template finishes compiling
//! 2. Store its serialized form under the template's cache key
//! 3. Decode it again to answer stack and dependency queries
//!
//! A stored entry that no longer decodes is evicted so the next compile
//! recomputes it.

use std::collections::BTreeMap;

use tracing::{debug, info, instrument, warn};

use crate::{
    application::{
        ApplicationError,
        ports::{Loader, MapStore},
    },
    domain::{Frame, Location, SourceMap},
    error::TplmapResult,
};

/// Source map orchestration over a loader and a map store.
pub struct TraceService {
    loader: Box<dyn Loader>,
    store: Box<dyn MapStore>,
}

impl TraceService {
    /// Create a new trace service with the given adapters.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// use tplmap_core::application::{TraceService, ports::*};
    ///
    /// let service = TraceService::new(
    ///     loader, // impl Loader
    ///     store,  // impl MapStore
    /// );
    /// ```
    pub fn new(loader: Box<dyn Loader>, store: Box<dyn MapStore>) -> Self {
        Self { loader, store }
    }

    /// Calculate the map for freshly generated output and store it.
    #[instrument(skip(self, content, locations), fields(locations = locations.len()))]
    pub fn record(
        &self,
        key: &str,
        content: &str,
        locations: &BTreeMap<usize, Location>,
    ) -> TplmapResult<SourceMap> {
        let map = SourceMap::calculate(content, locations, self.loader.as_ref())?;
        let encoded = map.serialize()?;
        self.store.put(key, &encoded)?;

        info!(lines = map.len(), "source map recorded");
        Ok(map)
    }

    /// Load and decode the stored map for `key`.
    ///
    /// # Errors
    ///
    /// - `ApplicationError::MapNotFound` if nothing is stored under `key`.
    /// - A decode error if the stored bytes are unusable; the entry is
    ///   removed before the error is returned so callers can recompute.
    #[instrument(skip(self))]
    pub fn load(&self, key: &str) -> TplmapResult<SourceMap> {
        let Some(encoded) = self.store.get(key)? else {
            return Err(ApplicationError::MapNotFound {
                key: key.to_owned(),
            }
            .into());
        };

        match SourceMap::deserialize(&encoded) {
            Ok(map) => {
                debug!(lines = map.len(), "source map loaded");
                Ok(map)
            }
            Err(e) if e.is_decode() => {
                warn!(error = %e, "evicting unreadable source map");
                self.store.remove(key)?;
                Err(e)
            }
            Err(e) => Err(e),
        }
    }

    /// Include stack for one output line of the template stored under `key`.
    pub fn trace(&self, key: &str, line: usize) -> TplmapResult<Vec<Frame>> {
        Ok(self.load(key)?.stack(line))
    }

    /// Template files the stored map depends on.
    pub fn dependencies(&self, key: &str) -> TplmapResult<Vec<String>> {
        Ok(self
            .load(key)?
            .paths()
            .into_iter()
            .map(str::to_owned)
            .collect())
    }

    /// Keys of every stored map.
    pub fn keys(&self) -> TplmapResult<Vec<String>> {
        self.store.keys()
    }

    /// Drop the stored map for `key`.
    pub fn forget(&self, key: &str) -> TplmapResult<()> {
        self.store.remove(key)
    }
}
