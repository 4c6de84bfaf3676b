//! Driven (output) ports - implemented by infrastructure.
//!
//! These traits define what the source map and the trace service need from
//! external systems. The `tplmap-adapters` crate provides implementations.

use crate::domain::Source;
use crate::error::TplmapResult;

/// Port for resolving logical template paths to their source.
///
/// Implemented by:
/// - `tplmap_adapters::loader::DirectoryLoader` (templates on disk)
/// - `tplmap_adapters::loader::MemoryLoader` (embedded templates, testing)
///
/// ## Design Notes
///
/// - `path` is the compiler's logical identifier, not a filesystem path
/// - The returned filename is canonical: two logical paths naming the same
///   file must return the same filename
/// - Implementations that cache must do so behind their own lock
#[cfg_attr(test, mockall::automock)]
pub trait Loader: Send + Sync {
    /// Load the template behind a logical path.
    ///
    /// Fails with `ApplicationError::TemplateLoad` when the path cannot be
    /// resolved.
    fn load(&self, path: &str) -> TplmapResult<Source>;

    /// Check whether a logical path resolves to a template.
    fn exists(&self, path: &str) -> bool;
}

/// Port for persisting serialized source maps next to compiled templates.
///
/// Implemented by:
/// - `tplmap_adapters::store::InMemoryMapStore` (process-local)
/// - `tplmap_adapters::store::FilesystemMapStore` (cache directory)
#[cfg_attr(test, mockall::automock)]
pub trait MapStore: Send + Sync {
    /// Insert or replace the entry for `key`.
    fn put(&self, key: &str, data: &str) -> TplmapResult<()>;

    /// Fetch the entry for `key`, `None` if absent.
    fn get(&self, key: &str) -> TplmapResult<Option<String>>;

    /// Remove the entry for `key`. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> TplmapResult<()>;

    /// List stored keys.
    fn keys(&self) -> TplmapResult<Vec<String>>;
}
