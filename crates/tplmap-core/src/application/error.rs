//! Application layer errors.
//!
//! These errors represent failures at the ports (template loading, map
//! storage), not in the source map itself. Map decoding and encoding errors
//! are `DomainError` from `crate::domain`.

use thiserror::Error;

use crate::error::ErrorCategory;

/// Errors that occur while talking to loaders and stores.
#[derive(Debug, Error, Clone)]
pub enum ApplicationError {
    /// A referenced template could not be resolved by the loader.
    #[error("Failed to load template '{path}': {reason}")]
    TemplateLoad { path: String, reason: String },

    /// No source map is stored under this key.
    #[error("No source map stored for '{key}'")]
    MapNotFound { key: String },

    /// The map store failed to read or write an entry.
    #[error("Map store error for '{key}': {reason}")]
    StoreError { key: String, reason: String },

    /// Store access failed (lock poisoned).
    #[error("Map store lock poisoned")]
    StoreLockError,
}

impl ApplicationError {
    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::TemplateLoad { path, .. } => vec![
                format!("Template '{}' could not be loaded", path),
                "Check the templates root directory and file extension".into(),
                "Missing includes are fatal: fix the include or add the file".into(),
            ],
            Self::MapNotFound { key } => vec![
                format!("Nothing cached under '{}'", key),
                "Build the map first: tplmap build".into(),
            ],
            Self::StoreError { .. } => vec![
                "Check that the cache directory exists and is writable".into(),
            ],
            Self::StoreLockError => vec![
                "The map store is locked".into(),
                "Try again in a moment".into(),
            ],
        }
    }

    /// Get error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::TemplateLoad { .. } | Self::MapNotFound { .. } => ErrorCategory::NotFound,
            Self::StoreError { .. } | Self::StoreLockError => ErrorCategory::Internal,
        }
    }
}
