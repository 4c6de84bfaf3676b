//! Unified error handling for tplmap core.
//!
//! This module provides a unified error type that wraps domain and application
//! errors, with user-actionable suggestions.

use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::DomainError;

/// Root error type for tplmap core operations.
#[derive(Debug, Error, Clone)]
pub enum TplmapError {
    /// Errors from the domain layer (map encoding and decoding).
    #[error("Source map error: {0}")]
    Domain(#[from] DomainError),

    /// Errors from the application layer (loaders and stores).
    #[error("{0}")]
    Application(#[from] ApplicationError),
}

impl TplmapError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Domain(e) => e.suggestions(),
            Self::Application(e) => e.suggestions(),
        }
    }

    /// Get error category for display/styling purposes.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Domain(e) => match e.category() {
                crate::domain::ErrorCategory::Decode => ErrorCategory::Decode,
                crate::domain::ErrorCategory::Internal => ErrorCategory::Internal,
            },
            Self::Application(e) => e.category(),
        }
    }

    /// `true` when a stored map is unusable and must be recomputed.
    pub fn is_decode(&self) -> bool {
        matches!(self, Self::Domain(e) if e.is_decode())
    }

    /// `true` when the failure came from a missing template.
    pub fn is_load(&self) -> bool {
        matches!(
            self,
            Self::Application(ApplicationError::TemplateLoad { .. })
        )
    }
}

/// Error categories for UI display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Decode,
    NotFound,
    Internal,
}

/// Convenient result type alias.
pub type TplmapResult<T> = Result<T, TplmapError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_errors_are_flagged() {
        let err: TplmapError = DomainError::Decode {
            reason: "eof".into(),
        }
        .into();
        assert!(err.is_decode());
        assert!(!err.is_load());
        assert_eq!(err.category(), ErrorCategory::Decode);
    }

    #[test]
    fn load_errors_are_not_found() {
        let err: TplmapError = ApplicationError::TemplateLoad {
            path: "base.tpl".into(),
            reason: "missing".into(),
        }
        .into();
        assert!(err.is_load());
        assert_eq!(err.category(), ErrorCategory::NotFound);
        assert!(err.to_string().contains("base.tpl"));
    }

    #[test]
    fn encode_failures_are_internal() {
        let err: TplmapError = DomainError::Encode {
            reason: "writer closed".into(),
        }
        .into();
        assert!(!err.is_decode());
        assert_eq!(err.category(), ErrorCategory::Internal);
    }
}
