// ============================================================================
// domain/error.rs - SOURCE MAP ERROR DOMAIN
// ============================================================================

use thiserror::Error;

/// Root domain error type.
///
/// All errors are:
/// - Cloneable (the service layer hands them back after eviction)
/// - Categorizable (for CLI display)
/// - Actionable (provides suggestions)
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    // ========================================================================
    // Decode Errors (stored map is unusable, recompute it)
    // ========================================================================
    #[error("Malformed source map: {reason}")]
    Decode { reason: String },

    #[error("Unsupported source map version {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },

    #[error("Chain record references path #{index} but only {len} paths are recorded")]
    InvalidPathIndex { index: usize, len: usize },

    // ========================================================================
    // Encode Errors (corrupted in-memory state)
    // ========================================================================
    #[error("Failed to encode source map: {reason}")]
    Encode { reason: String },
}

impl DomainError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Decode { reason } => vec![
                "The cached source map could not be read".into(),
                format!("Details: {}", reason),
                "Rebuild it: tplmap build".into(),
            ],
            Self::UnsupportedVersion { found, expected } => vec![
                format!(
                    "Map was written by a different tplmap release (v{} format, this build reads v{})",
                    found, expected
                ),
                "Clear the cache and rebuild the map".into(),
            ],
            Self::InvalidPathIndex { .. } => vec![
                "The cached source map is internally inconsistent".into(),
                "Delete the cache entry and rebuild it".into(),
            ],
            Self::Encode { .. } => vec!["This appears to be a bug, please report it".into()],
        }
    }

    /// Error category for CLI display styling.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Decode { .. } | Self::UnsupportedVersion { .. } | Self::InvalidPathIndex { .. } => {
                ErrorCategory::Decode
            }
            Self::Encode { .. } => ErrorCategory::Internal,
        }
    }

    /// `true` for every variant that means "stored bytes are unusable".
    pub fn is_decode(&self) -> bool {
        self.category() == ErrorCategory::Decode
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Decode,
    Internal,
}
