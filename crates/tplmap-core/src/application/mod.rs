//! Application layer for tplmap.
//!
//! This layer contains:
//! - **Services**: Use case orchestration (TraceService)
//! - **Ports**: Interface definitions (traits) for external dependencies
//! - **Errors**: Application-specific error types
//!
//! The application layer coordinates the domain layer but contains no
//! mapping logic itself. The algorithm lives in `crate::domain::source_map`.

pub mod error;
pub mod ports;
pub mod services;

// Re-export main services
pub use services::TraceService;

// Re-export port traits (for adapter implementation)
pub use ports::{Loader, MapStore};

pub use error::ApplicationError;
