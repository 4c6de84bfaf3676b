// ============================================================================
//  CLEAN MODULE BOUNDARIES
// ============================================================================

//! Core domain layer for tplmap.
//!
//! Pure value types and the source map algorithm. Template loading is the
//! only outside capability the domain needs, and it reaches it through the
//! [`Loader`](crate::application::ports::Loader) port.
//!
//! ## Hexagonal Architecture Compliance
//!
//! - **No async**: Domain logic is synchronous
//! - **No I/O**: No filesystem, network, or external calls
//! - **Immutable values**: A finalized `SourceMap` is never mutated
//! - **Owned chains**: Chain records embed their parents by value
//!
// Public API - what the world sees
pub mod error;
pub mod location;
pub mod source;
pub mod source_map;

// Re-exports for convenience
pub use error::{DomainError, ErrorCategory};
pub use location::{Ancestors, Location};
pub use source::Source;
pub use source_map::{ChainRecord, FORMAT_VERSION, Frame, SourceMap};
