//! Infrastructure adapters for tplmap.
//!
//! This crate implements the ports defined in `tplmap-core::application::ports`.
//! It contains all external dependencies and I/O operations.

pub mod loader;
pub mod store;

// Re-export commonly used adapters
pub use loader::{DirectoryLoader, MemoryLoader};
pub use store::{FilesystemMapStore, InMemoryMapStore};
