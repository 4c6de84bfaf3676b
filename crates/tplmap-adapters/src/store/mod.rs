//! Source map store adapters.

mod filesystem;
mod memory;

pub use filesystem::FilesystemMapStore;
pub use memory::InMemoryMapStore;
