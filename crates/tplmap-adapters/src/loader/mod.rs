//! Template loader adapters.

mod directory;
mod memory;

pub use directory::DirectoryLoader;
pub use memory::MemoryLoader;
