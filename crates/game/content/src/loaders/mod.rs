//! Content loaders for reading tactics data from files.
//!
//! Each loader turns one RON/TOML file into a core type or content table.
//! [`ContentFactory`] resolves the conventional file names in a data
//! directory.

pub mod actors;
pub mod config;
pub mod factory;
pub mod spells;
pub mod terrain;

pub use actors::ActorLoader;
pub use config::ConfigLoader;
pub use factory::ContentFactory;
pub use spells::SpellLoader;
pub use terrain::TerrainLoader;

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}
