//! Content factory for building oracles from data files.

use std::path::{Path, PathBuf};

use tactics_core::{ActorSpec, TacticsConfig};

use crate::loaders::{ActorLoader, ConfigLoader, LoadResult, SpellLoader, TerrainLoader};
use crate::spells::SpellTable;
use crate::terrain::Heightmap;

/// Content factory that loads all tactics content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── tactics.toml
/// ├── spells.ron
/// ├── actors.ron
/// └── terrain/
///     ├── crypt.ron
///     └── courtyard.ron
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Load tactics configuration from `tactics.toml`, or defaults if the
    /// file does not exist.
    pub fn load_config(&self) -> LoadResult<TacticsConfig> {
        let path = self.data_dir.join("tactics.toml");
        if !path.exists() {
            return Ok(TacticsConfig::default());
        }
        ConfigLoader::load(&path)
    }

    /// Load the spell catalogue from `spells.ron`.
    pub fn load_spells(&self) -> LoadResult<SpellTable> {
        SpellLoader::load(&self.data_dir.join("spells.ron"))
    }

    /// Load actor blueprints from `actors.ron`.
    pub fn load_actors(&self) -> LoadResult<Vec<(String, ActorSpec)>> {
        ActorLoader::load(&self.data_dir.join("actors.ron"))
    }

    /// Load a heightmap from `terrain/{name}.ron`.
    pub fn load_terrain(&self, name: &str) -> LoadResult<Heightmap> {
        let path = self.data_dir.join("terrain").join(format!("{}.ron", name));
        TerrainLoader::load(&path)
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}
