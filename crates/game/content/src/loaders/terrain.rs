//! Heightmap loader.

use std::path::Path;

use crate::loaders::{LoadResult, read_file};
use crate::terrain::Heightmap;

/// Loader for heightmaps from RON files.
pub struct TerrainLoader;

impl TerrainLoader {
    /// Load a heightmap from a RON file.
    ///
    /// Columns outside the declared bounds, inverted fluid spans and
    /// negative scan windows are rejected.
    pub fn load(path: &Path) -> LoadResult<Heightmap> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<Heightmap> {
        let map: Heightmap = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse heightmap RON: {}", e))?;

        if map.min.x > map.max.x || map.min.z > map.max.z {
            anyhow::bail!("Heightmap bounds are inverted: {} .. {}", map.min, map.max);
        }
        if map.scan_up < 0.0 || map.scan_down < 0.0 || map.clearance < 0.0 {
            anyhow::bail!("Heightmap scan window and clearance must not be negative");
        }
        for (cell, column) in &map.columns {
            if !map.contains(*cell) {
                anyhow::bail!("Column {} lies outside the heightmap bounds", cell);
            }
            if let Some(span) = column.fluid.iter().find(|span| span.top < span.bottom) {
                anyhow::bail!(
                    "Fluid span at {} is inverted ({} > {})",
                    cell,
                    span.bottom,
                    span.top
                );
            }
        }

        Ok(map)
    }
}
