//! Heightmap terrain served through [`tactics_core::TerrainProbe`].
use tactics_content::Heightmap;
use tactics_core::{GridCell, ProbeError, TerrainProbe};

/// TerrainProbe implementation over a static heightmap.
///
/// Ground is the floor closest to the reference height inside the scan
/// window `[reference - scan_down, reference + scan_up]`; ties go to the
/// higher floor. Cells outside the loaded bounds report
/// [`ProbeError::Unloaded`] rather than "no ground".
pub struct HeightmapTerrain {
    map: Heightmap,
}

impl HeightmapTerrain {
    pub fn new(map: Heightmap) -> Self {
        Self { map }
    }

    pub fn heightmap(&self) -> &Heightmap {
        &self.map
    }

    fn loaded(&self, cell: GridCell) -> Result<(), ProbeError> {
        if self.map.contains(cell) {
            Ok(())
        } else {
            Err(ProbeError::Unloaded { cell })
        }
    }
}

impl TerrainProbe for HeightmapTerrain {
    fn ground_height(&self, cell: GridCell, reference_y: f32) -> Result<Option<f32>, ProbeError> {
        self.loaded(cell)?;

        let low = reference_y - self.map.scan_down;
        let high = reference_y + self.map.scan_up;
        let floors: &[f32] = match self.map.column(cell) {
            Some(column) => &column.floors,
            None => self.map.default_floor.as_slice(),
        };

        let ground = floors
            .iter()
            .copied()
            .filter(|floor| (low..=high).contains(floor))
            .min_by(|a, b| {
                let da = (a - reference_y).abs();
                let db = (b - reference_y).abs();
                da.total_cmp(&db).then(b.total_cmp(a))
            });
        Ok(ground)
    }

    fn has_fluid_above(&self, cell: GridCell, ground_y: f32) -> Result<bool, ProbeError> {
        self.loaded(cell)?;

        let top = ground_y + self.map.clearance;
        Ok(self
            .map
            .column(cell)
            .is_some_and(|column| column.fluid.iter().any(|span| span.overlaps(ground_y, top))))
    }
}
