//! Static heightmap data: walkable floors and fluid spans per grid column.
//!
//! This is plain data. Scanning it for ground within a window and checking
//! fluid clearance is done by the runtime's terrain oracle.

use std::collections::BTreeMap;

use tactics_core::GridCell;

/// Vertical range `[bottom, top)` filled with fluid.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FluidSpan {
    pub bottom: f32,
    pub top: f32,
}

impl FluidSpan {
    pub fn new(bottom: f32, top: f32) -> Self {
        Self { bottom, top }
    }

    /// True if the span overlaps `[from, to)`.
    pub fn overlaps(&self, from: f32, to: f32) -> bool {
        self.bottom < to && from < self.top
    }
}

/// Everything stacked in one grid column.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TerrainColumn {
    /// Heights of walkable surfaces, any order. Bridges and ledges add more
    /// than one.
    #[cfg_attr(feature = "serde", serde(default))]
    pub floors: Vec<f32>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub fluid: Vec<FluidSpan>,
}

/// Grid-aligned terrain for a region.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Heightmap {
    /// Inclusive corners of the loaded region. Queries outside it fail.
    pub min: GridCell,
    pub max: GridCell,
    /// Floor used for loaded cells with no explicit column. `None` means
    /// such cells have no ground at all.
    #[cfg_attr(feature = "serde", serde(default))]
    pub default_floor: Option<f32>,
    /// How far above the reference height the ground scan looks.
    #[cfg_attr(feature = "serde", serde(default = "default_scan_up"))]
    pub scan_up: f32,
    /// How far below the reference height the ground scan looks.
    #[cfg_attr(feature = "serde", serde(default = "default_scan_down"))]
    pub scan_down: f32,
    /// Height of the volume above ground that must be free of fluid.
    #[cfg_attr(feature = "serde", serde(default = "default_clearance"))]
    pub clearance: f32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub columns: BTreeMap<GridCell, TerrainColumn>,
}

impl Heightmap {
    pub const DEFAULT_SCAN_UP: f32 = 4.0;
    pub const DEFAULT_SCAN_DOWN: f32 = 6.0;
    pub const DEFAULT_CLEARANCE: f32 = 2.0;

    /// A flat region at `floor` height.
    pub fn flat(min: GridCell, max: GridCell, floor: f32) -> Self {
        Self {
            min,
            max,
            default_floor: Some(floor),
            scan_up: Self::DEFAULT_SCAN_UP,
            scan_down: Self::DEFAULT_SCAN_DOWN,
            clearance: Self::DEFAULT_CLEARANCE,
            columns: BTreeMap::new(),
        }
    }

    pub fn with_column(mut self, cell: GridCell, column: TerrainColumn) -> Self {
        self.columns.insert(cell, column);
        self
    }

    pub fn contains(&self, cell: GridCell) -> bool {
        (self.min.x..=self.max.x).contains(&cell.x) && (self.min.z..=self.max.z).contains(&cell.z)
    }

    /// The column at `cell`, or `None` for an implicit default column.
    pub fn column(&self, cell: GridCell) -> Option<&TerrainColumn> {
        self.columns.get(&cell)
    }
}

#[cfg(feature = "serde")]
fn default_scan_up() -> f32 {
    Heightmap::DEFAULT_SCAN_UP
}

#[cfg(feature = "serde")]
fn default_scan_down() -> f32 {
    Heightmap::DEFAULT_SCAN_DOWN
}

#[cfg(feature = "serde")]
fn default_clearance() -> f32 {
    Heightmap::DEFAULT_CLEARANCE
}
