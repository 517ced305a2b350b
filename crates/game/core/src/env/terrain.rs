use crate::grid::GridCell;

/// The world engine failed to answer a terrain query at all.
///
/// Distinct from "no ground found": that is `Ok(None)` and simply makes a move
/// invalid. This error means the engine boundary itself is broken.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ProbeError {
    #[error("terrain probe unavailable: {0}")]
    Unavailable(String),

    #[error("terrain at {cell} is not loaded")]
    Unloaded { cell: GridCell },
}

/// Ground and fluid queries implemented by the world engine.
///
/// Ground and fluid live in independent layers of the world model, so they are
/// separate queries; implementations must not fold fluid into ground height.
pub trait TerrainProbe: Send + Sync {
    /// Height of walkable ground in `cell`, scanning a window around
    /// `reference_y`. `Ok(None)` when the window holds no ground.
    fn ground_height(&self, cell: GridCell, reference_y: f32) -> Result<Option<f32>, ProbeError>;

    /// Whether the two-cell-tall volume above `ground_y` in `cell` holds any
    /// fluid (water, lava, poison).
    fn has_fluid_above(&self, cell: GridCell, ground_y: f32) -> Result<bool, ProbeError>;
}

/// Level ground everywhere at a fixed height with no fluid.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FlatTerrain {
    pub height: f32,
}

impl FlatTerrain {
    pub fn new(height: f32) -> Self {
        Self { height }
    }
}

impl TerrainProbe for FlatTerrain {
    fn ground_height(&self, _cell: GridCell, _reference_y: f32) -> Result<Option<f32>, ProbeError> {
        Ok(Some(self.height))
    }

    fn has_fluid_above(&self, _cell: GridCell, _ground_y: f32) -> Result<bool, ProbeError> {
        Ok(false)
    }
}
