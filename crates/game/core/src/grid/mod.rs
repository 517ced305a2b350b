//! Grid coordinates, facings and world-to-grid conversion.
mod cell;
mod snap;

pub use cell::{Facing, GridCell, WorldPoint, chebyshev};
pub use snap::{GridSnap, cell_at, cell_center};
