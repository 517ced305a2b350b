//! Continuous world position to grid cell conversion.

use super::{GridCell, WorldPoint};

/// Cell containing the continuous position, by floor division.
pub fn cell_at(x: f32, z: f32, cell_size: f32) -> GridCell {
    GridCell::new(
        (x / cell_size).floor() as i32,
        (z / cell_size).floor() as i32,
    )
}

/// World-space `(x, z)` of the cell's center.
pub fn cell_center(cell: GridCell, cell_size: f32) -> (f32, f32) {
    let half = cell_size / 2.0;
    (
        cell.x as f32 * cell_size + half,
        cell.z as f32 * cell_size + half,
    )
}

/// Grid snapping with per-axis hysteresis.
///
/// An actor held in a cell only leaves it once its continuous position is a
/// full cell width away from that cell's center on some axis. Sitting exactly
/// on a cell edge therefore never flips the result back and forth.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridSnap {
    cell_size: f32,
}

impl GridSnap {
    pub fn new(cell_size: f32) -> Self {
        Self { cell_size }
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Snaps `point` relative to the cell the actor currently holds.
    ///
    /// When neither axis crosses its hysteresis threshold the held cell is
    /// returned unchanged. Once any axis crosses, the axes that did not cross
    /// fall back to raw floor division so diagonal exits land on the cell the
    /// point is actually in.
    pub fn snap(&self, held: GridCell, point: WorldPoint) -> GridCell {
        let (center_x, center_z) = cell_center(held, self.cell_size);
        let crosses_x = (point.x - center_x).abs() >= self.cell_size;
        let crosses_z = (point.z - center_z).abs() >= self.cell_size;

        if !crosses_x && !crosses_z {
            return held;
        }

        cell_at(point.x, point.z, self.cell_size)
    }

    /// Like [`snap`](Self::snap), but the result is limited to `held` or one
    /// of its eight neighbours.
    ///
    /// A position update that lands several cells away still only advances
    /// the avatar one step toward it; the next update continues from there.
    pub fn step(&self, held: GridCell, point: WorldPoint) -> GridCell {
        let target = self.snap(held, point);
        GridCell::new(
            held.x + (target.x - held.x).signum(),
            held.z + (target.z - held.z).signum(),
        )
    }

    /// Snap without history, used when an actor first enters the grid.
    pub fn snap_fresh(&self, point: WorldPoint) -> GridCell {
        cell_at(point.x, point.z, self.cell_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(x: f32, z: f32) -> WorldPoint {
        WorldPoint::new(x, 0.0, z)
    }

    #[test]
    fn cell_center_uses_half_spacing_offset() {
        assert_eq!(cell_center(GridCell::new(0, 0), 2.0), (1.0, 1.0));
        assert_eq!(cell_center(GridCell::new(-1, 3), 2.0), (-1.0, 7.0));
    }

    #[test]
    fn cell_at_floors_negative_coordinates() {
        assert_eq!(cell_at(-0.1, 0.1, 2.0), GridCell::new(-1, 0));
        assert_eq!(cell_at(3.9, -4.0, 2.0), GridCell::new(1, -2));
    }

    #[test]
    fn edge_positions_do_not_leave_the_held_cell() {
        let snap = GridSnap::new(2.0);
        let held = GridCell::new(0, 0);
        // Exactly on the boundary with cell (1, 0), and just past it.
        assert_eq!(snap.snap(held, at(2.0, 1.0)), held);
        assert_eq!(snap.snap(held, at(2.9, 1.0)), held);
    }

    #[test]
    fn crossing_a_full_cell_past_center_moves() {
        let snap = GridSnap::new(2.0);
        let held = GridCell::new(0, 0);
        assert_eq!(snap.snap(held, at(3.0, 1.0)), GridCell::new(1, 0));
        assert_eq!(snap.snap(held, at(-1.0, 1.0)), GridCell::new(-1, 0));
    }

    #[test]
    fn diagonal_exit_falls_back_to_raw_snap_on_other_axis() {
        let snap = GridSnap::new(2.0);
        let held = GridCell::new(0, 0);
        // x crosses; z is past the boundary but inside the hysteresis band.
        assert_eq!(snap.snap(held, at(3.2, 2.5)), GridCell::new(1, 1));
        // Both axes cross.
        assert_eq!(snap.snap(held, at(3.0, 3.0)), GridCell::new(1, 1));
    }

    #[test]
    fn repeated_snaps_are_idempotent() {
        let snap = GridSnap::new(2.0);
        let positions = [at(2.0, 2.0), at(3.5, 0.2), at(-1.0, -1.0), at(-2.5, 3.1)];
        for point in positions {
            let mut held = GridCell::ORIGIN;
            let first = snap.snap(held, point);
            for _ in 0..5 {
                assert_eq!(snap.snap(held, point), first);
            }
            held = first;
            assert_eq!(snap.snap(held, point), first);
        }
    }

    #[test]
    fn step_stays_within_one_cell_of_held() {
        let snap = GridSnap::new(2.0);
        let held = GridCell::ORIGIN;
        assert_eq!(snap.snap(held, at(5.0, 1.0)), GridCell::new(2, 0));
        assert_eq!(snap.step(held, at(5.0, 1.0)), GridCell::new(1, 0));
        assert_eq!(snap.step(held, at(19.0, 15.0)), GridCell::new(1, 1));
        assert_eq!(snap.step(held, at(-30.0, 1.0)), GridCell::new(-1, 0));
        // Inside the hysteresis band nothing moves.
        assert_eq!(snap.step(held, at(2.9, 2.9)), held);
    }
}
