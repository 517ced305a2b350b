use std::collections::BTreeMap;

use tracing::warn;

use crate::grid::{GridCell, chebyshev};

use super::ActorId;

/// Actor holding a cell, with the display name used in collision messages.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Occupant {
    pub actor: ActorId,
    pub name: String,
}

/// Outcome of a nearest-free-cell search.
///
/// `Exhausted` carries the original cell back: it is the last-resort answer
/// when every cell within the radius is taken. Callers that must not stack
/// actors treat it as a failure; callers that only need a hint may use it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FreeCell {
    Free(GridCell),
    Exhausted(GridCell),
}

impl FreeCell {
    pub fn cell(self) -> GridCell {
        match self {
            FreeCell::Free(cell) | FreeCell::Exhausted(cell) => cell,
        }
    }

    pub fn is_free(self) -> bool {
        matches!(self, FreeCell::Free(_))
    }
}

/// Which actor stands on which cell.
///
/// # Invariants
///
/// - at most one actor per cell
/// - `cells` and `positions` are exact inverses of each other
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct OccupancyIndex {
    cells: BTreeMap<GridCell, Occupant>,
    positions: BTreeMap<ActorId, GridCell>,
}

impl OccupancyIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// True if some actor other than `excluding` holds `cell`.
    pub fn is_occupied(&self, cell: GridCell, excluding: Option<ActorId>) -> bool {
        match self.cells.get(&cell) {
            Some(occupant) => Some(occupant.actor) != excluding,
            None => false,
        }
    }

    pub fn occupant(&self, cell: GridCell) -> Option<&Occupant> {
        self.cells.get(&cell)
    }

    pub fn occupant_name(&self, cell: GridCell) -> Option<String> {
        self.cells.get(&cell).map(|occupant| occupant.name.clone())
    }

    pub fn cell_of(&self, actor: ActorId) -> Option<GridCell> {
        self.positions.get(&actor).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (GridCell, &Occupant)> + '_ {
        self.cells.iter().map(|(cell, occupant)| (*cell, occupant))
    }

    /// Places `actor` on `cell`, vacating any cell it held before.
    ///
    /// Returns false (and changes nothing) if another actor holds `cell`.
    pub fn insert(&mut self, actor: ActorId, name: impl Into<String>, cell: GridCell) -> bool {
        if self.is_occupied(cell, Some(actor)) {
            return false;
        }

        if let Some(previous) = self.positions.insert(actor, cell)
            && previous != cell
        {
            self.cells.remove(&previous);
        }
        self.cells.insert(
            cell,
            Occupant {
                actor,
                name: name.into(),
            },
        );
        true
    }

    /// Moves an already-indexed actor to `to`.
    ///
    /// Returns false if the actor is unknown or `to` is held by someone else.
    pub fn relocate(&mut self, actor: ActorId, to: GridCell) -> bool {
        let Some(from) = self.positions.get(&actor).copied() else {
            return false;
        };
        if from == to {
            return true;
        }
        if self.is_occupied(to, Some(actor)) {
            return false;
        }
        let Some(occupant) = self.cells.remove(&from) else {
            return false;
        };
        self.cells.insert(to, occupant);
        self.positions.insert(actor, to);
        true
    }

    /// Removes the actor, returning the cell it vacated.
    pub fn remove(&mut self, actor: ActorId) -> Option<GridCell> {
        let cell = self.positions.remove(&actor)?;
        self.cells.remove(&cell);
        Some(cell)
    }

    /// Drops every entry whose actor fails `keep`, returning the removed ids.
    pub fn retain(&mut self, mut keep: impl FnMut(ActorId) -> bool) -> Vec<ActorId> {
        let stale: Vec<ActorId> = self
            .positions
            .keys()
            .copied()
            .filter(|actor| !keep(*actor))
            .collect();
        for actor in &stale {
            self.remove(*actor);
        }
        stale
    }

    /// Expanding-ring search for the closest free cell within `max_radius`.
    ///
    /// Rings are visited from radius 0 outward; within a ring, cells closer
    /// in straight-line distance win, then lower `(x, z)`. If every cell is
    /// taken the original cell comes back as [`FreeCell::Exhausted`].
    pub fn nearest_free(&self, cell: GridCell, max_radius: u32) -> FreeCell {
        for radius in 0..=max_radius as i32 {
            let found = ring(cell, radius)
                .into_iter()
                .find(|candidate| !self.cells.contains_key(candidate));
            if let Some(free) = found {
                return FreeCell::Free(free);
            }
        }

        warn!(
            cell = ?cell,
            max_radius,
            "no free cell within search radius; falling back to origin cell"
        );
        FreeCell::Exhausted(cell)
    }
}

/// Cells at exactly Chebyshev distance `radius` from `center`, nearest first.
fn ring(center: GridCell, radius: i32) -> Vec<GridCell> {
    let mut cells: Vec<GridCell> = (-radius..=radius)
        .flat_map(|dx| (-radius..=radius).map(move |dz| center.offset(dx, dz)))
        .filter(|candidate| chebyshev(center, *candidate) == radius as u32)
        .collect();
    cells.sort_by_key(|candidate| {
        let dx = candidate.x - center.x;
        let dz = candidate.z - center.z;
        (dx * dx + dz * dz, candidate.x, candidate.z)
    });
    cells
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn excluded_actor_does_not_count_as_occupant() {
        let mut index = OccupancyIndex::new();
        assert!(index.insert(ActorId(1), "Aria", GridCell::new(2, 2)));

        assert!(index.is_occupied(GridCell::new(2, 2), None));
        assert!(index.is_occupied(GridCell::new(2, 2), Some(ActorId(7))));
        assert!(!index.is_occupied(GridCell::new(2, 2), Some(ActorId(1))));
        assert_eq!(
            index.occupant_name(GridCell::new(2, 2)).as_deref(),
            Some("Aria")
        );
        assert_eq!(index.occupant_name(GridCell::new(0, 0)), None);
    }

    #[test]
    fn insert_refuses_a_taken_cell() {
        let mut index = OccupancyIndex::new();
        assert!(index.insert(ActorId(1), "Aria", GridCell::ORIGIN));
        assert!(!index.insert(ActorId(2), "Goblin", GridCell::ORIGIN));
        assert_eq!(index.cell_of(ActorId(2)), None);
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn relocate_moves_both_directions_of_the_map() {
        let mut index = OccupancyIndex::new();
        index.insert(ActorId(1), "Aria", GridCell::ORIGIN);
        index.insert(ActorId(2), "Goblin", GridCell::new(1, 0));

        assert!(!index.relocate(ActorId(1), GridCell::new(1, 0)));
        assert!(index.relocate(ActorId(1), GridCell::new(0, 1)));
        assert_eq!(index.cell_of(ActorId(1)), Some(GridCell::new(0, 1)));
        assert!(index.occupant(GridCell::ORIGIN).is_none());
    }

    #[test]
    fn nearest_free_walks_outward() {
        let mut index = OccupancyIndex::new();
        index.insert(ActorId(1), "A", GridCell::ORIGIN);

        assert_eq!(
            index.nearest_free(GridCell::new(5, 5), 2),
            FreeCell::Free(GridCell::new(5, 5))
        );
        // Cardinal neighbours are closer than diagonal ones.
        let found = index.nearest_free(GridCell::ORIGIN, 2);
        assert!(found.is_free());
        assert_eq!(chebyshev(found.cell(), GridCell::ORIGIN), 1);
        assert_ne!(found.cell().x.abs() + found.cell().z.abs(), 2);
    }

    #[test]
    fn nearest_free_falls_back_to_origin_when_exhausted() {
        let mut index = OccupancyIndex::new();
        let mut next = 0;
        for dx in -1..=1 {
            for dz in -1..=1 {
                index.insert(ActorId(next), "filler", GridCell::new(dx, dz));
                next += 1;
            }
        }

        assert_eq!(
            index.nearest_free(GridCell::ORIGIN, 1),
            FreeCell::Exhausted(GridCell::ORIGIN)
        );
        assert!(index.nearest_free(GridCell::ORIGIN, 2).is_free());
    }

    #[test]
    fn retain_prunes_stale_entries() {
        let mut index = OccupancyIndex::new();
        index.insert(ActorId(1), "A", GridCell::new(0, 0));
        index.insert(ActorId(2), "B", GridCell::new(1, 0));

        let removed = index.retain(|actor| actor == ActorId(1));
        assert_eq!(removed, vec![ActorId(2)]);
        assert!(!index.is_occupied(GridCell::new(1, 0), None));
    }
}
