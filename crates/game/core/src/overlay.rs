//! Cell-highlight requests for the rendering layer.
//!
//! The core never owns overlay entities. It records "show these cells" and
//! "clear" events per owner, and the embedding layer drains and renders them.

use std::collections::{BTreeMap, BTreeSet};

use crate::grid::GridCell;
use crate::state::ActorId;

/// Request sent to the rendering layer.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OverlayEvent {
    Show {
        owner: ActorId,
        cells: BTreeSet<GridCell>,
        reference_y: f32,
    },
    Clear {
        owner: ActorId,
    },
}

/// Tracks which owners currently have a highlight up.
///
/// Each `show` bumps the owner's generation so a delayed clear scheduled for
/// an older preview does not remove a newer one.
#[derive(Clone, Debug, Default)]
pub struct OverlayManager {
    shown: BTreeMap<ActorId, (u64, BTreeSet<GridCell>)>,
    pending: Vec<OverlayEvent>,
    next_generation: u64,
}

impl OverlayManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_showing(&self, owner: ActorId) -> bool {
        self.shown.contains_key(&owner)
    }

    pub fn cells(&self, owner: ActorId) -> Option<&BTreeSet<GridCell>> {
        self.shown.get(&owner).map(|(_, cells)| cells)
    }

    /// Replaces the owner's highlight. Returns the new generation.
    pub fn show(&mut self, owner: ActorId, cells: BTreeSet<GridCell>, reference_y: f32) -> u64 {
        self.next_generation += 1;
        let generation = self.next_generation;
        self.shown.insert(owner, (generation, cells.clone()));
        self.pending.push(OverlayEvent::Show {
            owner,
            cells,
            reference_y,
        });
        generation
    }

    /// Removes the owner's highlight. Returns false if none was up.
    pub fn clear(&mut self, owner: ActorId) -> bool {
        if self.shown.remove(&owner).is_none() {
            return false;
        }
        self.pending.push(OverlayEvent::Clear { owner });
        true
    }

    /// Clears only if the highlight is still the one from `generation`.
    pub fn clear_generation(&mut self, owner: ActorId, generation: u64) -> bool {
        match self.shown.get(&owner) {
            Some((current, _)) if *current == generation => self.clear(owner),
            _ => false,
        }
    }

    /// Generation of the owner's current highlight.
    pub fn generation(&self, owner: ActorId) -> Option<u64> {
        self.shown.get(&owner).map(|(generation, _)| *generation)
    }

    /// Takes every event recorded since the last drain, oldest first.
    pub fn drain(&mut self) -> Vec<OverlayEvent> {
        std::mem::take(&mut self.pending)
    }
}
