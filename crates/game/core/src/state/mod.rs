//! Authoritative in-memory state for one world session.
//!
//! [`TacticsState`] aggregates everything the engine mutates: the actor roster,
//! the occupancy index, combat turn order, live casting sessions, pending
//! overlay events and the scheduled-event timeline. None of it is persisted;
//! the session layer rebuilds it on restart.
mod actor;
mod occupancy;
mod roster;

pub use actor::{
    Actor, ActorId, ActorKind, ActorSpec, FreezeCause, Locomotion, MovementBudget, ResourceMeter,
    TerrainBlock,
};
pub use occupancy::{FreeCell, Occupant, OccupancyIndex};
pub use roster::ActorRoster;

use crate::overlay::OverlayManager;
use crate::schedule::Timeline;
use crate::spell::CastingRegistry;
use crate::turn::TurnManager;

/// State owned by the world timeline.
#[derive(Clone, Debug, Default)]
pub struct TacticsState {
    pub roster: ActorRoster,
    pub occupancy: OccupancyIndex,
    pub turn: TurnManager,
    pub casting: CastingRegistry,
    pub overlay: OverlayManager,
    pub timeline: Timeline,
    /// Base seed for initiative rolls; combined with a per-combat nonce.
    pub game_seed: u64,
}

impl TacticsState {
    pub fn new(game_seed: u64) -> Self {
        Self {
            game_seed,
            ..Self::default()
        }
    }

    pub fn actor(&self, id: ActorId) -> Option<&Actor> {
        self.roster.get(id)
    }
}
