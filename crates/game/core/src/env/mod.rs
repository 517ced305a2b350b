//! Traits describing the collaborators the engine reads from but never owns.
//!
//! The world engine supplies terrain, the content layer supplies spell tables,
//! and randomness and time are injected so every operation stays replayable.
//! [`TacticsEnv`] bundles borrowed references to all four for one engine call.
mod clock;
mod rng;
mod spells;
mod terrain;

pub use clock::{Clock, ManualClock, SystemClock};
pub use rng::{PcgRng, RngOracle, roll_seed};
pub use spells::SpellOracle;
pub use terrain::{FlatTerrain, ProbeError, TerrainProbe};

/// Borrowed collaborators for a single engine operation.
#[derive(Clone, Copy)]
pub struct TacticsEnv<'a> {
    terrain: &'a dyn TerrainProbe,
    spells: &'a dyn SpellOracle,
    rng: &'a dyn RngOracle,
    clock: &'a dyn Clock,
}

impl<'a> TacticsEnv<'a> {
    pub fn new(
        terrain: &'a dyn TerrainProbe,
        spells: &'a dyn SpellOracle,
        rng: &'a dyn RngOracle,
        clock: &'a dyn Clock,
    ) -> Self {
        Self {
            terrain,
            spells,
            rng,
            clock,
        }
    }

    pub fn terrain(&self) -> &'a dyn TerrainProbe {
        self.terrain
    }

    pub fn spells(&self) -> &'a dyn SpellOracle {
        self.spells
    }

    pub fn rng(&self) -> &'a dyn RngOracle {
        self.rng
    }

    pub fn clock(&self) -> &'a dyn Clock {
        self.clock
    }
}
