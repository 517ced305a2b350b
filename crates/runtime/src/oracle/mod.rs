//! Runtime wrappers around static tactics content.
//!
//! These implementations expose `tactics-core` oracle traits and bundle them
//! into an [`OracleManager`] so the worker can build [`TacticsEnv`] values on
//! demand. The data is immutable at runtime; dynamic state lives in
//! [`tactics_core::TacticsState`].
mod terrain;

use std::sync::Arc;
use std::time::Duration;

use tactics_content::SpellTable;
use tactics_content::loaders::{ContentFactory, LoadResult};
use tactics_core::{Clock, PcgRng, SystemClock, TacticsEnv, TerrainProbe};

pub use terrain::HeightmapTerrain;

/// Manages all oracle implementations and provides unified access
#[derive(Clone)]
pub struct OracleManager {
    pub(crate) terrain: Arc<dyn TerrainProbe>,
    pub(crate) spells: Arc<SpellTable>,
    pub(crate) clock: Arc<dyn Clock>,
    pub(crate) rng: PcgRng,
}

impl OracleManager {
    /// Creates a new oracle manager on the system clock.
    pub fn new(terrain: Arc<dyn TerrainProbe>, spells: Arc<SpellTable>) -> Self {
        Self {
            terrain,
            spells,
            clock: Arc::new(SystemClock::new()),
            rng: PcgRng, // PcgRng is stateless
        }
    }

    /// Loads `spells.ron` and `terrain/{terrain}.ron` from a data directory.
    pub fn from_content(factory: &ContentFactory, terrain: &str) -> LoadResult<Self> {
        let spells = factory.load_spells()?;
        let map = factory.load_terrain(terrain)?;
        Ok(Self::new(
            Arc::new(HeightmapTerrain::new(map)),
            Arc::new(spells),
        ))
    }

    /// Replaces the clock, e.g. with a [`tactics_core::ManualClock`] in tests.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Borrows every oracle as a [`TacticsEnv`] for one engine call.
    pub fn as_env(&self) -> TacticsEnv<'_> {
        TacticsEnv::new(
            self.terrain.as_ref(),
            self.spells.as_ref(),
            &self.rng,
            self.clock.as_ref(),
        )
    }

    pub fn now(&self) -> Duration {
        self.clock.now()
    }

    pub fn spells(&self) -> &SpellTable {
        &self.spells
    }
}
