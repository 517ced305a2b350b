//! Data-driven content for the tactics layer.
//!
//! This crate holds the static tables the engine reads through its oracles:
//! - Spell catalogues (RON)
//! - Actor blueprints (RON)
//! - Heightmaps for terrain probing (RON)
//! - Tactics configuration (TOML)
//!
//! Content is consumed by runtime oracles and never appears in engine state.

pub mod spells;
pub mod terrain;

#[cfg(feature = "loaders")]
pub mod loaders;

pub use spells::SpellTable;
pub use terrain::{FluidSpan, Heightmap, TerrainColumn};

#[cfg(feature = "loaders")]
pub use loaders::{ActorLoader, ConfigLoader, ContentFactory, SpellLoader, TerrainLoader};
