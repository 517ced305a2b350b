//! Grid tactics rules shared by the runtime and offline tools.
//!
//! `tactics-core` turns continuous avatar movement into validated grid steps,
//! keeps combat turn order and movement budgets, runs the spell casting state
//! machine and computes spell area patterns. All state mutation flows through
//! [`engine::TacticsEngine`]; terrain, spell tables, randomness and time are
//! injected through the traits in [`env`].
pub mod combat;
pub mod config;
pub mod engine;
pub mod env;
pub mod error;
pub mod grid;
pub mod movement;
pub mod overlay;
pub mod schedule;
pub mod spell;
pub mod state;
pub mod turn;

pub use combat::{EffectKind, EffectOutcome};
pub use config::TacticsConfig;
pub use engine::{
    CancelOutcome, CastPreview, CastResolution, CommandError, ImpactTiming, TacticsEngine,
    TimelineOutcome, TurnChange,
};
pub use env::{
    Clock, FlatTerrain, ManualClock, PcgRng, ProbeError, RngOracle, SpellOracle, SystemClock,
    TacticsEnv, TerrainProbe,
};
pub use error::{ErrorSeverity, TacticsError};
pub use grid::{Facing, GridCell, GridSnap, WorldPoint, chebyshev};
pub use movement::{MoveError, MoveOutcome, MovementValidator, TurnGate};
pub use overlay::{OverlayEvent, OverlayManager};
pub use schedule::{Timeline, TimelineEvent};
pub use spell::{
    CastError, CastingSession, ConfirmOutcome, DamageKind, ResolvedCast, SessionState,
    SpellDescriptor, SpellEffect, SpellId, SpellPattern, pattern_cells,
};
pub use state::{
    Actor, ActorId, ActorKind, ActorRoster, ActorSpec, FreeCell, FreezeCause, Locomotion,
    MovementBudget, OccupancyIndex, ResourceMeter, TacticsState, TerrainBlock,
};
pub use turn::{InitiativeRoll, Participant, TurnError, TurnManager};
