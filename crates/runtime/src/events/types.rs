//! Event types for different topics.

use serde::{Deserialize, Serialize};

use tactics_core::{
    ActorId, EffectOutcome, Facing, FreezeCause, GridCell, Participant, SpellId,
};

/// Avatar placement on the grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MovementEvent {
    Spawned {
        actor: ActorId,
        name: String,
        cell: GridCell,
    },
    Despawned {
        actor: ActorId,
    },
    /// A step was accepted and committed.
    Moved {
        actor: ActorId,
        from: GridCell,
        to: GridCell,
        facing: Facing,
        /// Movement points deducted; zero outside combat.
        charged: f32,
    },
    /// The actor walked back onto its held cell and may move again.
    Unfrozen {
        actor: ActorId,
        cell: GridCell,
    },
    /// A casting actor's aim cell moved; the avatar did not.
    AimMoved {
        actor: ActorId,
        aim: GridCell,
    },
    /// A move was refused. `frozen` is the freeze left on the actor, if any.
    Rejected {
        actor: ActorId,
        code: String,
        message: String,
        frozen: Option<FreezeCause>,
    },
}

/// Combat turn order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TurnEvent {
    CombatStarted {
        order: Vec<Participant>,
    },
    TurnStarted {
        actor: ActorId,
        name: String,
        round: u32,
        new_round: bool,
    },
    CombatEnded,
}

/// Casting sessions and the effects they land.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CastingEvent {
    Prepared {
        caster: ActorId,
        spell: SpellId,
        origin: GridCell,
        frozen: bool,
    },
    TargetConfirmed {
        caster: ActorId,
        confirmed: usize,
    },
    Finalized {
        caster: ActorId,
        spell: SpellId,
        targets: Vec<GridCell>,
        /// Milliseconds on the world clock at which a projectile lands.
        impact_at_ms: Option<u64>,
    },
    Cancelled {
        caster: ActorId,
    },
    EffectApplied(EffectOutcome),
}
