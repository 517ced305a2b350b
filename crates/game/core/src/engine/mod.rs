//! Command verbs over [`TacticsState`].
//!
//! [`TacticsEngine`] is the single entry point that mutates state. It borrows
//! the state for one call, pulls collaborators from a [`TacticsEnv`], and
//! returns an explicit outcome or a [`CommandError`]. Callers are expected to
//! serialize calls on one world timeline; nothing here locks.

mod casting;
mod combat;
mod errors;
mod lifecycle;
mod movement;
mod timeline;

pub use casting::{CancelOutcome, CastResolution, CastPreview, ImpactTiming};
pub use combat::TurnChange;
pub use errors::CommandError;
pub use timeline::TimelineOutcome;

use std::time::Duration;

use tracing::debug;

use crate::config::TacticsConfig;
use crate::grid::GridSnap;
use crate::movement::{MovementValidator, TurnGate};
use crate::state::{Actor, ActorId, FreezeCause, TacticsState};

/// Engine that validates and applies commands against the world state.
pub struct TacticsEngine<'a> {
    state: &'a mut TacticsState,
    config: &'a TacticsConfig,
}

impl<'a> TacticsEngine<'a> {
    pub fn new(state: &'a mut TacticsState, config: &'a TacticsConfig) -> Self {
        Self { state, config }
    }

    pub fn state(&self) -> &TacticsState {
        &*self.state
    }

    pub fn config(&self) -> &TacticsConfig {
        self.config
    }

    fn validator(&self) -> MovementValidator {
        MovementValidator::new(self.config)
    }

    fn snap(&self) -> GridSnap {
        GridSnap::new(self.config.cell_size)
    }

    fn actor(&self, id: ActorId) -> Result<&Actor, CommandError> {
        self.state.roster.get(id).ok_or(CommandError::ActorNotFound(id))
    }

    fn actor_mut(&mut self, id: ActorId) -> Result<&mut Actor, CommandError> {
        self.state
            .roster
            .get_mut(id)
            .ok_or(CommandError::ActorNotFound(id))
    }

    fn turn_gate(&self, actor: ActorId) -> TurnGate {
        if self.state.turn.is_active() {
            TurnGate::Combat {
                is_turn: self.state.turn.is_current(actor),
            }
        } else {
            TurnGate::Free
        }
    }

    /// Discards the actor's session if it has timed out.
    ///
    /// A casting freeze left behind becomes a collision freeze so the player
    /// walks back onto the held cell to recover. Returns true if a session
    /// was discarded.
    fn expire_session(&mut self, actor: ActorId, now: Duration) -> bool {
        let timeout = self.config.cast_timeout();
        let Some(session) = self.state.casting.take_expired(actor, now, timeout) else {
            return false;
        };
        debug!(
            actor = %actor,
            spell = %session.spell().id,
            "casting session expired"
        );
        self.release_casting_freeze(actor, true);
        self.state.overlay.clear(actor);
        true
    }

    /// Lifts a casting freeze, or retags it as a collision freeze.
    fn release_casting_freeze(&mut self, actor: ActorId, keep_held: bool) {
        let Some(target) = self.state.roster.get_mut(actor) else {
            return;
        };
        if target.freeze_cause() != Some(&FreezeCause::Casting) {
            return;
        }
        if keep_held {
            target.set_freeze(FreezeCause::Collision { blocker: None });
        } else {
            target.clear_freeze();
        }
    }
}
