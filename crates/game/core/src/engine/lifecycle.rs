//! Actors entering and leaving grid mode, and explicit freeze control.

use tracing::{debug, error, warn};

use crate::env::TacticsEnv;
use crate::grid::WorldPoint;
use crate::movement::MoveError;
use crate::state::{Actor, ActorId, ActorSpec, FreeCell, FreezeCause};

use super::{CommandError, TacticsEngine};

impl<'a> TacticsEngine<'a> {
    /// Places a new actor on the free cell nearest to `at`.
    ///
    /// The ground under the chosen cell becomes the actor's reference height.
    /// A fully packed search radius is a hard failure; actors are never
    /// stacked on one cell.
    pub fn spawn_actor(
        &mut self,
        spec: &ActorSpec,
        at: WorldPoint,
        env: TacticsEnv<'_>,
    ) -> Result<ActorId, CommandError> {
        let wanted = self.snap().snap_fresh(at);
        let radius = self.config.spawn_search_radius;
        let cell = match self.state.occupancy.nearest_free(wanted, radius) {
            FreeCell::Free(cell) => cell,
            FreeCell::Exhausted(cell) => {
                return Err(CommandError::NoFreeCell { cell, radius });
            }
        };

        let ground = env
            .terrain()
            .ground_height(cell, at.y)
            .inspect_err(|e| error!(cell = ?cell, error = %e, "terrain probe failed during spawn"))?;
        let Some(ground) = ground else {
            return Err(CommandError::NoGroundToSpawn { cell });
        };

        let id = self.state.roster.next_id();
        if !self.state.occupancy.insert(id, spec.name.clone(), cell) {
            return Err(CommandError::NoFreeCell { cell, radius });
        }
        self.state.roster.insert(Actor::new(id, spec, cell, ground));

        debug!(actor = %id, name = %spec.name, cell = ?cell, "actor entered grid");
        Ok(id)
    }

    /// Removes an actor and everything that refers to it.
    ///
    /// Occupancy, any casting session, its overlay, pending timeline events
    /// and its place in the turn order all go. If it held the current turn,
    /// the next participant's budget is refilled.
    pub fn despawn_actor(&mut self, id: ActorId) -> Result<Actor, CommandError> {
        let actor = self
            .state
            .roster
            .remove(id)
            .ok_or(CommandError::ActorNotFound(id))?;

        if self.state.occupancy.remove(id).is_none() {
            warn!(actor = %id, "despawned actor had no occupancy entry");
        }
        self.state.casting.remove(id);
        self.state.overlay.clear(id);
        self.state.timeline.forget_actor(id);

        if self.state.turn.remove_participant(id) == Some(true) {
            self.begin_current_turn();
        }

        debug!(actor = %id, cell = ?actor.cell(), "actor left grid");
        Ok(actor)
    }

    /// Drops occupancy entries whose actor is no longer in the roster.
    pub fn prune_stale_occupancy(&mut self) -> Vec<ActorId> {
        let roster = &self.state.roster;
        let removed = self.state.occupancy.retain(|actor| roster.contains(actor));
        if !removed.is_empty() {
            warn!(count = removed.len(), "pruned stale occupancy entries");
        }
        removed
    }

    /// Holds an actor in place for the given reason.
    ///
    /// Casting freezes are owned by the casting path and cannot be set here.
    pub fn freeze(&mut self, id: ActorId, cause: FreezeCause) -> Result<(), CommandError> {
        if cause == FreezeCause::Casting {
            return Err(MoveError::Frozen { cause }.into());
        }
        let actor = self.actor_mut(id)?;
        if actor.freeze_cause() == Some(&FreezeCause::Casting) {
            return Err(MoveError::Frozen {
                cause: FreezeCause::Casting,
            }
            .into());
        }
        debug!(actor = %id, reason = %cause.reason(), "actor frozen by command");
        actor.set_freeze(cause);
        Ok(())
    }

    /// Releases a freeze. Returns the cause that was lifted, if any.
    ///
    /// A casting freeze with a live session can only be released by
    /// finalizing or cancelling the cast.
    pub fn unfreeze(&mut self, id: ActorId) -> Result<Option<FreezeCause>, CommandError> {
        let casting = self.state.casting.is_casting(id);
        let actor = self.actor_mut(id)?;
        if casting && actor.freeze_cause() == Some(&FreezeCause::Casting) {
            return Err(MoveError::Frozen {
                cause: FreezeCause::Casting,
            }
            .into());
        }
        Ok(actor.clear_freeze())
    }
}
