use tracing::debug;

use crate::env::TacticsEnv;
use crate::grid::{GridCell, WorldPoint};
use crate::movement::{MoveError, MoveOutcome};
use crate::state::{ActorId, FreezeCause};

use super::{CommandError, TacticsEngine};

impl<'a> TacticsEngine<'a> {
    /// Handles a continuous position update from an actor's real body.
    ///
    /// The point is snapped with hysteresis against the held cell and the
    /// avatar advances at most one neighbour step toward it. While the
    /// actor is frozen for an aimed cast, the point moves the aim instead of
    /// the avatar and nothing else changes.
    pub fn request_move(
        &mut self,
        id: ActorId,
        point: WorldPoint,
        env: TacticsEnv<'_>,
    ) -> Result<MoveOutcome, CommandError> {
        let now = env.clock().now();
        self.actor(id)?;
        self.expire_session(id, now);

        if let Some(aim) = self.track_aim(id, point) {
            return Ok(MoveOutcome::Aimed { aim });
        }

        let validator = self.validator();
        let snap = self.snap();
        let gate = self.turn_gate(id);

        let state = &mut *self.state;
        let actor = state
            .roster
            .get_mut(id)
            .ok_or(CommandError::ActorNotFound(id))?;
        if !actor.try_latch_move() {
            return Err(MoveError::MoveInFlight.into());
        }

        let candidate = snap.step(actor.cell(), point);
        let result = validator.try_move(actor, candidate, &mut state.occupancy, env.terrain(), gate);
        actor.release_move_latch();

        if let Err(e) = &result {
            debug!(actor = %id, candidate = ?candidate, error = %e, "move rejected");
        }
        Ok(result?)
    }

    /// Routes a casting actor's body movement to its aim cell.
    ///
    /// Returns the new aim when the actor is held by an aimed session. The
    /// overlay is refreshed only if the aim actually changed cells.
    fn track_aim(&mut self, id: ActorId, point: WorldPoint) -> Option<GridCell> {
        let frozen_for_cast = self
            .state
            .roster
            .get(id)
            .is_some_and(|a| a.freeze_cause() == Some(&FreezeCause::Casting));
        if !frozen_for_cast {
            return None;
        }

        let snap = self.snap();
        let reference_y = self.state.roster.get(id).map(|a| a.reference_y())?;
        let session = self.state.casting.get_mut(id)?;
        if session.is_origin_anchored() || !session.state().is_live() {
            return None;
        }

        let cell = snap.snap(session.aim(), point);
        if session.on_actor_moved(cell) {
            let preview = session.preview();
            self.state.overlay.show(id, preview, reference_y);
            debug!(actor = %id, aim = ?cell, "aim moved");
        }
        Some(cell)
    }
}
