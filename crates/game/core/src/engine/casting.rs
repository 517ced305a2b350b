//! Casting verbs: prepare, confirm, finalize and cancel.

use std::collections::BTreeSet;
use std::time::Duration;

use tracing::debug;

use crate::combat::{EffectOutcome, resolve_cast};
use crate::env::TacticsEnv;
use crate::grid::{GridCell, chebyshev};
use crate::schedule::TimelineEvent;
use crate::spell::{CastError, CastingSession, ConfirmOutcome, ResolvedCast, SpellId};
use crate::state::{ActorId, FreezeCause};

use super::{CommandError, TacticsEngine};

/// What the caster sees right after preparing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CastPreview {
    pub spell: SpellId,
    pub origin: GridCell,
    pub aim: GridCell,
    pub cells: BTreeSet<GridCell>,
    /// The avatar is held at `origin` until the cast resolves.
    pub frozen: bool,
}

/// When a finalized cast's effect lands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ImpactTiming {
    /// Applied during finalize.
    Immediate(Vec<EffectOutcome>),
    /// A projectile is in flight; the effect lands when the timeline reaches `due`.
    Scheduled { due: Duration },
}

/// A finalized cast and its effect timing.
#[derive(Clone, Debug, PartialEq)]
pub struct CastResolution {
    pub cast: ResolvedCast,
    pub impact: ImpactTiming,
}

/// Result of a cancel request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CancelOutcome {
    /// The session was discarded. `held` is set when the avatar stays frozen
    /// at that cell until the player walks back onto it.
    Cancelled { held: Option<GridCell> },
    /// There was nothing to cancel.
    NoActiveSession,
}

impl<'a> TacticsEngine<'a> {
    /// Opens a casting session for `spell` at the caster's current cell.
    pub fn prepare_cast(
        &mut self,
        caster: ActorId,
        spell: SpellId,
        env: TacticsEnv<'_>,
    ) -> Result<CastPreview, CommandError> {
        let now = env.clock().now();
        let descriptor = env
            .spells()
            .spell(spell)
            .ok_or(CastError::UnknownSpell(spell))?
            .clone();

        let actor = self.actor(caster)?;
        let (origin, facing, reference_y) = (actor.cell(), actor.facing(), actor.reference_y());
        let slots = actor.spell_slots().current;
        let waiting = actor.freeze_cause() == Some(&FreezeCause::CombatTurn);

        // A turn-wait freeze is never overwritten by a casting freeze.
        if waiting || (self.state.turn.is_active() && !self.state.turn.is_current(caster)) {
            return Err(CastError::NotYourTurn.into());
        }
        self.expire_session(caster, now);
        if self.state.casting.is_casting(caster) {
            return Err(CastError::CastAlreadyActive.into());
        }
        if slots < descriptor.slot_cost {
            return Err(CastError::InsufficientSlots {
                need: descriptor.slot_cost,
                have: slots,
            }
            .into());
        }

        let frozen = descriptor.pattern.freezes_caster();
        let session = CastingSession::prepare(caster, descriptor, origin, facing, now);
        let cells = session.preview();
        let aim = session.aim();

        if frozen {
            self.actor_mut(caster)?.set_freeze(FreezeCause::Casting);
        }
        self.state.overlay.show(caster, cells.clone(), reference_y);
        self.state.casting.insert(session);

        debug!(actor = %caster, spell = %spell, origin = ?origin, frozen, "cast prepared");
        Ok(CastPreview {
            spell,
            origin,
            aim,
            cells,
            frozen,
        })
    }

    /// Confirms the current aim cell as a target of a multi-target spell.
    pub fn confirm_target(
        &mut self,
        caster: ActorId,
        env: TacticsEnv<'_>,
    ) -> Result<ConfirmOutcome, CommandError> {
        let now = env.clock().now();
        self.actor(caster)?;
        if self.expire_session(caster, now) {
            return Err(CastError::SessionExpired.into());
        }
        let reference_y = self.actor(caster)?.reference_y();

        let session = self
            .state
            .casting
            .get_mut(caster)
            .ok_or(CastError::NoActiveSession)?;
        let outcome = session.confirm_target()?;
        if outcome.is_new() {
            let preview = session.preview();
            self.state.overlay.show(caster, preview, reference_y);
        }
        debug!(actor = %caster, outcome = ?outcome, "target confirmed");
        Ok(outcome)
    }

    /// Range-checks and resolves the caster's session.
    ///
    /// On `OutOfRange` or missing slots the session stays live so the player
    /// can reposition and retry. On success the caster is released, slots are
    /// spent and the effect is applied now or scheduled for projectile impact.
    pub fn finalize_cast(
        &mut self,
        caster: ActorId,
        env: TacticsEnv<'_>,
    ) -> Result<CastResolution, CommandError> {
        let now = env.clock().now();
        let slots = self.actor(caster)?.spell_slots().current;
        if self.expire_session(caster, now) {
            return Err(CastError::SessionExpired.into());
        }
        if self.state.turn.is_active() && !self.state.turn.is_current(caster) {
            return Err(CastError::NotYourTurn.into());
        }

        let session = self
            .state
            .casting
            .get(caster)
            .ok_or(CastError::NoActiveSession)?;
        let cost = session.spell().slot_cost;
        if slots < cost {
            return Err(CastError::InsufficientSlots {
                need: cost,
                have: slots,
            }
            .into());
        }
        let cast = session.resolve()?;
        let due = self.impact_due(&cast, now)?;

        self.state.casting.remove(caster);
        self.actor_mut(caster)?.spend_slots(cost);
        self.release_casting_freeze(caster, false);
        self.linger_overlay(caster, now);

        let impact = match due {
            Some(due) => {
                self.state.timeline.schedule(
                    due,
                    TimelineEvent::ProjectileImpact { cast: cast.clone() },
                );
                ImpactTiming::Scheduled { due }
            }
            None => ImpactTiming::Immediate(resolve_cast(
                &cast,
                &mut self.state.roster,
                &self.state.occupancy,
            )),
        };

        debug!(
            actor = %caster,
            spell = %cast.spell.id,
            cells = cast.cells.len(),
            impact = ?impact,
            "cast finalized"
        );
        Ok(CastResolution { cast, impact })
    }

    /// Abandons the caster's session.
    ///
    /// A casting freeze is not lifted; it turns into a collision freeze at the
    /// held cell, released by walking back onto it.
    pub fn cancel_cast(
        &mut self,
        caster: ActorId,
        env: TacticsEnv<'_>,
    ) -> Result<CancelOutcome, CommandError> {
        let now = env.clock().now();
        self.actor(caster)?;
        if self.expire_session(caster, now) {
            return Ok(CancelOutcome::NoActiveSession);
        }

        let Some(mut session) = self.state.casting.remove(caster) else {
            return Ok(CancelOutcome::NoActiveSession);
        };
        if !session.cancel() {
            return Ok(CancelOutcome::NoActiveSession);
        }

        self.release_casting_freeze(caster, true);
        self.state.overlay.clear(caster);

        let held = self
            .state
            .roster
            .get(caster)
            .filter(|a| a.is_frozen())
            .map(|a| a.cell());
        debug!(actor = %caster, spell = %session.spell().id, held = ?held, "cast cancelled");
        Ok(CancelOutcome::Cancelled { held })
    }

    /// Keeps the caster's preview up for the configured linger, then clears it.
    fn linger_overlay(&mut self, caster: ActorId, now: Duration) {
        let linger = self.config.overlay_linger();
        if linger.is_zero() {
            self.state.overlay.clear(caster);
            return;
        }
        if let Some(generation) = self.state.overlay.generation(caster) {
            self.state.timeline.schedule(
                now + linger,
                TimelineEvent::ClearOverlay {
                    owner: caster,
                    generation,
                },
            );
        }
    }

    /// Timeline instant a projectile reaches its farthest target, travelling at
    /// the spell's speed in world units per second. `None` for instant spells.
    fn impact_due(&self, cast: &ResolvedCast, now: Duration) -> Result<Option<Duration>, CastError> {
        let Some(speed) = cast.spell.projectile_speed.filter(|speed| *speed > 0.0) else {
            return Ok(None);
        };
        let cells = cast
            .targets
            .iter()
            .map(|target| chebyshev(cast.origin, *target))
            .max()
            .unwrap_or(0);
        let secs = cells as f32 * self.config.cell_size / speed;
        Duration::try_from_secs_f32(secs)
            .ok()
            .and_then(|flight| now.checked_add(flight))
            .map(Some)
            .ok_or(CastError::ImpactOutOfReach(cast.spell.id))
    }
}
