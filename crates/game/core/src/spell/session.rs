//! Casting state machine for a single actor.
//!
//! ```text
//! (no session) --prepare--> Preparing --aim moves--> Aiming
//!                               |                      |
//!                               +---- finalize ------->+--> Resolved
//!                               +---- cancel --------->+--> Cancelled
//!                               +---- timeout -------->+--> Expired
//! ```
//!
//! The session only tracks cells; freezing the avatar, spending slots and
//! applying effects are done by the engine around these transitions.

use std::collections::{BTreeMap, BTreeSet};
use std::time::Duration;

use arrayvec::ArrayVec;

use crate::config::TacticsConfig;
use crate::grid::{Facing, GridCell, chebyshev};
use crate::state::ActorId;

use super::{CastError, SpellDescriptor, pattern_cells};

/// Lifecycle position of a casting session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SessionState {
    Preparing,
    Aiming,
    Resolved,
    Cancelled,
    Expired,
}

impl SessionState {
    pub fn is_live(self) -> bool {
        matches!(self, SessionState::Preparing | SessionState::Aiming)
    }
}

/// Result of confirming the current aim cell as a target.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConfirmOutcome {
    Added { confirmed: usize },
    AlreadyConfirmed,
}

impl ConfirmOutcome {
    pub fn is_new(self) -> bool {
        matches!(self, ConfirmOutcome::Added { .. })
    }
}

/// A finalized cast, ready for effect resolution.
#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedCast {
    pub caster: ActorId,
    pub spell: SpellDescriptor,
    pub origin: GridCell,
    /// Cells the effect was aimed at (the origin for anchored patterns).
    pub targets: Vec<GridCell>,
    pub cells: BTreeSet<GridCell>,
}

type ConfirmedTargets = ArrayVec<GridCell, { TacticsConfig::MAX_TARGETS }>;

/// One actor's spell from preparation to resolution.
#[derive(Clone, Debug, PartialEq)]
pub struct CastingSession {
    caster: ActorId,
    spell: SpellDescriptor,
    origin: GridCell,
    facing: Facing,
    aim: GridCell,
    confirmed: ConfirmedTargets,
    started_at: Duration,
    state: SessionState,
}

impl CastingSession {
    /// Starts a session with the caster held at `origin`.
    pub fn prepare(
        caster: ActorId,
        spell: SpellDescriptor,
        origin: GridCell,
        facing: Facing,
        now: Duration,
    ) -> Self {
        Self {
            caster,
            spell,
            origin,
            facing,
            aim: origin,
            confirmed: ConfirmedTargets::new(),
            started_at: now,
            state: SessionState::Preparing,
        }
    }

    pub fn caster(&self) -> ActorId {
        self.caster
    }

    pub fn spell(&self) -> &SpellDescriptor {
        &self.spell
    }

    pub fn origin(&self) -> GridCell {
        self.origin
    }

    pub fn facing(&self) -> Facing {
        self.facing
    }

    pub fn aim(&self) -> GridCell {
        self.aim
    }

    pub fn confirmed(&self) -> &[GridCell] {
        &self.confirmed
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn started_at(&self) -> Duration {
        self.started_at
    }

    pub fn is_origin_anchored(&self) -> bool {
        self.spell.pattern.is_origin_anchored()
    }

    pub fn is_expired(&self, now: Duration, timeout: Duration) -> bool {
        now.saturating_sub(self.started_at) > timeout
    }

    /// Marks a live session as timed out.
    pub fn expire(&mut self) {
        if self.state.is_live() {
            self.state = SessionState::Expired;
        }
    }

    /// Cells to highlight right now.
    ///
    /// Anchored patterns never depend on the aim; aimed patterns show the
    /// shape around every confirmed target plus the live aim cell.
    pub fn preview(&self) -> BTreeSet<GridCell> {
        if self.is_origin_anchored() {
            return self.cells_around(self.origin);
        }
        let mut cells = self.cells_around(self.aim);
        for target in &self.confirmed {
            cells.extend(self.cells_around(*target));
        }
        cells
    }

    /// Follows the caster's real body while the avatar stays frozen.
    ///
    /// Returns true if the aim cell changed. Anchored sessions ignore movement.
    pub fn on_actor_moved(&mut self, real_cell: GridCell) -> bool {
        if !self.state.is_live() || self.is_origin_anchored() || real_cell == self.aim {
            return false;
        }
        self.aim = real_cell;
        self.state = SessionState::Aiming;
        true
    }

    /// Locks in the current aim cell as one of a multi-target spell's targets.
    pub fn confirm_target(&mut self) -> Result<ConfirmOutcome, CastError> {
        if !self.state.is_live() {
            return Err(CastError::NoActiveSession);
        }
        if !self.spell.is_multi_target() {
            return Err(CastError::NotMultiTarget);
        }
        if self.confirmed.contains(&self.aim) {
            return Ok(ConfirmOutcome::AlreadyConfirmed);
        }
        let max = self.spell.target_limit();
        if self.confirmed.len() >= max {
            return Err(CastError::TargetLimitReached { max });
        }
        self.confirmed
            .try_push(self.aim)
            .map_err(|_| CastError::TargetLimitReached { max })?;
        Ok(ConfirmOutcome::Added {
            confirmed: self.confirmed.len(),
        })
    }

    /// Checks range and resolves the affected cells without ending the session.
    pub fn resolve(&self) -> Result<ResolvedCast, CastError> {
        if !self.state.is_live() {
            return Err(CastError::NoActiveSession);
        }

        let targets = self.targets();
        let range = self.spell.range;
        if range > 0 {
            for target in &targets {
                let distance = chebyshev(self.origin, *target);
                if distance > range {
                    return Err(CastError::OutOfRange {
                        distance,
                        max: range,
                    });
                }
            }
        }

        let mut cells = BTreeSet::new();
        for target in &targets {
            cells.extend(self.cells_around(*target));
        }

        Ok(ResolvedCast {
            caster: self.caster,
            spell: self.spell.clone(),
            origin: self.origin,
            targets,
            cells,
        })
    }

    /// [`resolve`](Self::resolve), then marks the session resolved.
    ///
    /// On `OutOfRange` the session is left exactly as it was so the player
    /// can step closer and try again.
    pub fn finalize(&mut self) -> Result<ResolvedCast, CastError> {
        let cast = self.resolve()?;
        self.state = SessionState::Resolved;
        Ok(cast)
    }

    /// Abandons the session. Returns false if it was no longer live.
    pub fn cancel(&mut self) -> bool {
        if !self.state.is_live() {
            return false;
        }
        self.state = SessionState::Cancelled;
        true
    }

    fn targets(&self) -> Vec<GridCell> {
        if self.is_origin_anchored() {
            vec![self.origin]
        } else if self.spell.is_multi_target() && !self.confirmed.is_empty() {
            self.confirmed.to_vec()
        } else {
            vec![self.aim]
        }
    }

    fn cells_around(&self, center: GridCell) -> BTreeSet<GridCell> {
        pattern_cells(
            self.spell.pattern,
            self.facing,
            center,
            self.spell.range,
            self.spell.area,
        )
    }
}

/// Live casting sessions, at most one per actor.
#[derive(Clone, Debug, Default)]
pub struct CastingRegistry {
    sessions: BTreeMap<ActorId, CastingSession>,
}

impl CastingRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, actor: ActorId) -> Option<&CastingSession> {
        self.sessions.get(&actor)
    }

    pub fn is_casting(&self, actor: ActorId) -> bool {
        self.sessions.contains_key(&actor)
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    pub(crate) fn get_mut(&mut self, actor: ActorId) -> Option<&mut CastingSession> {
        self.sessions.get_mut(&actor)
    }

    pub(crate) fn insert(&mut self, session: CastingSession) {
        self.sessions.insert(session.caster(), session);
    }

    pub(crate) fn remove(&mut self, actor: ActorId) -> Option<CastingSession> {
        self.sessions.remove(&actor)
    }

    /// Removes and returns the actor's session if it has outlived `timeout`.
    pub(crate) fn take_expired(
        &mut self,
        actor: ActorId,
        now: Duration,
        timeout: Duration,
    ) -> Option<CastingSession> {
        let expired = self
            .sessions
            .get(&actor)
            .is_some_and(|session| session.is_expired(now, timeout));
        if !expired {
            return None;
        }
        let mut session = self.sessions.remove(&actor)?;
        session.expire();
        Some(session)
    }
}
