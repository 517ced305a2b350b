use tracing::debug;

use crate::env::TacticsEnv;
use crate::state::{ActorId, FreezeCause};
use crate::turn::{InitiativeRoll, Participant, TurnError};

use super::{CommandError, TacticsEngine};

/// Whose turn it is after a turn change.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TurnChange {
    pub actor: ActorId,
    pub name: String,
    pub round: u32,
    /// The order wrapped and a new round began.
    pub new_round: bool,
}

impl<'a> TacticsEngine<'a> {
    /// Rolls initiative for every living actor and enters combat.
    ///
    /// Every participant's movement budget is refilled. If every roll clamps
    /// to zero the engine stays out of combat and reports
    /// [`TurnError::NoEligibleParticipants`].
    pub fn start_combat(&mut self, env: TacticsEnv<'_>) -> Result<Vec<Participant>, CommandError> {
        if self.state.turn.is_active() {
            return Err(TurnError::CombatAlreadyActive.into());
        }

        let seed = self.state.game_seed;
        let order = self
            .state
            .turn
            .start_combat(&self.state.roster, env.rng(), seed)
            .to_vec();
        if order.is_empty() {
            debug!("every participant skipped initiative; combat not started");
            return Err(TurnError::NoEligibleParticipants.into());
        }

        for participant in &order {
            if let Some(actor) = self.state.roster.get_mut(participant.actor) {
                actor.reset_movement();
            }
        }
        self.begin_current_turn();

        debug!(
            participants = order.len(),
            skipped = self.state.turn.skipped().len(),
            "combat started"
        );
        Ok(order)
    }

    /// Leaves combat, clearing the order and any turn-wait freezes.
    pub fn end_combat(&mut self) -> Result<(), CommandError> {
        if !self.state.turn.is_active() {
            return Err(TurnError::CombatNotActive.into());
        }
        let rounds = self.state.turn.round();
        self.state.turn.end_combat();

        let waiting: Vec<ActorId> = self
            .state
            .roster
            .iter()
            .filter(|a| a.freeze_cause() == Some(&FreezeCause::CombatTurn))
            .map(|a| a.id())
            .collect();
        for id in waiting {
            if let Some(actor) = self.state.roster.get_mut(id) {
                actor.clear_freeze();
            }
        }

        debug!(rounds, "combat ended");
        Ok(())
    }

    /// Passes the turn to the next participant still on the grid.
    pub fn advance_turn(&mut self) -> Result<TurnChange, CommandError> {
        if !self.state.turn.is_active() {
            return Err(TurnError::CombatNotActive.into());
        }

        let round_before = self.state.turn.round();
        let mut next = self.state.turn.next_turn().map(|p| p.actor);
        while let Some(id) = next {
            if self.state.roster.contains(id) {
                let mut change = self
                    .begin_current_turn()
                    .ok_or(TurnError::CombatNotActive)?;
                change.new_round = change.round != round_before;
                return Ok(change);
            }
            debug!(actor = %id, "participant left the grid; skipping");
            self.state.turn.remove_participant(id);
            next = self.state.turn.current().map(|p| p.actor);
        }

        Err(TurnError::CombatNotActive.into())
    }

    /// Rolls initiative for one actor outside combat start.
    pub fn roll_initiative(
        &mut self,
        id: ActorId,
        env: TacticsEnv<'_>,
    ) -> Result<InitiativeRoll, CommandError> {
        let modifier = self.actor(id)?.initiative_modifier();
        let seed = self.state.game_seed;
        let roll = self.state.turn.roll_single(id, modifier, env.rng(), seed);
        debug!(actor = %id, roll = roll.roll, total = roll.total, skip = roll.skip, "initiative rolled");
        Ok(roll)
    }

    /// Refills the current turn-holder's budget and lifts a turn-wait freeze.
    pub(super) fn begin_current_turn(&mut self) -> Option<TurnChange> {
        let current = self.state.turn.current()?.clone();
        let round = self.state.turn.round();
        let actor = self.state.roster.get_mut(current.actor)?;
        actor.reset_movement();
        if actor.freeze_cause() == Some(&FreezeCause::CombatTurn) {
            actor.clear_freeze();
        }

        debug!(actor = %current.actor, round, "turn begins");
        Some(TurnChange {
            actor: current.actor,
            name: current.name,
            round,
            new_round: false,
        })
    }
}
