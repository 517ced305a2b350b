use std::cmp::Reverse;

use tracing::debug;

use crate::env::{RngOracle, roll_seed};
use crate::state::{ActorId, ActorRoster};

use super::{Participant, roll_initiative};

/// Seed context for rolls made at combat start.
const COMBAT_START_CONTEXT: u32 = 0;
/// Seed context for standalone rolls outside combat start.
const STANDALONE_CONTEXT: u32 = 1;

/// Combat turn order and round bookkeeping.
///
/// None of these operations fail: they work over state the engine has
/// already validated. An empty order after [`start_combat`](Self::start_combat)
/// means everyone skipped, and the manager stays inactive.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TurnManager {
    order: Vec<Participant>,
    skipped: Vec<Participant>,
    index: usize,
    round: u32,
    active: bool,
    /// Bumped on every roll batch so repeated combats roll fresh values.
    nonce: u64,
}

impl TurnManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn order(&self) -> &[Participant] {
        &self.order
    }

    /// Participants that rolled a clamped zero in the current combat.
    pub fn skipped(&self) -> &[Participant] {
        &self.skipped
    }

    pub fn current(&self) -> Option<&Participant> {
        if !self.active {
            return None;
        }
        self.order.get(self.index)
    }

    pub fn is_current(&self, actor: ActorId) -> bool {
        self.current().is_some_and(|p| p.actor == actor)
    }

    pub fn contains(&self, actor: ActorId) -> bool {
        self.order.iter().any(|p| p.actor == actor)
    }

    /// Rolls initiative for every live actor in the roster and builds the order.
    ///
    /// Ties on total are broken by roll order (roster order), highest first.
    /// Returns the ordered, non-skipping participants.
    pub fn start_combat(
        &mut self,
        roster: &ActorRoster,
        rng: &dyn RngOracle,
        game_seed: u64,
    ) -> &[Participant] {
        self.end_combat();
        self.nonce = self.nonce.wrapping_add(1);

        let mut rolled: Vec<(usize, Participant)> = roster
            .iter()
            .filter(|actor| actor.is_alive())
            .enumerate()
            .map(|(index, actor)| {
                let seed = roll_seed(game_seed, self.nonce, actor.id().0, COMBAT_START_CONTEXT);
                let initiative = roll_initiative(rng, seed, actor.initiative_modifier());
                let participant = Participant {
                    actor: actor.id(),
                    name: actor.name().to_string(),
                    is_player: actor.is_player(),
                    initiative,
                };
                (index, participant)
            })
            .collect();

        rolled.sort_by_key(|(index, participant)| (Reverse(participant.total()), *index));

        for (_, participant) in rolled {
            if participant.skip() {
                debug!(actor = %participant.actor, "initiative clamped to zero; sitting out");
                self.skipped.push(participant);
            } else {
                self.order.push(participant);
            }
        }

        if !self.order.is_empty() {
            self.active = true;
            self.round = 1;
        }
        &self.order
    }

    /// Rolls initiative for one actor without touching the order.
    pub fn roll_single(
        &mut self,
        actor: ActorId,
        modifier: i32,
        rng: &dyn RngOracle,
        game_seed: u64,
    ) -> super::InitiativeRoll {
        self.nonce = self.nonce.wrapping_add(1);
        let seed = roll_seed(game_seed, self.nonce, actor.0, STANDALONE_CONTEXT);
        roll_initiative(rng, seed, modifier)
    }

    /// Moves to the next participant, wrapping into a new round.
    ///
    /// Returns `None` when combat is not active or the order is empty.
    pub fn next_turn(&mut self) -> Option<&Participant> {
        if !self.active || self.order.is_empty() {
            return None;
        }
        self.index += 1;
        if self.index >= self.order.len() {
            self.index = 0;
            self.round += 1;
        }
        self.order.get(self.index)
    }

    /// Drops a participant that left the grid mid-combat.
    ///
    /// Returns `Some(true)` if it held the current turn; the turn then passes
    /// to whoever followed it. Returns `None` if it was not in the order.
    pub fn remove_participant(&mut self, actor: ActorId) -> Option<bool> {
        let position = self.order.iter().position(|p| p.actor == actor)?;
        self.order.remove(position);
        let was_current = self.active && position == self.index;

        if position < self.index {
            self.index -= 1;
        } else if self.index >= self.order.len() {
            self.index = 0;
            if self.active && !self.order.is_empty() {
                self.round += 1;
            }
        }
        if self.order.is_empty() {
            self.active = false;
        }
        Some(was_current)
    }

    /// Clears order, index and round counter.
    pub fn end_combat(&mut self) {
        self.order.clear();
        self.skipped.clear();
        self.index = 0;
        self.round = 0;
        self.active = false;
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::grid::GridCell;
    use crate::state::{Actor, ActorKind, ActorSpec};

    /// Returns a fixed die face per actor, decoded from the seed lookup table.
    struct FixedRng {
        faces: BTreeMap<u64, u32>,
        fallback: u32,
    }

    impl RngOracle for FixedRng {
        fn next_u32(&self, _seed: u64) -> u32 {
            0
        }

        fn roll_die(&self, seed: u64, _sides: u32) -> u32 {
            self.faces.get(&seed).copied().unwrap_or(self.fallback)
        }
    }

    fn roster(specs: &[ActorSpec]) -> ActorRoster {
        let mut roster = ActorRoster::new();
        for (i, spec) in specs.iter().enumerate() {
            let id = roster.next_id();
            roster.insert(Actor::new(id, spec, GridCell::new(i as i32, 0), 0.0));
        }
        roster
    }

    fn fixed(game_seed: u64, faces: &[(u32, u32)], fallback: u32) -> FixedRng {
        FixedRng {
            faces: faces
                .iter()
                .map(|(actor, face)| (roll_seed(game_seed, 1, *actor, COMBAT_START_CONTEXT), *face))
                .collect(),
            fallback,
        }
    }

    #[test]
    fn order_is_descending_with_roster_order_tiebreak() {
        let roster = roster(&[
            ActorSpec::new("Aria", ActorKind::Player),
            ActorSpec::new("Goblin", ActorKind::Monster),
            ActorSpec::new("Orc", ActorKind::Monster),
        ]);
        let rng = fixed(7, &[(0, 10), (1, 15), (2, 10)], 1);
        let mut turns = TurnManager::new();

        let order: Vec<ActorId> = turns
            .start_combat(&roster, &rng, 7)
            .iter()
            .map(|p| p.actor)
            .collect();

        assert_eq!(order, vec![ActorId(1), ActorId(0), ActorId(2)]);
        assert!(turns.is_active());
        assert_eq!(turns.round(), 1);
        assert!(turns.is_current(ActorId(1)));
    }

    #[test]
    fn clamped_zero_is_excluded() {
        let roster = roster(&[
            ActorSpec::new("Aria", ActorKind::Player).with_initiative_modifier(-5),
            ActorSpec::new("Goblin", ActorKind::Monster),
        ]);
        let rng = fixed(3, &[(0, 4), (1, 8)], 1);
        let mut turns = TurnManager::new();

        let order = turns.start_combat(&roster, &rng, 3).to_vec();
        assert_eq!(order.len(), 1);
        assert_eq!(order[0].actor, ActorId(1));
        assert_eq!(turns.skipped().len(), 1);
        assert_eq!(turns.skipped()[0].initiative.total, 0);
    }

    #[test]
    fn everyone_skipping_leaves_combat_inactive() {
        let roster = roster(&[ActorSpec::new("Aria", ActorKind::Player).with_initiative_modifier(-20)]);
        let rng = fixed(0, &[], 1);
        let mut turns = TurnManager::new();

        assert!(turns.start_combat(&roster, &rng, 0).is_empty());
        assert!(!turns.is_active());
        assert!(turns.next_turn().is_none());
    }

    #[test]
    fn next_turn_wraps_and_counts_rounds() {
        let roster = roster(&[
            ActorSpec::new("Aria", ActorKind::Player),
            ActorSpec::new("Goblin", ActorKind::Monster),
        ]);
        let rng = fixed(1, &[(0, 18), (1, 5)], 1);
        let mut turns = TurnManager::new();
        turns.start_combat(&roster, &rng, 1);

        assert_eq!(turns.next_turn().map(|p| p.actor), Some(ActorId(1)));
        assert_eq!(turns.round(), 1);
        assert_eq!(turns.next_turn().map(|p| p.actor), Some(ActorId(0)));
        assert_eq!(turns.round(), 2);
    }

    #[test]
    fn removing_current_passes_the_turn() {
        let roster = roster(&[
            ActorSpec::new("A", ActorKind::Player),
            ActorSpec::new("B", ActorKind::Monster),
            ActorSpec::new("C", ActorKind::Monster),
        ]);
        let rng = fixed(2, &[(0, 20), (1, 15), (2, 10)], 1);
        let mut turns = TurnManager::new();
        turns.start_combat(&roster, &rng, 2);
        turns.next_turn();

        assert_eq!(turns.remove_participant(ActorId(1)), Some(true));
        assert!(turns.is_current(ActorId(2)));
        assert_eq!(turns.remove_participant(ActorId(0)), Some(false));
        assert!(turns.is_current(ActorId(2)));
        assert_eq!(turns.remove_participant(ActorId(9)), None);
    }

    #[test]
    fn end_combat_clears_everything() {
        let roster = roster(&[ActorSpec::new("Aria", ActorKind::Player)]);
        let rng = fixed(0, &[], 10);
        let mut turns = TurnManager::new();
        turns.start_combat(&roster, &rng, 0);
        turns.end_combat();

        assert!(!turns.is_active());
        assert!(turns.order().is_empty());
        assert_eq!(turns.round(), 0);
        assert!(turns.current().is_none());
    }
}
