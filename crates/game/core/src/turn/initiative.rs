use crate::config::TacticsConfig;
use crate::env::RngOracle;
use crate::state::ActorId;

/// One initiative roll with its modifier applied.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InitiativeRoll {
    /// Raw die result, `1..=INITIATIVE_DIE`.
    pub roll: u32,
    pub modifier: i32,
    /// `roll + modifier`, clamped to zero.
    pub total: u32,
    /// A clamped total of exactly zero sits out the combat.
    pub skip: bool,
}

impl InitiativeRoll {
    /// Applies `modifier` to a raw die result.
    pub fn from_roll(roll: u32, modifier: i32) -> Self {
        let total = (roll as i64 + modifier as i64).max(0) as u32;
        Self {
            roll,
            modifier,
            total,
            skip: total == 0,
        }
    }
}

/// Rolls a d20 for one actor from a prepared seed.
pub fn roll_initiative(rng: &dyn RngOracle, seed: u64, modifier: i32) -> InitiativeRoll {
    let roll = rng.roll_die(seed, TacticsConfig::INITIATIVE_DIE);
    InitiativeRoll::from_roll(roll, modifier)
}

/// An actor's place in the combat order.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Participant {
    pub actor: ActorId,
    pub name: String,
    pub is_player: bool,
    pub initiative: InitiativeRoll,
}

impl Participant {
    pub fn total(&self) -> u32 {
        self.initiative.total
    }

    pub fn skip(&self) -> bool {
        self.initiative.skip
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn low_roll_with_penalty_clamps_to_zero_and_skips() {
        for roll in 1..=5 {
            let rolled = InitiativeRoll::from_roll(roll, -5);
            assert_eq!(rolled.total, 0, "roll {roll}");
            assert!(rolled.skip);
        }
        let rolled = InitiativeRoll::from_roll(6, -5);
        assert_eq!(rolled.total, 1);
        assert!(!rolled.skip);
    }

    #[test]
    fn positive_modifier_adds() {
        let rolled = InitiativeRoll::from_roll(12, 3);
        assert_eq!(rolled.total, 15);
        assert!(!rolled.skip);
    }
}
