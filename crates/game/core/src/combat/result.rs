//! Per-actor outcomes of a resolved spell.

use crate::grid::GridCell;
use crate::spell::{DamageKind, SpellId};
use crate::state::ActorId;

/// What happened to one actor standing in a resolved area.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EffectKind {
    Damaged {
        /// Health actually removed; never more than the actor had.
        dealt: u32,
        kind: DamageKind,
        /// The hit brought health to zero.
        defeated: bool,
    },
    Healed {
        /// Health actually restored; never past the maximum.
        healed: u32,
    },
}

/// Result of applying a spell effect to one actor.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EffectOutcome {
    pub spell: SpellId,
    pub caster: ActorId,
    pub target: ActorId,
    pub cell: GridCell,
    pub effect: EffectKind,
}

impl EffectOutcome {
    pub fn is_defeat(&self) -> bool {
        matches!(self.effect, EffectKind::Damaged { defeated: true, .. })
    }
}
