//! Spell descriptors as read from content tables.

use std::fmt;

use crate::config::TacticsConfig;

use super::SpellPattern;

/// Identifier of a spell in the content tables.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpellId(pub u32);

impl fmt::Display for SpellId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "spell:{}", self.0)
    }
}

/// Damage type, used only for reporting and by downstream resistances.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum DamageKind {
    #[default]
    Force,
    Fire,
    Cold,
    Lightning,
    Thunder,
    Acid,
    Poison,
    Necrotic,
    Radiant,
}

/// What a spell does to each actor standing in its resolved cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SpellEffect {
    Damage {
        amount: u32,
        kind: DamageKind,
    },
    Heal {
        amount: u32,
    },
    /// Shapes the battlefield only (walls, markers).
    #[default]
    None,
}

/// Read-only description of a spell.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpellDescriptor {
    pub id: SpellId,
    pub name: String,
    pub pattern: SpellPattern,
    /// Maximum Chebyshev distance from caster to aim; 0 means unlimited.
    pub range: u32,
    /// Pattern size: radius, length or width depending on the pattern.
    pub area: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub slot_cost: u32,
    /// Targets that must be confirmed one by one; 1 for ordinary spells.
    #[cfg_attr(feature = "serde", serde(default = "default_max_targets"))]
    pub max_targets: u8,
    #[cfg_attr(feature = "serde", serde(default))]
    pub effect: SpellEffect,
    /// Projectile flight speed in world units per second; `None` resolves
    /// instantly on finalize.
    #[cfg_attr(feature = "serde", serde(default))]
    pub projectile_speed: Option<f32>,
}

#[cfg(feature = "serde")]
fn default_max_targets() -> u8 {
    1
}

impl SpellDescriptor {
    pub fn new(id: SpellId, name: impl Into<String>, pattern: SpellPattern) -> Self {
        Self {
            id,
            name: name.into(),
            pattern,
            range: 0,
            area: 0,
            slot_cost: 0,
            max_targets: 1,
            effect: SpellEffect::None,
            projectile_speed: None,
        }
    }

    pub fn with_range(mut self, range: u32) -> Self {
        self.range = range;
        self
    }

    pub fn with_area(mut self, area: u32) -> Self {
        self.area = area;
        self
    }

    pub fn with_slot_cost(mut self, cost: u32) -> Self {
        self.slot_cost = cost;
        self
    }

    pub fn with_max_targets(mut self, max_targets: u8) -> Self {
        self.max_targets = max_targets;
        self
    }

    pub fn with_effect(mut self, effect: SpellEffect) -> Self {
        self.effect = effect;
        self
    }

    pub fn with_projectile_speed(mut self, units_per_sec: f32) -> Self {
        self.projectile_speed = Some(units_per_sec);
        self
    }

    pub fn is_multi_target(&self) -> bool {
        self.max_targets > 1
    }

    /// Confirmable target count, capped by [`TacticsConfig::MAX_TARGETS`].
    pub fn target_limit(&self) -> usize {
        (self.max_targets as usize).clamp(1, TacticsConfig::MAX_TARGETS)
    }
}
