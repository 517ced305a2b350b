use std::fmt;

use crate::grid::{Facing, GridCell};

/// Unique identifier for an actor on the grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActorId(pub u32);

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Whether an actor is a player avatar or an encounter monster.
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
pub enum ActorKind {
    #[default]
    Player,
    Monster,
}

/// How an actor gets from cell to cell.
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
pub enum Locomotion {
    #[default]
    Walking,
    /// Ignores slope limits but still needs ground below and clear air above.
    Flying,
}

/// Terrain rule that rejected a step.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TerrainBlock {
    NoGround,
    TooSteep,
    Fluid,
}

/// Why an actor is frozen in place.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FreezeCause {
    /// Tried to step onto an occupied cell, or a cast was abandoned.
    /// `blocker` names the occupant when there was one.
    Collision { blocker: Option<String> },
    /// Tried to step onto unusable terrain.
    Terrain(TerrainBlock),
    /// Held in place by a casting session; only finalize releases it.
    Casting,
    /// Held by the command layer until the actor's turn comes up.
    CombatTurn,
}

impl FreezeCause {
    /// Returns true if walking back onto the held cell lifts this freeze.
    pub fn clears_on_return(&self) -> bool {
        match self {
            FreezeCause::Collision { .. } | FreezeCause::Terrain(_) => true,
            FreezeCause::Casting | FreezeCause::CombatTurn => false,
        }
    }

    /// Short text suitable for telling the player why they cannot move.
    pub fn reason(&self) -> String {
        match self {
            FreezeCause::Collision {
                blocker: Some(name),
            } => format!("blocked by {name}"),
            FreezeCause::Collision { blocker: None } => "blocked".to_string(),
            FreezeCause::Terrain(TerrainBlock::NoGround) => "no ground".to_string(),
            FreezeCause::Terrain(TerrainBlock::TooSteep) => "too steep".to_string(),
            FreezeCause::Terrain(TerrainBlock::Fluid) => "fluid ahead".to_string(),
            FreezeCause::Casting => "casting".to_string(),
            FreezeCause::CombatTurn => "waiting for turn".to_string(),
        }
    }
}

/// Per-turn movement allowance, in cardinal steps.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MovementBudget {
    pub remaining: f32,
    pub max: f32,
}

impl MovementBudget {
    pub fn full(max: f32) -> Self {
        Self {
            remaining: max,
            max,
        }
    }

    pub fn can_afford(&self, cost: f32) -> bool {
        self.remaining >= cost
    }
}

/// Integer resource meter (health, spell slots) tracked per actor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResourceMeter {
    pub current: u32,
    pub maximum: u32,
}

impl ResourceMeter {
    pub fn new(current: u32, maximum: u32) -> Self {
        Self { current, maximum }
    }

    pub fn full(maximum: u32) -> Self {
        Self::new(maximum, maximum)
    }

    pub fn is_empty(&self) -> bool {
        self.current == 0
    }
}

/// Blueprint for an actor entering grid mode, read from content tables.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActorSpec {
    pub name: String,
    pub kind: ActorKind,
    #[cfg_attr(feature = "serde", serde(default))]
    pub locomotion: Locomotion,
    #[cfg_attr(feature = "serde", serde(default))]
    pub initiative_modifier: i32,
    pub movement: f32,
    pub health: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub spell_slots: u32,
}

impl ActorSpec {
    pub fn new(name: impl Into<String>, kind: ActorKind) -> Self {
        Self {
            name: name.into(),
            kind,
            locomotion: Locomotion::Walking,
            initiative_modifier: 0,
            movement: 6.0,
            health: 10,
            spell_slots: 0,
        }
    }

    pub fn with_locomotion(mut self, locomotion: Locomotion) -> Self {
        self.locomotion = locomotion;
        self
    }

    pub fn with_initiative_modifier(mut self, modifier: i32) -> Self {
        self.initiative_modifier = modifier;
        self
    }

    pub fn with_movement(mut self, movement: f32) -> Self {
        self.movement = movement;
        self
    }

    pub fn with_health(mut self, health: u32) -> Self {
        self.health = health;
        self
    }

    pub fn with_spell_slots(mut self, slots: u32) -> Self {
        self.spell_slots = slots;
        self
    }
}

/// A player avatar or monster placed on the grid.
///
/// # Invariants
///
/// - `cell`, `budget` and `freeze` are only written from inside the crate:
///   the movement validator, the turn manager and the casting path
/// - `reference_y` is the ground height under `cell`
#[derive(Clone, Debug, PartialEq)]
pub struct Actor {
    id: ActorId,
    name: String,
    kind: ActorKind,
    locomotion: Locomotion,
    cell: GridCell,
    reference_y: f32,
    facing: Facing,
    budget: MovementBudget,
    freeze: Option<FreezeCause>,
    initiative_modifier: i32,
    health: ResourceMeter,
    spell_slots: ResourceMeter,
    move_in_flight: bool,
}

impl Actor {
    pub fn new(id: ActorId, spec: &ActorSpec, cell: GridCell, reference_y: f32) -> Self {
        Self {
            id,
            name: spec.name.clone(),
            kind: spec.kind,
            locomotion: spec.locomotion,
            cell,
            reference_y,
            facing: Facing::default(),
            budget: MovementBudget::full(spec.movement),
            freeze: None,
            initiative_modifier: spec.initiative_modifier,
            health: ResourceMeter::full(spec.health),
            spell_slots: ResourceMeter::full(spec.spell_slots),
            move_in_flight: false,
        }
    }

    pub fn id(&self) -> ActorId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> ActorKind {
        self.kind
    }

    pub fn is_player(&self) -> bool {
        self.kind == ActorKind::Player
    }

    pub fn locomotion(&self) -> Locomotion {
        self.locomotion
    }

    pub fn cell(&self) -> GridCell {
        self.cell
    }

    pub fn reference_y(&self) -> f32 {
        self.reference_y
    }

    pub fn facing(&self) -> Facing {
        self.facing
    }

    pub fn budget(&self) -> MovementBudget {
        self.budget
    }

    pub fn freeze_cause(&self) -> Option<&FreezeCause> {
        self.freeze.as_ref()
    }

    pub fn is_frozen(&self) -> bool {
        self.freeze.is_some()
    }

    pub fn initiative_modifier(&self) -> i32 {
        self.initiative_modifier
    }

    pub fn health(&self) -> ResourceMeter {
        self.health
    }

    pub fn is_alive(&self) -> bool {
        !self.health.is_empty()
    }

    pub fn spell_slots(&self) -> ResourceMeter {
        self.spell_slots
    }

    pub fn is_move_in_flight(&self) -> bool {
        self.move_in_flight
    }

    pub(crate) fn place(&mut self, cell: GridCell, reference_y: f32) {
        self.cell = cell;
        self.reference_y = reference_y;
    }

    pub(crate) fn set_facing(&mut self, facing: Facing) {
        self.facing = facing;
    }

    pub(crate) fn set_freeze(&mut self, cause: FreezeCause) {
        self.freeze = Some(cause);
    }

    pub(crate) fn clear_freeze(&mut self) -> Option<FreezeCause> {
        self.freeze.take()
    }

    pub(crate) fn spend_movement(&mut self, cost: f32) {
        self.budget.remaining = (self.budget.remaining - cost).max(0.0);
    }

    pub(crate) fn reset_movement(&mut self) {
        self.budget.remaining = self.budget.max;
    }

    pub(crate) fn apply_damage(&mut self, amount: u32) -> u32 {
        let dealt = amount.min(self.health.current);
        self.health.current -= dealt;
        dealt
    }

    pub(crate) fn apply_heal(&mut self, amount: u32) -> u32 {
        let missing = self.health.maximum - self.health.current;
        let healed = amount.min(missing);
        self.health.current += healed;
        healed
    }

    pub(crate) fn spend_slots(&mut self, cost: u32) -> bool {
        if self.spell_slots.current < cost {
            return false;
        }
        self.spell_slots.current -= cost;
        true
    }

    /// Claims the in-flight-move latch; false if a move is already pending.
    pub(crate) fn try_latch_move(&mut self) -> bool {
        if self.move_in_flight {
            return false;
        }
        self.move_in_flight = true;
        true
    }

    pub(crate) fn release_move_latch(&mut self) {
        self.move_in_flight = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_collision_and_terrain_clear_on_return() {
        assert!(FreezeCause::Collision { blocker: None }.clears_on_return());
        assert!(FreezeCause::Terrain(TerrainBlock::Fluid).clears_on_return());
        assert!(!FreezeCause::Casting.clears_on_return());
        assert!(!FreezeCause::CombatTurn.clears_on_return());
    }

    #[test]
    fn collision_reason_names_the_blocker() {
        let cause = FreezeCause::Collision {
            blocker: Some("Goblin".to_string()),
        };
        assert_eq!(cause.reason(), "blocked by Goblin");
    }

    #[test]
    fn damage_and_heal_stay_within_meter() {
        let spec = ActorSpec::new("Aria", ActorKind::Player).with_health(12);
        let mut actor = Actor::new(ActorId(1), &spec, GridCell::ORIGIN, 0.0);

        assert_eq!(actor.apply_damage(20), 12);
        assert!(!actor.is_alive());
        assert_eq!(actor.apply_heal(5), 5);
        assert_eq!(actor.apply_heal(50), 7);
        assert_eq!(actor.health(), ResourceMeter::new(12, 12));
    }

    #[test]
    fn move_latch_rejects_second_claim() {
        let spec = ActorSpec::new("Aria", ActorKind::Player);
        let mut actor = Actor::new(ActorId(1), &spec, GridCell::ORIGIN, 0.0);

        assert!(actor.try_latch_move());
        assert!(!actor.try_latch_move());
        actor.release_move_latch();
        assert!(actor.try_latch_move());
    }
}
