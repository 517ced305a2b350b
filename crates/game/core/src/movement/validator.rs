use tracing::{debug, error};

use crate::config::TacticsConfig;
use crate::env::{ProbeError, TerrainProbe};
use crate::grid::{Facing, GridCell, chebyshev};
use crate::state::{
    Actor, FreezeCause, Locomotion, OccupancyIndex, TerrainBlock,
};

use super::MoveError;

/// Combat context the validator needs for rule 2 and budget charging.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum TurnGate {
    /// Out of combat: any actor may move and nothing is charged.
    #[default]
    Free,
    /// In combat; `is_turn` says whether the mover holds the current turn.
    Combat { is_turn: bool },
}

impl TurnGate {
    pub fn in_combat(self) -> bool {
        matches!(self, TurnGate::Combat { .. })
    }
}

/// Successful result of a move request.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum MoveOutcome {
    /// The avatar stepped to a new cell.
    Moved {
        from: GridCell,
        to: GridCell,
        facing: Facing,
        /// Budget actually deducted; zero outside combat.
        charged: f32,
    },
    /// The request resolved to the cell the actor already holds.
    Stayed { cell: GridCell },
    /// The actor walked back onto its held cell and was released.
    Unfrozen { cell: GridCell },
    /// The actor is casting; its real position moved the aim instead.
    Aimed { aim: GridCell },
}

/// Single validator shared by every actor kind.
///
/// Applies the movement rules in order and commits the step only when all of
/// them pass. Every rejection leaves occupancy, cell and budget untouched;
/// collision and terrain rejections additionally freeze the actor.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MovementValidator {
    climb_limit: f32,
    drop_limit: f32,
    cardinal_cost: f32,
    diagonal_cost: f32,
}

impl MovementValidator {
    pub fn new(config: &TacticsConfig) -> Self {
        Self {
            climb_limit: config.climb_limit,
            drop_limit: config.drop_limit,
            cardinal_cost: config.cardinal_cost,
            diagonal_cost: config.diagonal_cost,
        }
    }

    /// Budget cost of one neighbour step from `from` to `to`.
    pub fn step_cost(&self, from: GridCell, to: GridCell) -> f32 {
        if from.x != to.x && from.z != to.z {
            self.diagonal_cost
        } else {
            self.cardinal_cost
        }
    }

    /// True when a height change of `diff` is within what one step may climb
    /// or drop. The climb limit is inclusive (`diff >= climb` fails) and so
    /// is the drop limit (`diff <= -drop` fails).
    pub fn slope_allowed(&self, diff: f32) -> bool {
        diff < self.climb_limit && diff > -self.drop_limit
    }

    /// Runs the movement rules for `actor` stepping onto `candidate`.
    pub fn try_move(
        &self,
        actor: &mut Actor,
        candidate: GridCell,
        occupancy: &mut OccupancyIndex,
        terrain: &dyn TerrainProbe,
        gate: TurnGate,
    ) -> Result<MoveOutcome, MoveError> {
        let from = actor.cell();

        // 1. Frozen actors only get out by walking back onto the held cell.
        if let Some(cause) = actor.freeze_cause() {
            if candidate == from && cause.clears_on_return() {
                actor.clear_freeze();
                debug!(actor = %actor.id(), cell = ?from, "returned to held cell; unfrozen");
                return Ok(MoveOutcome::Unfrozen { cell: from });
            }
            return Err(MoveError::Frozen {
                cause: cause.clone(),
            });
        }

        if candidate == from {
            return Ok(MoveOutcome::Stayed { cell: from });
        }
        if chebyshev(from, candidate) > 1 {
            return Err(MoveError::NotAdjacent {
                from,
                to: candidate,
            });
        }

        // 2. Turn order.
        if let TurnGate::Combat { is_turn: false } = gate {
            return Err(MoveError::NotYourTurn);
        }

        // 3. Occupancy.
        if occupancy.is_occupied(candidate, Some(actor.id())) {
            let by = occupancy
                .occupant_name(candidate)
                .unwrap_or_else(|| "someone".to_string());
            freeze(actor, candidate, FreezeCause::Collision {
                blocker: Some(by.clone()),
            });
            return Err(MoveError::CellOccupied { by });
        }

        // 4. Solid ground within the probe's scan window.
        let ground = terrain
            .ground_height(candidate, actor.reference_y())
            .map_err(|e| probe_failed(actor, candidate, e))?;
        let Some(ground) = ground else {
            freeze(actor, candidate, FreezeCause::Terrain(TerrainBlock::NoGround));
            return Err(MoveError::NoGround { cell: candidate });
        };

        // 5. Slope, for anything that walks.
        if actor.locomotion() == Locomotion::Walking {
            let diff = ground - actor.reference_y();
            if !self.slope_allowed(diff) {
                freeze(actor, candidate, FreezeCause::Terrain(TerrainBlock::TooSteep));
                return Err(MoveError::TooSteep { diff });
            }
        }

        // 6. Fluid, a separate layer from solid ground.
        let fluid = terrain
            .has_fluid_above(candidate, ground)
            .map_err(|e| probe_failed(actor, candidate, e))?;
        if fluid {
            freeze(actor, candidate, FreezeCause::Terrain(TerrainBlock::Fluid));
            return Err(MoveError::FluidBlocked { cell: candidate });
        }

        // 7. Budget, checked before anything is committed.
        let cost = self.step_cost(from, candidate);
        if gate.in_combat() && !actor.budget().can_afford(cost) {
            return Err(MoveError::InsufficientBudget {
                need: cost,
                have: actor.budget().remaining,
            });
        }

        if !occupancy.relocate(actor.id(), candidate) {
            return Err(MoveError::OccupancyDesync {
                actor: actor.id(),
                cell: candidate,
            });
        }

        let facing = Facing::from_delta(candidate.x - from.x, candidate.z - from.z)
            .unwrap_or(actor.facing());
        let charged = if gate.in_combat() {
            actor.spend_movement(cost);
            cost
        } else {
            0.0
        };
        actor.place(candidate, ground);
        actor.set_facing(facing);
        actor.clear_freeze();

        debug!(
            actor = %actor.id(),
            from = ?from,
            to = ?candidate,
            charged,
            "move accepted"
        );
        Ok(MoveOutcome::Moved {
            from,
            to: candidate,
            facing,
            charged,
        })
    }
}

fn freeze(actor: &mut Actor, candidate: GridCell, cause: FreezeCause) {
    debug!(
        actor = %actor.id(),
        held = ?actor.cell(),
        candidate = ?candidate,
        reason = %cause.reason(),
        "move rejected; actor frozen"
    );
    actor.set_freeze(cause);
}

fn probe_failed(actor: &Actor, candidate: GridCell, error: ProbeError) -> MoveError {
    error!(
        actor = %actor.id(),
        cell = ?candidate,
        error = %error,
        "terrain probe returned no answer"
    );
    MoveError::ProbeUnavailable(error)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::env::FlatTerrain;
    use crate::state::{ActorId, ActorKind, ActorSpec};

    /// Terrain with per-cell ground heights and fluid cells.
    #[derive(Default)]
    struct StubTerrain {
        heights: BTreeMap<GridCell, f32>,
        fluid: Vec<GridCell>,
        broken: bool,
    }

    impl StubTerrain {
        fn with_height(mut self, cell: GridCell, height: f32) -> Self {
            self.heights.insert(cell, height);
            self
        }
    }

    impl TerrainProbe for StubTerrain {
        fn ground_height(&self, cell: GridCell, _reference_y: f32) -> Result<Option<f32>, ProbeError> {
            if self.broken {
                return Err(ProbeError::Unavailable("engine offline".to_string()));
            }
            Ok(self.heights.get(&cell).copied())
        }

        fn has_fluid_above(&self, cell: GridCell, _ground_y: f32) -> Result<bool, ProbeError> {
            Ok(self.fluid.contains(&cell))
        }
    }

    fn setup(spec: ActorSpec) -> (Actor, OccupancyIndex) {
        let actor = Actor::new(ActorId(1), &spec, GridCell::ORIGIN, 0.0);
        let mut occupancy = OccupancyIndex::new();
        occupancy.insert(actor.id(), actor.name(), actor.cell());
        (actor, occupancy)
    }

    fn walker() -> ActorSpec {
        ActorSpec::new("Aria", ActorKind::Player).with_movement(6.0)
    }

    fn validator() -> MovementValidator {
        MovementValidator::new(&TacticsConfig::default())
    }

    const COMBAT_TURN: TurnGate = TurnGate::Combat { is_turn: true };

    #[test]
    fn basic_cardinal_move_costs_one() {
        let (mut actor, mut occupancy) = setup(walker());
        let outcome = validator()
            .try_move(
                &mut actor,
                GridCell::new(1, 0),
                &mut occupancy,
                &FlatTerrain::new(0.0),
                COMBAT_TURN,
            )
            .unwrap();

        assert_eq!(
            outcome,
            MoveOutcome::Moved {
                from: GridCell::ORIGIN,
                to: GridCell::new(1, 0),
                facing: Facing::East,
                charged: 1.0,
            }
        );
        assert_eq!(actor.cell(), GridCell::new(1, 0));
        assert_eq!(actor.budget().remaining, 5.0);
        assert_eq!(occupancy.cell_of(actor.id()), Some(GridCell::new(1, 0)));
    }

    #[test]
    fn diagonal_move_costs_one_and_a_half() {
        let (mut actor, mut occupancy) = setup(walker());
        validator()
            .try_move(
                &mut actor,
                GridCell::new(1, 1),
                &mut occupancy,
                &FlatTerrain::new(0.0),
                COMBAT_TURN,
            )
            .unwrap();

        assert_eq!(actor.budget().remaining, 4.5);
        assert_eq!(actor.facing(), Facing::NorthEast);
    }

    #[test]
    fn out_of_combat_moves_are_free() {
        let (mut actor, mut occupancy) = setup(walker());
        validator()
            .try_move(
                &mut actor,
                GridCell::new(0, 1),
                &mut occupancy,
                &FlatTerrain::new(0.0),
                TurnGate::Free,
            )
            .unwrap();
        assert_eq!(actor.budget().remaining, 6.0);
    }

    #[test]
    fn slope_limits_are_asymmetric() {
        let cases = [(3.0, false), (2.999, true), (-4.0, false), (-3.999, true)];
        for (height, accepted) in cases {
            let (mut actor, mut occupancy) = setup(walker());
            let terrain = StubTerrain::default().with_height(GridCell::new(1, 0), height);
            let result = validator().try_move(
                &mut actor,
                GridCell::new(1, 0),
                &mut occupancy,
                &terrain,
                TurnGate::Free,
            );

            assert_eq!(result.is_ok(), accepted, "height diff {height}");
            if !accepted {
                assert_eq!(
                    actor.freeze_cause(),
                    Some(&FreezeCause::Terrain(TerrainBlock::TooSteep))
                );
                assert_eq!(actor.cell(), GridCell::ORIGIN);
            }
        }
    }

    #[test]
    fn flyers_ignore_slope_but_not_fluid() {
        let (mut actor, mut occupancy) = setup(walker().with_locomotion(Locomotion::Flying));
        let mut terrain = StubTerrain::default()
            .with_height(GridCell::new(1, 0), 12.0)
            .with_height(GridCell::new(2, 0), 12.0);
        terrain.fluid.push(GridCell::new(2, 0));

        assert!(validator()
            .try_move(&mut actor, GridCell::new(1, 0), &mut occupancy, &terrain, TurnGate::Free)
            .is_ok());
        assert_eq!(
            validator().try_move(
                &mut actor,
                GridCell::new(2, 0),
                &mut occupancy,
                &terrain,
                TurnGate::Free
            ),
            Err(MoveError::FluidBlocked {
                cell: GridCell::new(2, 0)
            })
        );
    }

    #[test]
    fn flyers_still_need_ground() {
        let (mut actor, mut occupancy) = setup(walker().with_locomotion(Locomotion::Flying));
        let result = validator().try_move(
            &mut actor,
            GridCell::new(0, 1),
            &mut occupancy,
            &StubTerrain::default(),
            TurnGate::Free,
        );
        assert_eq!(
            result,
            Err(MoveError::NoGround {
                cell: GridCell::new(0, 1)
            })
        );
        assert!(actor.is_frozen());
    }

    #[test]
    fn collision_freezes_and_return_unfreezes() {
        let (mut actor, mut occupancy) = setup(walker());
        occupancy.insert(ActorId(2), "Goblin", GridCell::new(1, 0));
        let terrain = FlatTerrain::new(0.0);

        let result = validator().try_move(
            &mut actor,
            GridCell::new(1, 0),
            &mut occupancy,
            &terrain,
            TurnGate::Free,
        );
        assert_eq!(
            result,
            Err(MoveError::CellOccupied {
                by: "Goblin".to_string()
            })
        );
        assert_eq!(actor.freeze_cause().map(|c| c.reason()).as_deref(), Some("blocked by Goblin"));

        // Any other destination stays rejected while frozen.
        assert!(matches!(
            validator().try_move(&mut actor, GridCell::new(0, 1), &mut occupancy, &terrain, TurnGate::Free),
            Err(MoveError::Frozen { .. })
        ));

        let outcome = validator()
            .try_move(&mut actor, GridCell::ORIGIN, &mut occupancy, &terrain, TurnGate::Free)
            .unwrap();
        assert_eq!(outcome, MoveOutcome::Unfrozen { cell: GridCell::ORIGIN });
        assert!(!actor.is_frozen());
    }

    #[test]
    fn casting_freeze_survives_return_to_cell() {
        let (mut actor, mut occupancy) = setup(walker());
        actor.set_freeze(FreezeCause::Casting);

        let result = validator().try_move(
            &mut actor,
            GridCell::ORIGIN,
            &mut occupancy,
            &FlatTerrain::new(0.0),
            TurnGate::Free,
        );
        assert_eq!(
            result,
            Err(MoveError::Frozen {
                cause: FreezeCause::Casting
            })
        );
        assert!(actor.is_frozen());
    }

    #[test]
    fn not_your_turn_changes_nothing() {
        let (mut actor, mut occupancy) = setup(walker());
        let result = validator().try_move(
            &mut actor,
            GridCell::new(1, 0),
            &mut occupancy,
            &FlatTerrain::new(0.0),
            TurnGate::Combat { is_turn: false },
        );
        assert_eq!(result, Err(MoveError::NotYourTurn));
        assert!(!actor.is_frozen());
        assert_eq!(actor.budget().remaining, 6.0);
    }

    #[test]
    fn insufficient_budget_rejects_before_mutation() {
        let (mut actor, mut occupancy) = setup(walker().with_movement(1.0));
        let result = validator().try_move(
            &mut actor,
            GridCell::new(1, 1),
            &mut occupancy,
            &FlatTerrain::new(0.0),
            COMBAT_TURN,
        );
        assert_eq!(
            result,
            Err(MoveError::InsufficientBudget {
                need: 1.5,
                have: 1.0
            })
        );
        assert_eq!(actor.cell(), GridCell::ORIGIN);
        assert_eq!(actor.budget().remaining, 1.0);
        assert_eq!(occupancy.cell_of(actor.id()), Some(GridCell::ORIGIN));
        assert!(!actor.is_frozen());
    }

    #[test]
    fn broken_probe_is_internal_and_does_not_freeze() {
        let (mut actor, mut occupancy) = setup(walker());
        let terrain = StubTerrain {
            broken: true,
            ..StubTerrain::default()
        };
        let err = validator()
            .try_move(&mut actor, GridCell::new(1, 0), &mut occupancy, &terrain, TurnGate::Free)
            .unwrap_err();

        assert!(matches!(err, MoveError::ProbeUnavailable(_)));
        assert!(crate::error::TacticsError::severity(&err).is_internal());
        assert!(!actor.is_frozen());
    }

    #[test]
    fn reference_height_follows_accepted_steps() {
        let (mut actor, mut occupancy) = setup(walker());
        let terrain = StubTerrain::default()
            .with_height(GridCell::new(1, 0), 2.5)
            .with_height(GridCell::new(2, 0), 5.0);

        validator()
            .try_move(&mut actor, GridCell::new(1, 0), &mut occupancy, &terrain, TurnGate::Free)
            .unwrap();
        assert_eq!(actor.reference_y(), 2.5);
        // 5.0 - 2.5 is within the climb limit once the first step is taken.
        assert!(validator()
            .try_move(&mut actor, GridCell::new(2, 0), &mut occupancy, &terrain, TurnGate::Free)
            .is_ok());
    }

    #[test]
    fn non_neighbour_candidates_are_rejected_without_freezing() {
        let (mut actor, mut occupancy) = setup(walker());
        let err = validator()
            .try_move(
                &mut actor,
                GridCell::new(2, 0),
                &mut occupancy,
                &FlatTerrain::new(0.0),
                COMBAT_TURN,
            )
            .unwrap_err();

        assert_eq!(
            err,
            MoveError::NotAdjacent {
                from: GridCell::ORIGIN,
                to: GridCell::new(2, 0)
            }
        );
        assert_eq!(actor.cell(), GridCell::ORIGIN);
        assert!(!actor.is_frozen());
        assert_eq!(actor.budget().remaining, 6.0);
    }
}
