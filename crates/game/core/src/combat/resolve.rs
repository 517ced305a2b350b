use tracing::debug;

use crate::spell::{ResolvedCast, SpellEffect};
use crate::state::{ActorRoster, OccupancyIndex};

use super::{EffectKind, EffectOutcome};

/// Applies a resolved cast to every living actor standing in its cells.
///
/// Cells are visited in grid order, so outcomes are deterministic. Actors
/// already at zero health are not hit again; a heal does not revive them.
pub fn resolve_cast(
    cast: &ResolvedCast,
    roster: &mut ActorRoster,
    occupancy: &OccupancyIndex,
) -> Vec<EffectOutcome> {
    if cast.spell.effect == SpellEffect::None {
        return Vec::new();
    }

    let mut outcomes = Vec::new();
    for cell in &cast.cells {
        let Some(occupant) = occupancy.occupant(*cell) else {
            continue;
        };
        let Some(actor) = roster.get_mut(occupant.actor) else {
            continue;
        };
        if !actor.is_alive() {
            continue;
        }

        let effect = match cast.spell.effect {
            SpellEffect::Damage { amount, kind } => {
                let dealt = actor.apply_damage(amount);
                EffectKind::Damaged {
                    dealt,
                    kind,
                    defeated: !actor.is_alive(),
                }
            }
            SpellEffect::Heal { amount } => EffectKind::Healed {
                healed: actor.apply_heal(amount),
            },
            SpellEffect::None => continue,
        };

        debug!(
            spell = %cast.spell.id,
            caster = %cast.caster,
            target = %actor.id(),
            effect = ?effect,
            "spell effect applied"
        );
        outcomes.push(EffectOutcome {
            spell: cast.spell.id,
            caster: cast.caster,
            target: actor.id(),
            cell: *cell,
            effect,
        });
    }
    outcomes
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;
    use crate::grid::GridCell;
    use crate::spell::{DamageKind, SpellDescriptor, SpellId, SpellPattern};
    use crate::state::{Actor, ActorId, ActorKind, ActorSpec};

    fn board() -> (ActorRoster, OccupancyIndex) {
        let mut roster = ActorRoster::new();
        let mut occupancy = OccupancyIndex::new();
        for (name, cell, health) in [
            ("Aria", GridCell::new(0, 0), 10),
            ("Goblin", GridCell::new(1, 0), 7),
            ("Orc", GridCell::new(5, 5), 15),
        ] {
            let id = roster.next_id();
            let spec = ActorSpec::new(name, ActorKind::Monster).with_health(health);
            occupancy.insert(id, name, cell);
            roster.insert(Actor::new(id, &spec, cell, 0.0));
        }
        (roster, occupancy)
    }

    fn cast(effect: SpellEffect, cells: &[GridCell]) -> ResolvedCast {
        let spell = SpellDescriptor::new(SpellId(1), "Test", SpellPattern::Sphere).with_effect(effect);
        ResolvedCast {
            caster: ActorId(0),
            spell,
            origin: GridCell::ORIGIN,
            targets: vec![GridCell::ORIGIN],
            cells: cells.iter().copied().collect::<BTreeSet<_>>(),
        }
    }

    #[test]
    fn damage_hits_occupants_and_saturates() {
        let (mut roster, occupancy) = board();
        let fireball = cast(
            SpellEffect::Damage {
                amount: 8,
                kind: DamageKind::Fire,
            },
            &[GridCell::new(0, 0), GridCell::new(1, 0), GridCell::new(2, 0)],
        );

        let outcomes = resolve_cast(&fireball, &mut roster, &occupancy);
        assert_eq!(outcomes.len(), 2);
        assert_eq!(
            outcomes[1].effect,
            EffectKind::Damaged {
                dealt: 7,
                kind: DamageKind::Fire,
                defeated: true,
            }
        );
        assert!(outcomes[1].is_defeat());
        assert!(!outcomes[0].is_defeat());
        assert_eq!(roster.get(ActorId(2)).map(|a| a.health().current), Some(15));
    }

    #[test]
    fn defeated_actors_are_not_hit_or_healed() {
        let (mut roster, occupancy) = board();
        let cells = [GridCell::new(1, 0)];
        resolve_cast(
            &cast(
                SpellEffect::Damage {
                    amount: 50,
                    kind: DamageKind::Force,
                },
                &cells,
            ),
            &mut roster,
            &occupancy,
        );

        let heal = resolve_cast(&cast(SpellEffect::Heal { amount: 5 }, &cells), &mut roster, &occupancy);
        assert!(heal.is_empty());
    }

    #[test]
    fn heal_clamps_at_maximum() {
        let (mut roster, occupancy) = board();
        let cells = [GridCell::new(0, 0)];
        resolve_cast(
            &cast(
                SpellEffect::Damage {
                    amount: 3,
                    kind: DamageKind::Cold,
                },
                &cells,
            ),
            &mut roster,
            &occupancy,
        );

        let outcomes = resolve_cast(&cast(SpellEffect::Heal { amount: 10 }, &cells), &mut roster, &occupancy);
        assert_eq!(outcomes[0].effect, EffectKind::Healed { healed: 3 });
    }

    #[test]
    fn no_effect_spells_touch_nothing() {
        let (mut roster, occupancy) = board();
        assert!(resolve_cast(&cast(SpellEffect::None, &[GridCell::ORIGIN]), &mut roster, &occupancy).is_empty());
    }
}
