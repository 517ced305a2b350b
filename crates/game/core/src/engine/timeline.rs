use std::time::Duration;

use tracing::debug;

use crate::combat::{EffectOutcome, resolve_cast};
use crate::schedule::TimelineEvent;
use crate::spell::SpellId;
use crate::state::ActorId;

use super::TacticsEngine;

/// Something that happened when scheduled work came due.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TimelineOutcome {
    ProjectileLanded {
        caster: ActorId,
        spell: SpellId,
        outcomes: Vec<EffectOutcome>,
    },
    OverlayCleared {
        owner: ActorId,
    },
}

impl<'a> TacticsEngine<'a> {
    /// Runs every scheduled event due at or before `now`, oldest first.
    pub fn advance_timeline(&mut self, now: Duration) -> Vec<TimelineOutcome> {
        let due = self.state.timeline.drain_due(now);
        let mut results = Vec::with_capacity(due.len());

        for event in due {
            match event {
                TimelineEvent::ProjectileImpact { cast } => {
                    let outcomes =
                        resolve_cast(&cast, &mut self.state.roster, &self.state.occupancy);
                    debug!(
                        caster = %cast.caster,
                        spell = %cast.spell.id,
                        hits = outcomes.len(),
                        "projectile landed"
                    );
                    results.push(TimelineOutcome::ProjectileLanded {
                        caster: cast.caster,
                        spell: cast.spell.id,
                        outcomes,
                    });
                }
                TimelineEvent::ClearOverlay { owner, generation } => {
                    if self.state.overlay.clear_generation(owner, generation) {
                        results.push(TimelineOutcome::OverlayCleared { owner });
                    }
                }
            }
        }
        results
    }
}
