//! Simulation worker that owns the authoritative [`TacticsState`].
//!
//! Receives commands from [`crate::RuntimeHandle`], runs them through
//! [`TacticsEngine`] one at a time, and publishes events to the EventBus.
//! The worker task is the world timeline: every state mutation, including
//! scheduled projectile impacts, happens here in order.

use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info};

use tactics_core::{
    ActorId, ActorSpec, CancelOutcome, CastPreview, CastResolution, CommandError,
    ConfirmOutcome, FreezeCause, ImpactTiming, InitiativeRoll, MoveOutcome, Participant, SpellId,
    TacticsConfig, TacticsEngine, TacticsEnv, TacticsError, TacticsState, TimelineOutcome,
    TurnChange, WorldPoint,
};

use crate::events::{CastingEvent, Event, EventBus, MovementEvent, TurnEvent};
use crate::oracle::OracleManager;

pub type CommandResult<T> = std::result::Result<T, CommandError>;

/// Commands that can be sent to the simulation worker
pub enum Command {
    SpawnActor {
        spec: ActorSpec,
        at: WorldPoint,
        reply: oneshot::Sender<CommandResult<ActorId>>,
    },
    DespawnActor {
        actor: ActorId,
        reply: oneshot::Sender<CommandResult<()>>,
    },
    RequestMove {
        actor: ActorId,
        point: WorldPoint,
        reply: oneshot::Sender<CommandResult<MoveOutcome>>,
    },
    Freeze {
        actor: ActorId,
        cause: FreezeCause,
        reply: oneshot::Sender<CommandResult<()>>,
    },
    Unfreeze {
        actor: ActorId,
        reply: oneshot::Sender<CommandResult<Option<FreezeCause>>>,
    },
    PrepareCast {
        caster: ActorId,
        spell: SpellId,
        reply: oneshot::Sender<CommandResult<CastPreview>>,
    },
    ConfirmTarget {
        caster: ActorId,
        reply: oneshot::Sender<CommandResult<ConfirmOutcome>>,
    },
    FinalizeCast {
        caster: ActorId,
        reply: oneshot::Sender<CommandResult<CastResolution>>,
    },
    CancelCast {
        caster: ActorId,
        reply: oneshot::Sender<CommandResult<CancelOutcome>>,
    },
    StartCombat {
        reply: oneshot::Sender<CommandResult<Vec<Participant>>>,
    },
    EndCombat {
        reply: oneshot::Sender<CommandResult<()>>,
    },
    AdvanceTurn {
        reply: oneshot::Sender<CommandResult<TurnChange>>,
    },
    RollInitiative {
        actor: ActorId,
        reply: oneshot::Sender<CommandResult<InitiativeRoll>>,
    },
    /// Run the timeline up to the current clock without waiting for a tick.
    Tick {
        reply: oneshot::Sender<Vec<TimelineOutcome>>,
    },
    /// Query the current state (read-only snapshot).
    QueryState { reply: oneshot::Sender<TacticsState> },
}

/// Background task that processes tactics commands.
pub struct SimulationWorker {
    state: TacticsState,
    config: TacticsConfig,
    oracles: OracleManager,
    command_rx: mpsc::Receiver<Command>,
    event_bus: EventBus,
    tick_interval: Duration,
}

impl SimulationWorker {
    pub fn new(
        state: TacticsState,
        config: TacticsConfig,
        oracles: OracleManager,
        command_rx: mpsc::Receiver<Command>,
        event_bus: EventBus,
        tick_interval: Duration,
    ) -> Self {
        info!(
            target: "runtime::worker",
            actors = state.roster.len(),
            spells = oracles.spells().len(),
            "SimulationWorker initialized"
        );

        Self {
            state,
            config,
            oracles,
            command_rx,
            event_bus,
            tick_interval,
        }
    }

    /// Main worker loop. Ends when every command sender is dropped.
    pub async fn run(mut self) {
        let mut ticker = tokio::time::interval(self.tick_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        // A supplied initial state may carry entries for actors it no longer has.
        let pruned = self.run_engine(|engine, _| engine.prune_stale_occupancy());
        if !pruned.is_empty() {
            debug!(target: "runtime::worker", pruned = ?pruned, "dropped stale occupancy before start");
        }

        loop {
            tokio::select! {
                cmd = self.command_rx.recv() => match cmd {
                    Some(cmd) => self.handle_command(cmd),
                    None => break,
                },
                _ = ticker.tick() => {
                    self.advance_timeline();
                }
            }
        }
        debug!(target: "runtime::worker", "command channel closed, worker stopping");
    }

    fn handle_command(&mut self, cmd: Command) {
        match cmd {
            Command::SpawnActor { spec, at, reply } => {
                let result = self.run_engine(|engine, env| engine.spawn_actor(&spec, at, env));
                if let Ok(actor) = &result
                    && let Some(spawned) = self.state.actor(*actor)
                {
                    self.publish(Event::Movement(MovementEvent::Spawned {
                        actor: *actor,
                        name: spawned.name().to_string(),
                        cell: spawned.cell(),
                    }));
                }
                self.finish("spawn_actor", reply, result);
            }
            Command::DespawnActor { actor, reply } => {
                let current = self.current_turn();
                let result = self
                    .run_engine(|engine, _| engine.despawn_actor(actor))
                    .map(|_| ());
                if result.is_ok() {
                    self.publish(Event::Movement(MovementEvent::Despawned { actor }));
                    if current == Some(actor) {
                        self.publish_current_turn(false);
                    }
                }
                self.finish("despawn_actor", reply, result);
            }
            Command::RequestMove {
                actor,
                point,
                reply,
            } => {
                let result = self.run_engine(|engine, env| engine.request_move(actor, point, env));
                match &result {
                    Ok(outcome) => self.publish_move(actor, outcome),
                    Err(e) => self.publish(Event::Movement(MovementEvent::Rejected {
                        actor,
                        code: e.error_code().to_string(),
                        message: e.to_string(),
                        frozen: self.state.actor(actor).and_then(|a| a.freeze_cause().cloned()),
                    })),
                }
                self.finish("request_move", reply, result);
            }
            Command::Freeze {
                actor,
                cause,
                reply,
            } => {
                let result = self.run_engine(|engine, _| engine.freeze(actor, cause));
                self.finish("freeze", reply, result);
            }
            Command::Unfreeze { actor, reply } => {
                let result = self.run_engine(|engine, _| engine.unfreeze(actor));
                if let Ok(Some(_)) = &result
                    && let Some(cell) = self.state.actor(actor).map(|a| a.cell())
                {
                    self.publish(Event::Movement(MovementEvent::Unfrozen { actor, cell }));
                }
                self.finish("unfreeze", reply, result);
            }
            Command::PrepareCast {
                caster,
                spell,
                reply,
            } => {
                let result = self.run_engine(|engine, env| engine.prepare_cast(caster, spell, env));
                if let Ok(preview) = &result {
                    self.publish(Event::Casting(CastingEvent::Prepared {
                        caster,
                        spell: preview.spell,
                        origin: preview.origin,
                        frozen: preview.frozen,
                    }));
                }
                self.finish("prepare_cast", reply, result);
            }
            Command::ConfirmTarget { caster, reply } => {
                let result = self.run_engine(|engine, env| engine.confirm_target(caster, env));
                if let Ok(ConfirmOutcome::Added { confirmed }) = &result {
                    self.publish(Event::Casting(CastingEvent::TargetConfirmed {
                        caster,
                        confirmed: *confirmed,
                    }));
                }
                self.finish("confirm_target", reply, result);
            }
            Command::FinalizeCast { caster, reply } => {
                let result = self.run_engine(|engine, env| engine.finalize_cast(caster, env));
                if let Ok(resolution) = &result {
                    self.publish_resolution(resolution);
                }
                self.finish("finalize_cast", reply, result);
            }
            Command::CancelCast { caster, reply } => {
                let result = self.run_engine(|engine, env| engine.cancel_cast(caster, env));
                if let Ok(CancelOutcome::Cancelled { .. }) = &result {
                    self.publish(Event::Casting(CastingEvent::Cancelled { caster }));
                }
                self.finish("cancel_cast", reply, result);
            }
            Command::StartCombat { reply } => {
                let result = self.run_engine(|engine, env| engine.start_combat(env));
                if let Ok(order) = &result {
                    self.publish(Event::Turn(TurnEvent::CombatStarted {
                        order: order.clone(),
                    }));
                    self.publish_current_turn(true);
                }
                self.finish("start_combat", reply, result);
            }
            Command::EndCombat { reply } => {
                let result = self.run_engine(|engine, _| engine.end_combat());
                if result.is_ok() {
                    self.publish(Event::Turn(TurnEvent::CombatEnded));
                }
                self.finish("end_combat", reply, result);
            }
            Command::AdvanceTurn { reply } => {
                let result = self.run_engine(|engine, _| engine.advance_turn());
                if let Ok(change) = &result {
                    self.publish(Event::Turn(TurnEvent::TurnStarted {
                        actor: change.actor,
                        name: change.name.clone(),
                        round: change.round,
                        new_round: change.new_round,
                    }));
                }
                self.finish("advance_turn", reply, result);
            }
            Command::RollInitiative { actor, reply } => {
                let result = self.run_engine(|engine, env| engine.roll_initiative(actor, env));
                self.finish("roll_initiative", reply, result);
            }
            Command::Tick { reply } => {
                let outcomes = self.advance_timeline();
                if reply.send(outcomes).is_err() {
                    debug!(target: "runtime::worker", "Tick reply channel closed (caller dropped)");
                }
            }
            Command::QueryState { reply } => {
                if reply.send(self.state.clone()).is_err() {
                    debug!(target: "runtime::worker", "QueryState reply channel closed (caller dropped)");
                }
            }
        }
        self.flush_overlay();
    }

    /// Runs one engine verb against the owned state.
    fn run_engine<T>(
        &mut self,
        verb: impl FnOnce(&mut TacticsEngine<'_>, TacticsEnv<'_>) -> T,
    ) -> T {
        let env = self.oracles.as_env();
        let mut engine = TacticsEngine::new(&mut self.state, &self.config);
        verb(&mut engine, env)
    }

    /// Drains every timeline event due on the world clock.
    fn advance_timeline(&mut self) -> Vec<TimelineOutcome> {
        let now = self.oracles.now();
        let outcomes = self.run_engine(|engine, _| engine.advance_timeline(now));

        for outcome in &outcomes {
            if let TimelineOutcome::ProjectileLanded { outcomes, .. } = outcome {
                for effect in outcomes {
                    self.publish(Event::Casting(CastingEvent::EffectApplied(effect.clone())));
                }
            }
        }
        if !outcomes.is_empty() {
            self.flush_overlay();
        }
        outcomes
    }

    fn publish_move(&self, actor: ActorId, outcome: &MoveOutcome) {
        let event = match *outcome {
            MoveOutcome::Moved {
                from,
                to,
                facing,
                charged,
            } => MovementEvent::Moved {
                actor,
                from,
                to,
                facing,
                charged,
            },
            MoveOutcome::Unfrozen { cell } => MovementEvent::Unfrozen { actor, cell },
            MoveOutcome::Aimed { aim } => MovementEvent::AimMoved { actor, aim },
            MoveOutcome::Stayed { .. } => return,
        };
        self.publish(Event::Movement(event));
    }

    fn publish_resolution(&self, resolution: &CastResolution) {
        let cast = &resolution.cast;
        let impact_at_ms = match &resolution.impact {
            ImpactTiming::Scheduled { due } => Some(due.as_millis() as u64),
            ImpactTiming::Immediate(_) => None,
        };
        self.publish(Event::Casting(CastingEvent::Finalized {
            caster: cast.caster,
            spell: cast.spell.id,
            targets: cast.targets.clone(),
            impact_at_ms,
        }));
        if let ImpactTiming::Immediate(outcomes) = &resolution.impact {
            for effect in outcomes {
                self.publish(Event::Casting(CastingEvent::EffectApplied(effect.clone())));
            }
        }
    }

    fn current_turn(&self) -> Option<ActorId> {
        self.state.turn.current().map(|p| p.actor)
    }

    fn publish_current_turn(&self, new_round: bool) {
        if let Some(current) = self.state.turn.current() {
            self.publish(Event::Turn(TurnEvent::TurnStarted {
                actor: current.actor,
                name: current.name.clone(),
                round: self.state.turn.round(),
                new_round,
            }));
        }
    }

    fn flush_overlay(&mut self) {
        for event in self.state.overlay.drain() {
            self.event_bus.publish(Event::Overlay(event));
        }
    }

    fn publish(&self, event: Event) {
        self.event_bus.publish(event);
    }

    fn finish<T>(
        &self,
        verb: &'static str,
        reply: oneshot::Sender<CommandResult<T>>,
        result: CommandResult<T>,
    ) {
        if let Err(e) = &result {
            if e.severity().is_internal() {
                error!(target: "runtime::worker", verb, code = e.error_code(), error = %e, "command failed");
            } else {
                debug!(target: "runtime::worker", verb, code = e.error_code(), error = %e, "command rejected");
            }
        }
        if reply.send(result).is_err() {
            debug!(target: "runtime::worker", verb, "reply channel closed (caller dropped)");
        }
    }
}
