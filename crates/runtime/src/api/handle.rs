//! Cloneable façade for issuing commands to the runtime.
//!
//! [`RuntimeHandle`] hides channel plumbing and offers one async method per
//! tactics verb, plus topic subscriptions on the event bus.
use tokio::sync::{broadcast, mpsc, oneshot};

use tactics_core::{
    ActorId, ActorSpec, CancelOutcome, CastPreview, CastResolution, ConfirmOutcome, FreezeCause,
    InitiativeRoll, MoveOutcome, Participant, SpellId, TacticsState, TimelineOutcome, TurnChange,
    WorldPoint,
};

use super::errors::{Result, RuntimeError};
use crate::events::{Event, EventBus, Topic};
use crate::workers::{Command, CommandResult};

/// Client-facing handle to interact with the runtime
#[derive(Clone)]
pub struct RuntimeHandle {
    command_tx: mpsc::Sender<Command>,
    event_bus: EventBus,
}

impl RuntimeHandle {
    pub(crate) fn new(command_tx: mpsc::Sender<Command>, event_bus: EventBus) -> Self {
        Self {
            command_tx,
            event_bus,
        }
    }

    /// Sends a command and waits for the worker's reply.
    async fn send<T>(&self, build: impl FnOnce(oneshot::Sender<T>) -> Command) -> Result<T> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(build(reply_tx))
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)?;

        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)
    }

    /// Like [`Self::send`], for verbs the engine may refuse.
    async fn execute<T>(
        &self,
        build: impl FnOnce(oneshot::Sender<CommandResult<T>>) -> Command,
    ) -> Result<T> {
        Ok(self.send(build).await??)
    }

    /// Places an actor at the free cell nearest `at`.
    pub async fn spawn_actor(&self, spec: ActorSpec, at: WorldPoint) -> Result<ActorId> {
        self.execute(|reply| Command::SpawnActor { spec, at, reply })
            .await
    }

    pub async fn despawn_actor(&self, actor: ActorId) -> Result<()> {
        self.execute(|reply| Command::DespawnActor { actor, reply })
            .await
    }

    /// Feeds a continuous avatar position to the movement validator.
    pub async fn request_move(&self, actor: ActorId, point: WorldPoint) -> Result<MoveOutcome> {
        self.execute(|reply| Command::RequestMove {
            actor,
            point,
            reply,
        })
        .await
    }

    pub async fn freeze(&self, actor: ActorId, cause: FreezeCause) -> Result<()> {
        self.execute(|reply| Command::Freeze {
            actor,
            cause,
            reply,
        })
        .await
    }

    pub async fn unfreeze(&self, actor: ActorId) -> Result<Option<FreezeCause>> {
        self.execute(|reply| Command::Unfreeze { actor, reply })
            .await
    }

    pub async fn prepare_cast(&self, caster: ActorId, spell: SpellId) -> Result<CastPreview> {
        self.execute(|reply| Command::PrepareCast {
            caster,
            spell,
            reply,
        })
        .await
    }

    pub async fn confirm_target(&self, caster: ActorId) -> Result<ConfirmOutcome> {
        self.execute(|reply| Command::ConfirmTarget { caster, reply })
            .await
    }

    pub async fn finalize_cast(&self, caster: ActorId) -> Result<CastResolution> {
        self.execute(|reply| Command::FinalizeCast { caster, reply })
            .await
    }

    pub async fn cancel_cast(&self, caster: ActorId) -> Result<CancelOutcome> {
        self.execute(|reply| Command::CancelCast { caster, reply })
            .await
    }

    pub async fn start_combat(&self) -> Result<Vec<Participant>> {
        self.execute(|reply| Command::StartCombat { reply }).await
    }

    pub async fn end_combat(&self) -> Result<()> {
        self.execute(|reply| Command::EndCombat { reply }).await
    }

    pub async fn advance_turn(&self) -> Result<TurnChange> {
        self.execute(|reply| Command::AdvanceTurn { reply }).await
    }

    pub async fn roll_initiative(&self, actor: ActorId) -> Result<InitiativeRoll> {
        self.execute(|reply| Command::RollInitiative { actor, reply })
            .await
    }

    /// Runs scheduled events that are due now instead of waiting for the
    /// worker's next tick.
    pub async fn tick(&self) -> Result<Vec<TimelineOutcome>> {
        self.send(|reply| Command::Tick { reply }).await
    }

    /// Query the current tactics state (read-only snapshot)
    pub async fn query_state(&self) -> Result<TacticsState> {
        self.send(|reply| Command::QueryState { reply }).await
    }

    /// Subscribe to events from a specific topic
    ///
    /// # Topics
    ///
    /// - `Topic::Movement` - Spawns, steps, freezes and rejections
    /// - `Topic::Turn` - Combat start/end and turn changes
    /// - `Topic::Casting` - Casting sessions and landed effects
    /// - `Topic::Overlay` - Cell highlight requests
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.event_bus.subscribe(topic)
    }

    /// Subscribe to multiple topics at once
    pub fn subscribe_multiple(
        &self,
        topics: &[Topic],
    ) -> std::collections::HashMap<Topic, broadcast::Receiver<Event>> {
        self.event_bus.subscribe_multiple(topics)
    }

    /// Get a reference to the event bus for advanced usage
    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }
}
