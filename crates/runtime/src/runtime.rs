//! High-level runtime orchestrator.
//!
//! The runtime owns the simulation worker, wires up command/event channels,
//! and exposes a builder-based API for clients to drive the tactics layer.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use tactics_core::{TacticsConfig, TacticsState};

use crate::api::{Result, RuntimeError, RuntimeHandle};
use crate::events::EventBus;
use crate::oracle::OracleManager;
use crate::workers::{Command, SimulationWorker};

/// Runtime configuration shared across the orchestrator and workers.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub tactics: TacticsConfig,
    pub event_buffer_size: usize,
    pub command_buffer_size: usize,
    /// How often the worker runs due timeline events on its own.
    pub tick_interval: Duration,
    /// Seed for initiative rolls when no initial state is supplied.
    pub game_seed: u64,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            tactics: TacticsConfig::default(),
            event_buffer_size: 100,
            command_buffer_size: 32,
            tick_interval: Duration::from_millis(50),
            game_seed: 0,
        }
    }
}

/// Main runtime that hosts the tactics simulation
///
/// [`RuntimeHandle`] provides a cloneable façade for clients.
pub struct Runtime {
    handle: RuntimeHandle,
    sim_worker_handle: JoinHandle<()>,
}

impl Runtime {
    /// Create a new runtime builder
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    /// Get a cloneable handle to this runtime
    ///
    /// The handle can be shared across clients and async tasks.
    pub fn handle(&self) -> RuntimeHandle {
        self.handle.clone()
    }

    /// Shutdown the runtime gracefully
    ///
    /// The worker stops once every outstanding handle clone is dropped.
    pub async fn shutdown(self) -> Result<()> {
        drop(self.handle);

        self.sim_worker_handle
            .await
            .map_err(RuntimeError::WorkerJoin)?;

        Ok(())
    }
}

/// Builder for [`Runtime`] with flexible configuration.
pub struct RuntimeBuilder {
    config: RuntimeConfig,
    state: Option<TacticsState>,
    oracles: Option<OracleManager>,
}

impl RuntimeBuilder {
    fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            state: None,
            oracles: None,
        }
    }

    /// Override runtime configuration
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Provide initial tactics state
    pub fn initial_state(mut self, state: TacticsState) -> Self {
        self.state = Some(state);
        self
    }

    /// Set required oracle manager
    pub fn oracles(mut self, oracles: OracleManager) -> Self {
        self.oracles = Some(oracles);
        self
    }

    /// Build the runtime and spawn its worker on the current tokio runtime.
    pub async fn build(self) -> Result<Runtime> {
        let oracles = self.oracles.ok_or(RuntimeError::MissingOracles)?;
        let state = self
            .state
            .unwrap_or_else(|| TacticsState::new(self.config.game_seed));

        let (command_tx, command_rx) = mpsc::channel::<Command>(self.config.command_buffer_size);
        let event_bus = EventBus::with_capacity(self.config.event_buffer_size);
        let handle = RuntimeHandle::new(command_tx, event_bus.clone());

        let sim_worker = SimulationWorker::new(
            state,
            self.config.tactics,
            oracles,
            command_rx,
            event_bus,
            self.config.tick_interval,
        );

        let sim_worker_handle = tokio::spawn(async move {
            sim_worker.run().await;
        });

        Ok(Runtime {
            handle,
            sim_worker_handle,
        })
    }
}
