//! Runtime orchestration for the grid tactics layer.
//!
//! This crate wires together oracle access, the simulation worker and the
//! event bus into a cohesive runtime API. Consumers embed [`Runtime`] to drive
//! movement, casting and combat, subscribe to events, and interact with the
//! grid through [`RuntimeHandle`].
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the orchestrator and builder
//! - [`api`] exposes the types downstream clients interact with
//! - [`events`] provides topic-based event bus for flexible event routing
//! - [`oracle`] adapts static content to the core's oracle traits
//! - `workers` keeps the simulation task internal to the crate
pub mod api;
pub mod events;
pub mod oracle;
pub mod runtime;

mod workers;

pub use api::{Result, RuntimeError, RuntimeHandle};
pub use events::{CastingEvent, Event, EventBus, MovementEvent, Topic, TurnEvent};
pub use oracle::{HeightmapTerrain, OracleManager};
pub use runtime::{Runtime, RuntimeBuilder, RuntimeConfig};
