//! Worker tasks that back the runtime orchestration.
//!
//! The simulation worker owns the tactics state and executes every command.

mod simulation;

pub use simulation::{Command, CommandResult, SimulationWorker};
