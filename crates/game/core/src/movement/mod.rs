//! Terrain- and occupancy-aware validation of single grid steps.
mod error;
mod validator;

pub use error::MoveError;
pub use validator::{MoveOutcome, MovementValidator, TurnGate};
