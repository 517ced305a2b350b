//! Initiative rolls and combat turn order.
mod error;
mod initiative;
mod manager;

pub use error::TurnError;
pub use initiative::{InitiativeRoll, Participant, roll_initiative};
pub use manager::TurnManager;
