//! Error type surfaced by every engine verb.

use crate::env::ProbeError;
use crate::error::{ErrorSeverity, TacticsError};
use crate::grid::GridCell;
use crate::movement::MoveError;
use crate::spell::CastError;
use crate::state::ActorId;
use crate::turn::TurnError;

/// Errors surfaced while running a command through the tactics engine.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CommandError {
    #[error(transparent)]
    Move(#[from] MoveError),

    #[error(transparent)]
    Cast(#[from] CastError),

    #[error(transparent)]
    Turn(#[from] TurnError),

    #[error("actor {0} not found")]
    ActorNotFound(ActorId),

    /// Every cell within the spawn search radius is taken.
    #[error("no free cell within {radius} of {cell}")]
    NoFreeCell { cell: GridCell, radius: u32 },

    #[error("no ground to stand on at {cell}")]
    NoGroundToSpawn { cell: GridCell },

    #[error(transparent)]
    Probe(#[from] ProbeError),
}

impl TacticsError for CommandError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            CommandError::Move(e) => e.severity(),
            CommandError::Cast(e) => e.severity(),
            CommandError::Turn(e) => e.severity(),
            CommandError::ActorNotFound(_) => ErrorSeverity::Validation,
            CommandError::NoFreeCell { .. } | CommandError::NoGroundToSpawn { .. } => {
                ErrorSeverity::Recoverable
            }
            CommandError::Probe(_) => ErrorSeverity::Internal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            CommandError::Move(e) => e.error_code(),
            CommandError::Cast(e) => e.error_code(),
            CommandError::Turn(e) => e.error_code(),
            CommandError::ActorNotFound(_) => "actor_not_found",
            CommandError::NoFreeCell { .. } => "no_free_cell",
            CommandError::NoGroundToSpawn { .. } => "no_ground_to_spawn",
            CommandError::Probe(_) => "probe_unavailable",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrapped_errors_keep_their_classification() {
        let err = CommandError::from(MoveError::ProbeUnavailable(ProbeError::Unavailable(
            "offline".to_string(),
        )));
        assert_eq!(err.severity(), ErrorSeverity::Internal);
        assert_eq!(err.error_code(), "probe_unavailable");

        let err = CommandError::from(CastError::OutOfRange { distance: 5, max: 2 });
        assert!(err.severity().is_recoverable());
        assert_eq!(err.to_string(), "target is 5 cells away; range is 2");
    }
}
