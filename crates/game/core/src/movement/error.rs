use crate::env::ProbeError;
use crate::error::{ErrorSeverity, TacticsError};
use crate::grid::GridCell;
use crate::state::{ActorId, FreezeCause};

/// Rejections from the movement validator.
///
/// Terrain and collision rejections also freeze the actor; see
/// [`MovementValidator::try_move`](super::MovementValidator::try_move).
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MoveError {
    #[error("frozen: {}", .cause.reason())]
    Frozen { cause: FreezeCause },

    #[error("a move is already being processed")]
    MoveInFlight,

    #[error("{to} is not adjacent to {from}")]
    NotAdjacent { from: GridCell, to: GridCell },

    #[error("it is not your turn")]
    NotYourTurn,

    #[error("cell is occupied by {by}")]
    CellOccupied { by: String },

    #[error("no ground at {cell}")]
    NoGround { cell: GridCell },

    #[error("too steep ({diff:+.2})")]
    TooSteep { diff: f32 },

    #[error("fluid at {cell}")]
    FluidBlocked { cell: GridCell },

    #[error("needs {need:.1} movement, {have:.1} left")]
    InsufficientBudget { need: f32, have: f32 },

    #[error("terrain probe failed: {0}")]
    ProbeUnavailable(ProbeError),

    #[error("occupancy desync for actor {actor} at {cell}")]
    OccupancyDesync { actor: ActorId, cell: GridCell },
}

impl TacticsError for MoveError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            MoveError::ProbeUnavailable(_) => ErrorSeverity::Internal,
            MoveError::OccupancyDesync { .. } => ErrorSeverity::Fatal,
            _ => ErrorSeverity::Recoverable,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            MoveError::Frozen { .. } => "frozen",
            MoveError::MoveInFlight => "move_in_flight",
            MoveError::NotAdjacent { .. } => "not_adjacent",
            MoveError::NotYourTurn => "not_your_turn",
            MoveError::CellOccupied { .. } => "cell_occupied",
            MoveError::NoGround { .. } => "no_ground",
            MoveError::TooSteep { .. } => "too_steep",
            MoveError::FluidBlocked { .. } => "fluid_blocked",
            MoveError::InsufficientBudget { .. } => "insufficient_budget",
            MoveError::ProbeUnavailable(_) => "probe_unavailable",
            MoveError::OccupancyDesync { .. } => "occupancy_desync",
        }
    }
}
