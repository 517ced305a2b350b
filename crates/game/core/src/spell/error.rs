use crate::error::{ErrorSeverity, TacticsError};

use super::SpellId;

/// Rejections from the casting state machine.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CastError {
    #[error("unknown spell {0}")]
    UnknownSpell(SpellId),

    #[error("it is not your turn")]
    NotYourTurn,

    #[error("a cast is already in progress")]
    CastAlreadyActive,

    #[error("no cast in progress")]
    NoActiveSession,

    #[error("the cast took too long and fizzled")]
    SessionExpired,

    #[error("target is {distance} cells away; range is {max}")]
    OutOfRange { distance: u32, max: u32 },

    #[error("this spell does not take multiple targets")]
    NotMultiTarget,

    #[error("target limit reached ({max})")]
    TargetLimitReached { max: usize },

    #[error("projectile of spell {0} would never land")]
    ImpactOutOfReach(SpellId),

    #[error("needs {need} spell slots, have {have}")]
    InsufficientSlots { need: u32, have: u32 },
}

impl TacticsError for CastError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            CastError::UnknownSpell(_)
            | CastError::NoActiveSession
            | CastError::NotMultiTarget
            | CastError::ImpactOutOfReach(_) => ErrorSeverity::Validation,
            _ => ErrorSeverity::Recoverable,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            CastError::UnknownSpell(_) => "unknown_spell",
            CastError::NotYourTurn => "not_your_turn",
            CastError::CastAlreadyActive => "cast_already_active",
            CastError::NoActiveSession => "no_active_session",
            CastError::SessionExpired => "session_expired",
            CastError::OutOfRange { .. } => "out_of_range",
            CastError::NotMultiTarget => "not_multi_target",
            CastError::TargetLimitReached { .. } => "target_limit_reached",
            CastError::ImpactOutOfReach(_) => "impact_out_of_reach",
            CastError::InsufficientSlots { .. } => "insufficient_slots",
        }
    }
}
