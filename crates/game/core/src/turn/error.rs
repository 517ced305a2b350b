use crate::error::{ErrorSeverity, TacticsError};

/// Errors from entering, leaving or advancing combat.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TurnError {
    #[error("combat is already active")]
    CombatAlreadyActive,

    #[error("combat is not active")]
    CombatNotActive,

    /// Every participant rolled a clamped total of zero.
    #[error("no one is eligible to take a turn")]
    NoEligibleParticipants,
}

impl TacticsError for TurnError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Recoverable
    }

    fn error_code(&self) -> &'static str {
        match self {
            TurnError::CombatAlreadyActive => "combat_already_active",
            TurnError::CombatNotActive => "combat_not_active",
            TurnError::NoEligibleParticipants => "no_eligible_participants",
        }
    }
}
