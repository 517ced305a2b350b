//! Common error infrastructure for tactics-core.
//!
//! Domain-specific errors (`MoveError`, `CastError`, `TurnError`) live next to
//! the component that produces them. Every one of them is an expected outcome
//! surfaced to the initiating actor; this module gives callers a uniform way to
//! classify them for logging and user feedback.
//!
//! # Design Principles
//!
//! - **Explicit results**: rejections are values, never panics
//! - **No partial mutation**: an error means shared state was left untouched
//!   (freezes are the documented exception for movement rejections)
//! - **Severity Classification**: errors are categorized for recovery strategies

/// Severity level of an error, used for categorization and recovery strategies.
///
/// - **Recoverable**: the player can retry after repositioning or waiting
/// - **Validation**: the request itself was malformed for the current state
/// - **Internal**: a collaborator boundary is broken and needs investigation
/// - **Fatal**: state invariants no longer hold
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Recoverable error - can retry with same or alternative action.
    ///
    /// Examples: destination blocked, target out of range, not your turn
    Recoverable,

    /// Validation error - invalid input, should not retry without changes.
    ///
    /// Examples: actor not found, unknown spell, no active session
    Validation,

    /// Internal error - an external collaborator failed to answer.
    ///
    /// Examples: terrain probe unavailable
    Internal,

    /// Fatal error - state corrupted, cannot continue.
    Fatal,
}

impl ErrorSeverity {
    /// Returns a human-readable description of this severity level.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
            Self::Fatal => "fatal",
        }
    }

    /// Returns true if this error is potentially recoverable.
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }

    /// Returns true if this error indicates a broken boundary or a bug.
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal | Self::Fatal)
    }
}

/// Common trait for all tactics-core errors.
///
/// # Implementation Guidelines
///
/// - Use `#[derive(thiserror::Error)]` for Display/Error impl
/// - Classify severity based on recoverability, not impact
/// - Keep `error_code` stable; the command layer keys user-facing text off it
pub trait TacticsError: core::fmt::Display + core::fmt::Debug {
    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity;

    /// Returns a static string identifier for this error variant.
    ///
    /// Default implementation uses the error type name.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}
