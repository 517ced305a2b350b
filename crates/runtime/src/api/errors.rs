//! Unified error types surfaced by the runtime API.
//!
//! Wraps failures from worker coordination and the tactics engine so clients
//! can bubble them up with consistent context.
use thiserror::Error;
use tokio::sync::oneshot;

use tactics_core::{CommandError, ErrorSeverity, TacticsError};

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("simulation worker command channel closed")]
    CommandChannelClosed,

    #[error("simulation worker reply channel closed")]
    ReplyChannelClosed(#[source] oneshot::error::RecvError),

    #[error("simulation worker join failed")]
    WorkerJoin(#[source] tokio::task::JoinError),

    #[error("runtime requires oracles to be configured before building")]
    MissingOracles,

    /// The engine refused the command; state is unchanged apart from any
    /// freeze the rejection applies.
    #[error(transparent)]
    Command(#[from] CommandError),
}

impl RuntimeError {
    /// The engine error behind this failure, if the command reached the worker.
    pub fn command(&self) -> Option<&CommandError> {
        match self {
            RuntimeError::Command(e) => Some(e),
            _ => None,
        }
    }
}

impl TacticsError for RuntimeError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            RuntimeError::Command(e) => e.severity(),
            RuntimeError::MissingOracles => ErrorSeverity::Validation,
            RuntimeError::CommandChannelClosed
            | RuntimeError::ReplyChannelClosed(_)
            | RuntimeError::WorkerJoin(_) => ErrorSeverity::Fatal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            RuntimeError::Command(e) => e.error_code(),
            RuntimeError::MissingOracles => "missing_oracles",
            RuntimeError::CommandChannelClosed => "command_channel_closed",
            RuntimeError::ReplyChannelClosed(_) => "reply_channel_closed",
            RuntimeError::WorkerJoin(_) => "worker_join",
        }
    }
}
