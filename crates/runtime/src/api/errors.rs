//! Unified error types surfaced by the runtime API.
//!
//! Wraps failures from worker coordination, encounter setup, illegal plays,
//! and action providers so clients can bubble them up with consistent context.
use thiserror::Error;
use tokio::sync::oneshot;

use combat_core::{ErrorSeverity, GameError, PlayError, SetupError};

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("player action provider not set")]
    ProviderNotSet,

    #[error("action provider failed: {0}")]
    Provider(String),

    #[error("simulation worker command channel closed")]
    CommandChannelClosed,

    #[error("simulation worker reply channel closed")]
    ReplyChannelClosed(#[source] oneshot::error::RecvError),

    #[error("simulation worker join failed")]
    WorkerJoin(#[source] tokio::task::JoinError),

    #[error("runtime requires a catalog to be configured before building")]
    MissingCatalog,

    #[error("runtime requires an enemy id to be configured before building")]
    MissingEnemy,

    #[error("failed to set up encounter")]
    Setup(#[from] SetupError),

    #[error(transparent)]
    Play(#[from] PlayError),

    #[error("encounter still running after {max_rounds} rounds")]
    RoundLimitExceeded { max_rounds: u32 },

    #[error("failed to open event journal")]
    Journal(#[source] std::io::Error),
}

impl GameError for RuntimeError {
    fn severity(&self) -> ErrorSeverity {
        use RuntimeError::*;
        match self {
            Play(inner) => inner.severity(),
            Setup(inner) => inner.severity(),
            Provider(_) | RoundLimitExceeded { .. } => ErrorSeverity::Recoverable,
            ProviderNotSet | MissingCatalog | MissingEnemy => ErrorSeverity::Validation,
            CommandChannelClosed | ReplyChannelClosed(_) | WorkerJoin(_) | Journal(_) => {
                ErrorSeverity::Fatal
            }
        }
    }

    fn error_code(&self) -> &'static str {
        use RuntimeError::*;
        match self {
            ProviderNotSet => "RUNTIME_PROVIDER_NOT_SET",
            Provider(_) => "RUNTIME_PROVIDER",
            CommandChannelClosed => "RUNTIME_COMMAND_CHANNEL_CLOSED",
            ReplyChannelClosed(_) => "RUNTIME_REPLY_CHANNEL_CLOSED",
            WorkerJoin(_) => "RUNTIME_WORKER_JOIN",
            MissingCatalog => "RUNTIME_MISSING_CATALOG",
            MissingEnemy => "RUNTIME_MISSING_ENEMY",
            Setup(inner) => inner.error_code(),
            Play(inner) => inner.error_code(),
            RoundLimitExceeded { .. } => "RUNTIME_ROUND_LIMIT",
            Journal(_) => "RUNTIME_JOURNAL",
        }
    }
}
