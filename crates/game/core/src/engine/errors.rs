//! Error types for the phase engine.

use crate::env::CatalogError;
use crate::error::{ErrorSeverity, GameError};
use crate::state::{Outcome, Phase, StatusKind};

/// An illegal play. The engine state is left untouched.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PlayError {
    #[error("encounter already finished ({0:?})")]
    Finished(Outcome),

    #[error("operation not allowed during {0}")]
    WrongPhase(Phase),

    #[error("hand has no card at index {index} (hand size {hand_size})")]
    InvalidHandIndex { index: usize, hand_size: usize },

    #[error("card '{card}' costs {cost} energy but only {available} is available")]
    InsufficientEnergy {
        card: String,
        cost: u32,
        available: u32,
    },

    #[error("player cannot act while {0} is active")]
    Disabled(StatusKind),
}

impl GameError for PlayError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Recoverable
    }

    fn error_code(&self) -> &'static str {
        use PlayError::*;
        match self {
            Finished(_) => "PLAY_FINISHED",
            WrongPhase(_) => "PLAY_WRONG_PHASE",
            InvalidHandIndex { .. } => "PLAY_INVALID_HAND_INDEX",
            InsufficientEnergy { .. } => "PLAY_INSUFFICIENT_ENERGY",
            Disabled(_) => "PLAY_DISABLED",
        }
    }
}

/// Failure to assemble an encounter from catalog data.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SetupError {
    #[error("unknown enemy '{0}'")]
    UnknownEnemy(String),

    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

impl GameError for SetupError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            SetupError::UnknownEnemy(_) => "SETUP_UNKNOWN_ENEMY",
            SetupError::Catalog(inner) => inner.error_code(),
        }
    }
}
