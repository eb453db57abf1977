//! Common error infrastructure for combat-core.
//!
//! Domain-specific errors (`PlayError`, `CatalogError`, `InvariantViolation`)
//! live next to the code that raises them; this module provides the shared
//! severity model so callers can decide how to react without matching on
//! every variant.
//!
//! # Design Principles
//!
//! - **Outcomes are not errors**: victory, defeat and missed criticals are
//!   ordinary return values
//! - **Fail fast on data**: malformed catalogs are rejected before an
//!   encounter starts
//! - **Never crash on play**: illegal plays are recoverable and leave state
//!   untouched

/// Severity level of an error, used for categorization and recovery strategies.
///
/// - **Recoverable**: the caller may pick a different action (illegal play)
/// - **Validation**: invalid input data, must be fixed before retrying
/// - **Internal**: a rules defect was observed and compensated for
/// - **Fatal**: the encounter cannot continue
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Recoverable error - retry with an alternative action.
    ///
    /// Examples: not enough energy, actor stunned
    Recoverable,

    /// Validation error - invalid input, should not retry without changes.
    ///
    /// Examples: action without base power, scripted phase index of zero
    Validation,

    /// Internal error - unexpected state inconsistency.
    ///
    /// Examples: negative guard after allocation.
    /// These indicate bugs and should be investigated.
    Internal,

    /// Fatal error - encounter state corrupted, cannot continue.
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

    /// Returns true if this error indicates an internal bug.
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal | Self::Fatal)
    }
}

/// Common trait for all combat-core errors.
///
/// # Implementation Guidelines
///
/// - All error enums should implement this trait
/// - Use `#[derive(thiserror::Error)]` for Display/Error impl
/// - Classify severity based on recoverability, not impact
pub trait GameError: core::fmt::Display + core::fmt::Debug {
    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity;

    /// Returns a static string identifier for this error variant.
    ///
    /// Default implementation uses the error type name.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}
