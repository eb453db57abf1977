//! Numeric modifiers.
//!
//! ```text
//! [ Status ledger ] ──► attack / defense ratios ──► damage pipeline
//!        │
//!        └──► haste / slow ──► effective speed ──► initiative tier
//! ```
//!
//! ## Principles
//!
//! 1. **Integer math**: ratios are basis points, floored once per product
//! 2. **Deterministic**: pure functions, no I/O or randomness

pub mod ratio;
pub mod speed;

pub use ratio::{Ratio, percent_of, scale};
pub use speed::{
    Initiative, InitiativeBonus, PhaseQueue, SpeedTier, effective_speed, resolve_initiative,
};
