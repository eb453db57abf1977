//! Combat resolution system.
//!
//! This module provides pure functions for resolving combat interactions.
//! All combat logic is deterministic; randomness enters only through the
//! critical roll passed in (or drawn from [`crate::env::Dice`]).
//!
//! # Core Functions
//!
//! - `calculate_damage`: attacker/defender modifiers → damage for one hit
//! - `allocate_damage`: guard → secondary armor → health split
//! - `resolve_action`: complete action resolution over all hits and effects

pub mod allocation;
pub mod damage;
pub mod result;

pub use allocation::{DamageAllocation, allocate_damage};
pub use damage::{DamageResult, calculate_damage, critical_rate};
pub use result::{ActionResolution, HitOutcome, resolve_action};
