//! Action domain.
//!
//! # Module Structure
//!
//! - `types`: [`Action`] and [`ActionCategory`], the data a card or enemy move carries
//! - `pattern`: scripted and pooled enemy patterns with health conditions
//! - `selector`: choosing an enemy's action for a phase

pub mod pattern;
pub mod selector;
pub mod types;

pub use pattern::{ActionPattern, HealthCondition, PoolBand, pool_bands};
pub use selector::{Selection, SelectionSource, pick_pooled, select_action};
pub use types::{Action, ActionCategory};
