//! Read-only inputs to an encounter.
//!
//! Catalogs describe cards, enemies and the player; [`Dice`] is the only
//! source of randomness. Both are consumed by the engine but never mutated
//! by rules code.
mod catalog;
mod rng;
mod validation;

pub use catalog::{
    CardDefinition, Catalog, CatalogOracle, EnemyDefinition, EquipmentBonus, PlayerProfile,
};
pub use rng::{Dice, PcgRng, RngOracle, RollPurpose, compute_seed};
pub use validation::{
    CatalogError, CatalogWarning, validate_action, validate_card, validate_catalog,
    validate_enemy,
};
