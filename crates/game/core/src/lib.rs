//! Deterministic combat rules for a turn-based deck-building encounter.
//!
//! `combat-core` defines the canonical rules (damage pipeline, guard/armor
//! allocation, status ledger, initiative, enemy selection, phase engine) and
//! exposes pure APIs that can be reused by both the runtime and offline tools.
//! All encounter mutation flows through [`engine::CombatEngine`], and
//! supporting crates depend on the types re-exported here.
pub mod action;
pub mod combat;
pub mod config;
pub mod engine;
pub mod env;
pub mod error;
pub mod state;
pub mod stats;

pub use action::{
    Action, ActionCategory, ActionPattern, HealthCondition, Selection, SelectionSource,
    select_action,
};
pub use combat::{
    ActionResolution, DamageAllocation, DamageResult, HitOutcome, allocate_damage,
    calculate_damage, resolve_action,
};
pub use config::CombatConfig;
pub use engine::{
    Advance, CombatEngine, CombatEvent, EncounterSummary, EnemyTurn, IdleReason, PlayError,
    SetupError,
};
pub use env::{
    CardDefinition, Catalog, CatalogError, CatalogOracle, CatalogWarning, Dice,
    EnemyDefinition, EquipmentBonus, PcgRng, PlayerProfile, RngOracle,
};
pub use error::{ErrorSeverity, GameError};
pub use state::{
    CombatantState, DeckPiles, EffectDuration, EncounterState, InvariantViolation, Outcome,
    Phase, Side, StatusEffectEntry, StatusKind, StatusLedger,
};
pub use stats::{Initiative, InitiativeBonus, PhaseQueue, SpeedTier};
