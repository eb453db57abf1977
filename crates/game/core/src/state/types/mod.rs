pub mod combatant;
pub mod deck;
pub mod status;
pub mod turn;

pub use combatant::{CombatantState, InvariantViolation, Pool, Side};
pub use deck::{DeckPiles, DrawReport};
pub use status::{
    EffectDuration, LedgerAdvance, Restoration, StatusEffectEntry, StatusKind, StatusLedger,
    StatusTraits,
};
pub use turn::{Outcome, Phase, RoundState};
