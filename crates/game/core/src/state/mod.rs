//! Authoritative encounter state.
//!
//! This module owns the data structures that describe both combatants, the
//! player's card piles and round bookkeeping. Runtime layers clone or query
//! this state but mutate it exclusively through the engine.
pub mod types;

pub use types::{
    CombatantState, DeckPiles, DrawReport, EffectDuration, InvariantViolation, LedgerAdvance,
    Outcome, Phase, Pool, Restoration, RoundState, Side, StatusEffectEntry, StatusKind,
    StatusLedger, StatusTraits,
};

use crate::env::CardDefinition;

/// Canonical snapshot of a running encounter.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EncounterState {
    /// Seed for every roll of the encounter.
    ///
    /// Set once at creation and never modified.
    pub seed: u64,
    pub player: CombatantState,
    pub enemy: CombatantState,
    pub deck: DeckPiles<CardDefinition>,
    pub turn: RoundState,
}

impl EncounterState {
    pub fn new(
        seed: u64,
        player: CombatantState,
        enemy: CombatantState,
        deck: DeckPiles<CardDefinition>,
    ) -> Self {
        Self {
            seed,
            player,
            enemy,
            deck,
            turn: RoundState::default(),
        }
    }

    pub fn combatant(&self, side: Side) -> &CombatantState {
        match side {
            Side::Player => &self.player,
            Side::Enemy => &self.enemy,
        }
    }

    pub fn combatant_mut(&mut self, side: Side) -> &mut CombatantState {
        match side {
            Side::Player => &mut self.player,
            Side::Enemy => &mut self.enemy,
        }
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.turn.outcome
    }
}
