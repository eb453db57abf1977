//! Events emitted while the engine mutates an encounter.
//!
//! The engine buffers events in order; callers drain them after each
//! operation to drive presentation or logs.

use crate::action::SelectionSource;
use crate::combat::HitOutcome;
use crate::state::{InvariantViolation, Outcome, Side, StatusKind};
use crate::stats::Initiative;

/// Why an enemy phase produced no action.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum IdleReason {
    /// A disabling effect was active.
    Disabled(StatusKind),
    /// No scripted entry matched and the eligible pool was empty.
    NoEligiblePattern,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CombatEvent {
    RoundStarted {
        round: u32,
        initiative: Initiative,
    },
    PhaseStarted {
        side: Side,
        round: u32,
    },
    Restored {
        side: Side,
        health: u32,
        guard: u32,
    },
    CardsDrawn {
        count: usize,
        reshuffled: bool,
    },
    CardPlayed {
        card: String,
        cost: u32,
        energy_left: u32,
    },
    EnemyIntent {
        action: String,
        source: SelectionSource,
    },
    EnemyIdle {
        reason: IdleReason,
    },
    ActionResolved {
        actor: Side,
        action: String,
        hits: Vec<HitOutcome>,
        guard_gained: u32,
        healed: u32,
        cleansed: bool,
    },
    EffectsApplied {
        side: Side,
        kinds: Vec<StatusKind>,
    },
    PeriodicDamage {
        side: Side,
        amount: u32,
    },
    EffectsExpired {
        side: Side,
        kinds: Vec<StatusKind>,
    },
    HandDiscarded {
        count: usize,
    },
    InvariantViolated {
        side: Side,
        violation: InvariantViolation,
    },
    EncounterEnded {
        outcome: Outcome,
        round: u32,
    },
}

impl CombatEvent {
    pub fn is_terminal(&self) -> bool {
        matches!(self, CombatEvent::EncounterEnded { .. })
    }
}
