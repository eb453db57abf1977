//! Read-only view of an encounter handed to clients and providers.

use serde::{Deserialize, Serialize};

use combat_core::{CardDefinition, EncounterState, Phase};

/// Copy of the authoritative state plus derived facts a decision needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EncounterSnapshot {
    pub enemy: String,
    pub state: EncounterState,
    /// Hand indices the engine would accept right now.
    pub playable: Vec<usize>,
}

impl EncounterSnapshot {
    pub fn phase(&self) -> Phase {
        self.state.turn.phase
    }

    pub fn is_finished(&self) -> bool {
        self.state.turn.is_finished()
    }

    pub fn hand(&self) -> &[CardDefinition] {
        self.state.deck.hand()
    }

    pub fn energy(&self) -> u32 {
        self.state.turn.energy
    }
}
