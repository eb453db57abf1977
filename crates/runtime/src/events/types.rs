//! Event payloads published on the runtime bus.

use serde::{Deserialize, Serialize};

use combat_core::{EncounterSummary, PlayError};

/// Encounter lifecycle notifications emitted by the runtime itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LifecycleEvent {
    EncounterStarted { enemy: String, seed: u64 },
    /// A command was refused; the encounter state is unchanged.
    PlayRejected { command: String, error: PlayError },
    EncounterFinished { summary: EncounterSummary },
}
