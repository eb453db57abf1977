use core::fmt;

use crate::stats::{Initiative, PhaseQueue};

use super::combatant::Side;

/// Where the encounter currently stands.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Phase {
    /// Created but `start` not yet called.
    #[default]
    NotStarted,
    /// Waiting for the player to play cards or end the turn.
    PlayerPhase,
    /// Player periodic damage and decay in progress.
    EndPlayerPhase,
    /// Enemy periodic damage, decay, selection and resolution in progress.
    EnemyPhase,
    /// Victory or defeat reached.
    Finished,
}

impl Phase {
    pub const fn as_str(self) -> &'static str {
        match self {
            Phase::NotStarted => "not_started",
            Phase::PlayerPhase => "player_phase",
            Phase::EndPlayerPhase => "end_player_phase",
            Phase::EnemyPhase => "enemy_phase",
            Phase::Finished => "finished",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Terminal result of an encounter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Outcome {
    Victory,
    Defeat,
}

impl Outcome {
    /// Victory wins ties: enemy health is checked before player health.
    pub fn judge(player_health: i64, enemy_health: i64) -> Option<Self> {
        if enemy_health <= 0 {
            Some(Outcome::Victory)
        } else if player_health <= 0 {
            Some(Outcome::Defeat)
        } else {
            None
        }
    }
}

/// Round bookkeeping.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RoundState {
    /// 1-based round number; 0 before the first round.
    pub round: u32,
    pub phase: Phase,
    /// Enemy phases begun so far, disabled ones included.
    pub enemy_phase_counter: u32,
    /// Energy left in the current player phase.
    pub energy: u32,
    /// Initiative of the current round.
    pub initiative: Option<Initiative>,
    /// Phases of the current round already begun (0..=2).
    pub slot: usize,
    pub outcome: Option<Outcome>,
}

impl RoundState {
    pub fn queue(&self) -> Option<PhaseQueue> {
        self.initiative.as_ref().map(PhaseQueue::from_initiative)
    }

    /// Side owning the next unstarted phase of the round, if any.
    pub fn next_side(&self) -> Option<Side> {
        self.queue().and_then(|q| q.iter().nth(self.slot))
    }

    pub fn is_finished(&self) -> bool {
        self.outcome.is_some()
    }
}
