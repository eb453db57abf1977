//! Asynchronous abstraction for sourcing player decisions.
//!
//! Runtime users plug in [`ActionProvider`] implementations so an encounter
//! can run with human input, scripted fixtures, or automatic play. Enemy
//! decisions never go through a provider; the engine selects them from the
//! enemy's patterns.
use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use combat_core::{ActionCategory, CardDefinition, CombatantState};

use super::errors::{Result, RuntimeError};
use super::snapshot::EncounterSnapshot;

/// What the player does at a decision point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerChoice {
    /// Play the card at this hand index.
    Play(usize),
    EndTurn,
}

/// Trait for providing player decisions based on the current encounter.
///
/// Different implementations can handle:
/// - Player input (from UI/CLI)
/// - Automatic play
/// - Scripted/replayed choices
/// - Testing fixtures
#[async_trait]
pub trait ActionProvider: Send + Sync {
    /// Decide the next move during a player phase.
    async fn choose(&self, snapshot: &EncounterSnapshot) -> Result<PlayerChoice>;
}

/// A provider that always ends the turn.
/// Useful for testing enemy behavior or as a fallback.
pub struct EndTurnProvider;

#[async_trait]
impl ActionProvider for EndTurnProvider {
    async fn choose(&self, _snapshot: &EncounterSnapshot) -> Result<PlayerChoice> {
        Ok(PlayerChoice::EndTurn)
    }
}

/// Replays a fixed list of choices, then ends every turn.
pub struct ScriptedProvider {
    choices: Mutex<VecDeque<PlayerChoice>>,
}

impl ScriptedProvider {
    pub fn new(choices: impl IntoIterator<Item = PlayerChoice>) -> Self {
        Self {
            choices: Mutex::new(choices.into_iter().collect()),
        }
    }
}

#[async_trait]
impl ActionProvider for ScriptedProvider {
    async fn choose(&self, _snapshot: &EncounterSnapshot) -> Result<PlayerChoice> {
        let mut choices = self
            .choices
            .lock()
            .map_err(|_| RuntimeError::Provider("scripted choices poisoned".into()))?;
        Ok(choices.pop_front().unwrap_or(PlayerChoice::EndTurn))
    }
}

/// Plays the highest-scoring affordable card until none is left.
///
/// Scores are a simple utility estimate; ties go to the lowest hand index so
/// the provider is deterministic for a given snapshot.
pub struct AutoPlayProvider;

impl AutoPlayProvider {
    fn score(card: &CardDefinition, player: &CombatantState) -> u32 {
        let action = &card.action;
        let missing = u32::try_from((player.max_health - player.health).max(0)).unwrap_or(u32::MAX);
        let wounded = player.health * 2 <= player.max_health;

        let damage = if action.deals_damage() {
            action.power().saturating_mul(action.hit_count())
        } else {
            0
        };
        let guard = action.guard.unwrap_or(0);
        let guard = if wounded { guard.saturating_mul(2) } else { guard };
        let healing = match action.category {
            ActionCategory::Heal => action.power().min(missing),
            _ => 0,
        };
        let base = damage.saturating_add(guard).saturating_add(healing);

        let effects = (action.self_effects.len() + action.target_effects.len()) as u32;
        let cleanse = u32::from(action.cleanse && player.status.iter().any(|e| e.kind.is_debuff()));

        base + 4 * effects + 6 * cleanse
    }
}

#[async_trait]
impl ActionProvider for AutoPlayProvider {
    async fn choose(&self, snapshot: &EncounterSnapshot) -> Result<PlayerChoice> {
        let hand = snapshot.hand();
        let player = &snapshot.state.player;

        let best = snapshot
            .playable
            .iter()
            .filter_map(|&index| hand.get(index).map(|card| (index, card)))
            .map(|(index, card)| (index, Self::score(card, player)))
            .filter(|&(_, score)| score > 0)
            .fold(None, |best: Option<(usize, u32)>, candidate| match best {
                Some(current) if current.1 >= candidate.1 => Some(current),
                _ => Some(candidate),
            });

        Ok(match best {
            Some((index, _)) => PlayerChoice::Play(index),
            None => PlayerChoice::EndTurn,
        })
    }
}
