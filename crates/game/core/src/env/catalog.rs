//! Card, enemy and player definitions and the oracle that serves them.
//!
//! Definitions are plain data loaded by the content crate. The engine reads
//! them through [`CatalogOracle`] and turns them into [`CombatantState`]s and
//! deck piles at encounter start.

use std::collections::BTreeMap;

use crate::action::{Action, ActionPattern};
use crate::state::{CombatantState, StatusEffectEntry, StatusLedger};

/// A playable card.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CardDefinition {
    pub id: String,
    /// Energy spent to play the card.
    #[cfg_attr(feature = "serde", serde(default))]
    pub cost: u32,
    pub action: Action,
}

impl CardDefinition {
    pub fn new(id: impl Into<String>, cost: u32, action: Action) -> Self {
        Self {
            id: id.into(),
            cost,
            action,
        }
    }

    pub fn name(&self) -> &str {
        &self.action.name
    }
}

/// An enemy template.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EnemyDefinition {
    pub id: String,
    pub name: String,
    pub max_health: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub secondary_armor: u32,
    pub speed: u32,
    /// Effects present when the encounter begins.
    #[cfg_attr(feature = "serde", serde(default))]
    pub starting_effects: Vec<StatusEffectEntry>,
    pub patterns: Vec<ActionPattern>,
}

impl EnemyDefinition {
    /// Fresh combatant for a new encounter.
    pub fn to_combatant(&self) -> CombatantState {
        CombatantState::new(self.max_health, self.secondary_armor, self.speed)
            .with_status(StatusLedger::empty().with_all_applied(&self.starting_effects))
    }
}

/// Flat bonuses granted by one equipped item.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EquipmentBonus {
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub max_health: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub secondary_armor: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub speed: u32,
}

/// Persistent player stats carried into an encounter.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlayerProfile {
    pub name: String,
    pub max_health: u32,
    /// Health carried over from earlier encounters; full when absent.
    #[cfg_attr(feature = "serde", serde(default))]
    pub health: Option<u32>,
    pub speed: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub equipment: Vec<EquipmentBonus>,
    /// Card ids, duplicates allowed.
    pub deck: Vec<String>,
}

impl PlayerProfile {
    /// Combatant built from base stats plus equipment bonuses.
    ///
    /// Secondary armor comes from equipment only and starts full.
    pub fn to_combatant(&self) -> CombatantState {
        let (max_health, armor, speed) = self.equipment.iter().fold(
            (self.max_health, 0u32, self.speed),
            |(health, armor, speed), item| {
                (
                    health.saturating_add(item.max_health),
                    armor.saturating_add(item.secondary_armor),
                    speed.saturating_add(item.speed),
                )
            },
        );

        let combatant = CombatantState::new(max_health, armor, speed);
        match self.health {
            Some(health) => combatant.with_health(health.min(max_health)),
            None => combatant,
        }
    }
}

/// Read-only access to definitions by id.
pub trait CatalogOracle: Send + Sync {
    fn card(&self, id: &str) -> Option<&CardDefinition>;

    fn enemy(&self, id: &str) -> Option<&EnemyDefinition>;

    fn player(&self) -> &PlayerProfile;

    /// Resolve the player's deck list into card definitions.
    ///
    /// Returns the first unknown id on failure.
    fn player_deck(&self) -> Result<Vec<CardDefinition>, String> {
        self.player()
            .deck
            .iter()
            .map(|id| self.card(id).cloned().ok_or_else(|| id.clone()))
            .collect()
    }
}

/// In-memory catalog keyed by id.
#[derive(Clone, Debug, PartialEq)]
pub struct Catalog {
    cards: BTreeMap<String, CardDefinition>,
    enemies: BTreeMap<String, EnemyDefinition>,
    player: PlayerProfile,
}

impl Catalog {
    pub fn new(
        cards: impl IntoIterator<Item = CardDefinition>,
        enemies: impl IntoIterator<Item = EnemyDefinition>,
        player: PlayerProfile,
    ) -> Self {
        Self {
            cards: cards.into_iter().map(|c| (c.id.clone(), c)).collect(),
            enemies: enemies.into_iter().map(|e| (e.id.clone(), e)).collect(),
            player,
        }
    }

    pub fn cards(&self) -> impl Iterator<Item = &CardDefinition> {
        self.cards.values()
    }

    pub fn enemies(&self) -> impl Iterator<Item = &EnemyDefinition> {
        self.enemies.values()
    }

    pub fn enemy_ids(&self) -> Vec<String> {
        self.enemies.keys().cloned().collect()
    }
}

impl CatalogOracle for Catalog {
    fn card(&self, id: &str) -> Option<&CardDefinition> {
        self.cards.get(id)
    }

    fn enemy(&self, id: &str) -> Option<&EnemyDefinition> {
        self.enemies.get(id)
    }

    fn player(&self) -> &PlayerProfile {
        &self.player
    }
}
