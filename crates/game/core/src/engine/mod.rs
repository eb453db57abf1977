//! Phase engine.
//!
//! The [`CombatEngine`] is the authoritative reducer for an
//! [`EncounterState`]. It exclusively owns both combatants and the card
//! piles, feeds them to the pure calculators and replaces them with the
//! values those return.
//!
//! ```text
//! start ─► [round: initiative ─► PhaseQueue]
//!            PlayerPhase ─ play_card* ─ end_turn ─► EndPlayerPhase ─► ...
//!            EnemyPhase (DoT ─► decay ─► restore ─► select ─► resolve)
//! ```
//!
//! Every operation runs until the next player decision point or the end of
//! the encounter. Victory and defeat are checked after each health
//! mutation.

mod errors;
mod events;
mod phase;

pub use errors::{PlayError, SetupError};
pub use events::{CombatEvent, IdleReason};

use crate::action::{Action, SelectionSource};
use crate::combat::{ActionResolution, resolve_action};
use crate::config::CombatConfig;
use crate::env::{
    CardDefinition, CatalogOracle, Dice, EnemyDefinition, PcgRng, RngOracle, validate_action,
    validate_enemy,
};
use crate::state::{
    CombatantState, DeckPiles, EncounterState, Outcome, Phase, Side, StatusKind,
};

/// What the enemy did in one of its phases.
#[derive(Clone, Debug, PartialEq)]
pub struct EnemyTurn {
    pub round: u32,
    /// Phase counter value this turn ran under.
    pub phase_counter: u32,
    pub action: Option<Action>,
    pub source: Option<SelectionSource>,
    pub resolution: Option<ActionResolution>,
    pub idle: Option<IdleReason>,
}

/// Enemy turns run while advancing to the next decision point.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Advance {
    pub enemy_turns: Vec<EnemyTurn>,
}

/// Terminal (or current) figures an external collaborator may carry forward.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EncounterSummary {
    pub outcome: Option<Outcome>,
    pub rounds: u32,
    pub enemy_phases: u32,
    pub player_health: i64,
    pub player_secondary_armor: i64,
    pub enemy_health: i64,
}

/// Combat engine driving one encounter.
pub struct CombatEngine<R: RngOracle = PcgRng> {
    state: EncounterState,
    enemy: EnemyDefinition,
    config: CombatConfig,
    dice: Dice<R>,
    events: Vec<CombatEvent>,
}

impl CombatEngine<PcgRng> {
    /// Builds an encounter against `enemy_id` from catalog data.
    ///
    /// The enemy and the player's deck are validated before any state
    /// exists.
    pub fn from_catalog<O>(
        catalog: &O,
        enemy_id: &str,
        seed: u64,
        config: CombatConfig,
    ) -> Result<Self, SetupError>
    where
        O: CatalogOracle + ?Sized,
    {
        let enemy = catalog
            .enemy(enemy_id)
            .ok_or_else(|| SetupError::UnknownEnemy(enemy_id.to_owned()))?
            .clone();
        validate_enemy(&enemy, &config)?;

        let deck = catalog
            .player_deck()
            .map_err(crate::env::CatalogError::UnknownCard)?;
        for card in &deck {
            validate_action(&card.id, &card.action)?;
        }

        let player = catalog.player().to_combatant();
        Ok(Self::new(player, enemy, deck, config, Dice::seeded(seed)))
    }
}

impl<R: RngOracle> CombatEngine<R> {
    /// Creates an encounter; the deck is shuffled with `dice`.
    pub fn new(
        player: CombatantState,
        enemy: EnemyDefinition,
        deck: Vec<CardDefinition>,
        config: CombatConfig,
        mut dice: Dice<R>,
    ) -> Self {
        let piles = DeckPiles::new(deck, &mut dice);
        let state = EncounterState::new(dice.seed(), player, enemy.to_combatant(), piles);
        Self {
            state,
            enemy,
            config,
            dice,
            events: Vec::new(),
        }
    }

    pub fn state(&self) -> &EncounterState {
        &self.state
    }

    pub fn config(&self) -> &CombatConfig {
        &self.config
    }

    pub fn enemy_definition(&self) -> &EnemyDefinition {
        &self.enemy
    }

    pub fn phase(&self) -> Phase {
        self.state.turn.phase
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.state.outcome()
    }

    pub fn hand(&self) -> &[CardDefinition] {
        self.state.deck.hand()
    }

    pub fn energy(&self) -> u32 {
        self.state.turn.energy
    }

    /// Hand indices that `play_card` would currently accept.
    pub fn playable_cards(&self) -> Vec<usize> {
        if self.phase() != Phase::PlayerPhase || !self.state.player.status.can_act() {
            return Vec::new();
        }
        self.hand()
            .iter()
            .enumerate()
            .filter(|(_, card)| card.cost <= self.state.turn.energy)
            .map(|(index, _)| index)
            .collect()
    }

    /// Takes the events buffered since the last drain.
    pub fn drain_events(&mut self) -> Vec<CombatEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn summary(&self) -> EncounterSummary {
        EncounterSummary {
            outcome: self.outcome(),
            rounds: self.state.turn.round,
            enemy_phases: self.state.turn.enemy_phase_counter,
            player_health: self.state.player.health,
            player_secondary_armor: self.state.player.secondary_armor,
            enemy_health: self.state.enemy.health,
        }
    }

    /// Begins round 1 and runs to the first player decision point.
    pub fn start(&mut self) -> Result<Advance, PlayError> {
        self.ensure_phase(Phase::NotStarted)?;
        tracing::info!(
            enemy = %self.enemy.id,
            seed = self.state.seed,
            "encounter started"
        );
        Ok(self.advance())
    }

    /// Plays the card at `hand_index` against the enemy.
    pub fn play_card(&mut self, hand_index: usize) -> Result<ActionResolution, PlayError> {
        self.ensure_phase(Phase::PlayerPhase)?;

        let hand_size = self.hand().len();
        let card = self
            .hand()
            .get(hand_index)
            .cloned()
            .ok_or(PlayError::InvalidHandIndex {
                index: hand_index,
                hand_size,
            })?;

        if let Some(kind) = disabling_effect(&self.state.player) {
            return Err(PlayError::Disabled(kind));
        }

        let available = self.state.turn.energy;
        if card.cost > available {
            return Err(PlayError::InsufficientEnergy {
                card: card.id,
                cost: card.cost,
                available,
            });
        }

        self.state.deck.discard(hand_index);
        self.state.turn.energy = available - card.cost;
        self.events.push(CombatEvent::CardPlayed {
            card: card.id.clone(),
            cost: card.cost,
            energy_left: self.state.turn.energy,
        });

        let resolution = self.resolve(Side::Player, &card.action);
        Ok(resolution)
    }

    /// Ends the player phase and runs until the next decision point.
    pub fn end_turn(&mut self) -> Result<Advance, PlayError> {
        self.ensure_phase(Phase::PlayerPhase)?;
        self.finish_player_phase();
        Ok(self.advance())
    }

    fn ensure_phase(&self, expected: Phase) -> Result<(), PlayError> {
        if let Some(outcome) = self.outcome() {
            return Err(PlayError::Finished(outcome));
        }
        if self.phase() != expected {
            return Err(PlayError::WrongPhase(self.phase()));
        }
        Ok(())
    }

    /// Resolves `action` from `actor` against its opponent and adopts the
    /// returned combatants.
    fn resolve(&mut self, actor: Side, action: &Action) -> ActionResolution {
        let initiative = self
            .state
            .turn
            .initiative
            .map(|i| i.bonus_for(actor))
            .unwrap_or_default();

        let resolution = resolve_action(
            self.state.combatant(actor),
            self.state.combatant(actor.opponent()),
            action,
            initiative,
            &mut self.dice,
            &self.config,
        );

        *self.state.combatant_mut(actor) = resolution.attacker.clone();
        *self.state.combatant_mut(actor.opponent()) = resolution.defender.clone();

        tracing::debug!(
            %actor,
            action = %action.name,
            hits = resolution.hits.len(),
            health_damage = resolution.total_health_damage(),
            critical = resolution.any_critical(),
            "action resolved"
        );

        self.events.push(CombatEvent::ActionResolved {
            actor,
            action: action.name.clone(),
            hits: resolution.hits.clone(),
            guard_gained: resolution.guard_gained,
            healed: resolution.healed,
            cleansed: resolution.cleansed,
        });
        if !resolution.applied_to_attacker.is_empty() {
            self.events.push(CombatEvent::EffectsApplied {
                side: actor,
                kinds: resolution.applied_to_attacker.clone(),
            });
        }
        if !resolution.applied_to_defender.is_empty() {
            self.events.push(CombatEvent::EffectsApplied {
                side: actor.opponent(),
                kinds: resolution.applied_to_defender.clone(),
            });
        }

        self.settle();
        resolution
    }
}

fn disabling_effect(combatant: &CombatantState) -> Option<StatusKind> {
    combatant
        .status
        .iter()
        .map(|e| e.kind)
        .find(|kind| kind.prevents_action())
}
