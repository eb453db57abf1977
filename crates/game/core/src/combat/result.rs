//! Resolution of a whole action against an attacker/defender pair.

use crate::action::{Action, ActionCategory};
use crate::config::CombatConfig;
use crate::env::{Dice, RngOracle};
use crate::state::{CombatantState, StatusEffectEntry, StatusKind};
use crate::stats::InitiativeBonus;

use super::allocation::{DamageAllocation, allocate_damage};
use super::damage::{DamageResult, calculate_damage};

/// Outcome of one hit of a damaging action.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HitOutcome {
    pub damage: DamageResult,
    /// Split of `damage.final_damage` on the defender.
    pub allocation: DamageAllocation,
    /// Split of `damage.reflect_damage` on the attacker.
    pub reflected: DamageAllocation,
    /// Health the attacker actually recovered through lifesteal.
    pub lifesteal_healed: u32,
}

/// Result of resolving an action.
///
/// Carries updated copies of both combatants; the inputs are never mutated.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActionResolution {
    pub attacker: CombatantState,
    pub defender: CombatantState,
    pub hits: Vec<HitOutcome>,
    pub guard_gained: u32,
    pub healed: u32,
    pub cleansed: bool,
    pub applied_to_attacker: Vec<StatusKind>,
    pub applied_to_defender: Vec<StatusKind>,
    /// A combatant fell before every step ran.
    pub interrupted: bool,
}

impl ActionResolution {
    /// Health damage dealt to the defender across all hits.
    pub fn total_health_damage(&self) -> u32 {
        self.hits
            .iter()
            .map(|h| h.allocation.health_damage)
            .fold(0u32, u32::saturating_add)
    }

    pub fn any_critical(&self) -> bool {
        self.hits.iter().any(|h| h.damage.is_critical)
    }
}

/// Resolve `action` from `attacker` against `defender`.
///
/// # Ordering
///
/// For each hit: damage calculation → allocation on the defender →
/// reflect on the attacker → lifesteal. Once all hits land: guard gain,
/// healing, cleanse, then new status effects (self first, then target).
///
/// Resolution stops as soon as either combatant reaches zero health.
pub fn resolve_action<R: RngOracle>(
    attacker: &CombatantState,
    defender: &CombatantState,
    action: &Action,
    initiative: InitiativeBonus,
    dice: &mut Dice<R>,
    config: &CombatConfig,
) -> ActionResolution {
    let mut resolution = ActionResolution {
        attacker: attacker.clone(),
        defender: defender.clone(),
        hits: Vec::new(),
        guard_gained: 0,
        healed: 0,
        cleansed: false,
        applied_to_attacker: Vec::new(),
        applied_to_defender: Vec::new(),
        interrupted: false,
    };

    if action.deals_damage() {
        for _ in 0..action.hit_count() {
            if resolution.attacker.is_defeated() || resolution.defender.is_defeated() {
                resolution.interrupted = true;
                break;
            }
            let hit = resolve_hit(&mut resolution, action, initiative, dice, config);
            resolution.hits.push(hit);
        }
    }

    if resolution.attacker.is_defeated() || resolution.defender.is_defeated() {
        resolution.interrupted = true;
        return resolution;
    }

    let actor = &mut resolution.attacker;

    if let Some(guard) = action.guard {
        actor.gain_guard(guard);
        resolution.guard_gained = guard;
    }

    if action.category == ActionCategory::Heal {
        resolution.healed = actor.heal(action.power());
    }

    if action.cleanse {
        actor.status = actor.status.cleansed();
        resolution.cleansed = true;
    }

    actor.status = actor
        .status
        .with_all_applied(&tagged(&action.self_effects, &action.name));
    resolution.applied_to_attacker = action.self_effects.iter().map(|e| e.kind).collect();

    resolution.defender.status = resolution
        .defender
        .status
        .with_all_applied(&tagged(&action.target_effects, &action.name));
    resolution.applied_to_defender = action.target_effects.iter().map(|e| e.kind).collect();

    resolution
}

/// Effects without a source are tagged with the action that applied them.
fn tagged(effects: &[StatusEffectEntry], action: &str) -> Vec<StatusEffectEntry> {
    effects
        .iter()
        .map(|effect| match effect.source {
            Some(_) => effect.clone(),
            None => effect.clone().with_source(action),
        })
        .collect()
}

fn resolve_hit<R: RngOracle>(
    resolution: &mut ActionResolution,
    action: &Action,
    initiative: InitiativeBonus,
    dice: &mut Dice<R>,
    config: &CombatConfig,
) -> HitOutcome {
    let roll = dice.critical_roll();
    let damage = calculate_damage(
        &resolution.attacker,
        &resolution.defender,
        action,
        initiative,
        roll,
        config,
    );

    let defender = &mut resolution.defender;
    let allocation = allocate_damage(
        defender.guard_amount(),
        defender.secondary_armor_amount(),
        damage.final_damage,
        config,
    );
    defender.take(&allocation);

    let attacker = &mut resolution.attacker;
    let reflected = if damage.reflect_damage > 0 {
        let reflected = allocate_damage(
            attacker.guard_amount(),
            attacker.secondary_armor_amount(),
            damage.reflect_damage,
            config,
        );
        attacker.take(&reflected);
        reflected
    } else {
        DamageAllocation::default()
    };

    let lifesteal_healed = if damage.lifesteal_amount > 0 && !attacker.is_defeated() {
        attacker.heal(damage.lifesteal_amount)
    } else {
        0
    };

    HitOutcome {
        damage,
        allocation,
        reflected,
        lifesteal_healed,
    }
}
