//! Damage calculation.

use crate::action::Action;
use crate::config::CombatConfig;
use crate::state::CombatantState;
use crate::stats::InitiativeBonus;
use crate::stats::ratio::{Ratio, percent_of, scale};

/// Output of the damage pipeline for a single hit.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DamageResult {
    /// Damage arriving at the defender before guard/armor allocation.
    pub final_damage: u32,
    pub is_critical: bool,
    /// Damage bounced back to the attacker.
    pub reflect_damage: u32,
    /// Health the attacker recovers.
    pub lifesteal_amount: u32,
    /// Attacker-side output before defender modifiers.
    pub attacker_output: u32,
}

/// Critical rate for an attacker, or `None` when no critical source is held.
///
/// A critical source is either a critical-chance buff or a critical bonus
/// earned through initiative.
pub fn critical_rate(
    attacker: &CombatantState,
    initiative: InitiativeBonus,
    config: &CombatConfig,
) -> Option<u32> {
    let buff = attacker.status.critical_bonus();
    if buff.is_none() && initiative.critical == 0 {
        return None;
    }
    let rate = config
        .base_critical_rate
        .saturating_add(buff.unwrap_or(0))
        .saturating_add(initiative.critical);
    Some(rate.min(config.max_critical_rate))
}

/// Calculate the damage of one hit of `action`.
///
/// # Formula
///
/// ```text
/// base              = base_power (+ initiative attack bonus when base > 0)
/// attack_mult       = (1 + Σ increase%) × Π (1 − decrease%)
/// crit_mult         = base_crit_mult + crit_buff/100   when roll ≤ rate
/// attacker_output   = floor(base × attack_mult × crit_mult)
/// vulnerability     = 1 + vulnerable%, excess shrunk by tenacity%
/// reduction         = Π (1 − fortify%)
/// final_damage      = floor(attacker_output × vulnerability × reduction)
/// reflect           = floor(final_damage × thorns%)
/// lifesteal         = floor(final_damage × lifesteal%)
/// ```
///
/// # Arguments
///
/// * `crit_roll` - d100 roll (1-100); ignored when no critical source is held
pub fn calculate_damage(
    attacker: &CombatantState,
    defender: &CombatantState,
    action: &Action,
    initiative: InitiativeBonus,
    crit_roll: u32,
    config: &CombatConfig,
) -> DamageResult {
    // 1. Base
    let mut base = action.power();
    if base > 0 {
        base = base.saturating_add(initiative.attack);
    }

    // 2. Attack multiplier: increases summed, decreases applied after
    let [increase, decrease] = attacker.status.attack_multiplier();

    // 3. Critical check
    let is_critical = critical_rate(attacker, initiative, config).is_some_and(|rate| crit_roll <= rate);
    let critical_multiplier = if is_critical {
        let buff = attacker.status.critical_bonus().unwrap_or(0);
        Ratio::from_percent(config.base_critical_multiplier.saturating_add(buff))
    } else {
        Ratio::ONE
    };

    // 4. Attacker output
    let attacker_output = scale(base, &[increase, decrease, critical_multiplier]);

    // 5-6. Defender multipliers
    let vulnerability = defender.status.vulnerability_multiplier();
    let reduction = defender.status.damage_reduction_multiplier();
    let final_damage = scale(attacker_output, &[vulnerability, reduction]);

    // 7-8. Reflect and lifesteal
    let reflect_damage = defender
        .status
        .reflect_percent()
        .map_or(0, |percent| percent_of(final_damage, percent));
    let lifesteal_amount = attacker
        .status
        .lifesteal_percent()
        .map_or(0, |percent| percent_of(final_damage, percent));

    tracing::debug!(
        base,
        attacker_output,
        final_damage,
        is_critical,
        reflect_damage,
        lifesteal_amount,
        "damage calculated for {}",
        action.name
    );

    DamageResult {
        final_damage,
        is_critical,
        reflect_damage,
        lifesteal_amount,
        attacker_output,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{StatusEffectEntry, StatusKind};

    fn combatant() -> CombatantState {
        CombatantState::new(100, 0, 100)
    }

    fn with(state: CombatantState, kind: StatusKind, value: u32) -> CombatantState {
        let status = state
            .status
            .with_applied(&StatusEffectEntry::timed(kind, 3, value));
        state.with_status(status)
    }

    #[test]
    fn strength_against_fortify() {
        let config = CombatConfig::default();
        let attacker = with(combatant(), StatusKind::Strength, 50);
        let defender = with(combatant(), StatusKind::Fortify, 20);

        let result = calculate_damage(
            &attacker,
            &defender,
            &Action::offense("Strike", 10),
            InitiativeBonus::NONE,
            1,
            &config,
        );

        assert_eq!(result.attacker_output, 15);
        assert_eq!(result.final_damage, 12);
        assert!(!result.is_critical);
    }

    #[test]
    fn zero_power_yields_zero_and_no_critical_without_source() {
        let config = CombatConfig::default();
        let attacker = with(combatant(), StatusKind::Strength, 100);
        let defender = with(combatant(), StatusKind::Vulnerable, 100);

        let result = calculate_damage(
            &attacker,
            &defender,
            &Action::special("Taunt"),
            InitiativeBonus { attack: 5, critical: 0 },
            1,
            &config,
        );

        assert_eq!(result, DamageResult::default());
    }

    #[test]
    fn critical_requires_a_source_and_respects_rate() {
        let config = CombatConfig::default();
        let defender = combatant();
        let strike = Action::offense("Strike", 10);

        let plain = calculate_damage(&combatant(), &defender, &strike, InitiativeBonus::NONE, 1, &config);
        assert!(!plain.is_critical);

        // rate = 10 + 20 = 30
        let precise = with(combatant(), StatusKind::Precision, 20);
        let hit = calculate_damage(&precise, &defender, &strike, InitiativeBonus::NONE, 30, &config);
        assert!(hit.is_critical);
        // 10 × (1.5 + 0.2) = 17
        assert_eq!(hit.final_damage, 17);

        let miss = calculate_damage(&precise, &defender, &strike, InitiativeBonus::NONE, 31, &config);
        assert!(!miss.is_critical);
        assert_eq!(miss.final_damage, 10);
    }

    #[test]
    fn critical_rate_is_capped() {
        let config = CombatConfig::default();
        let precise = with(combatant(), StatusKind::Precision, 500);
        let rate = critical_rate(&precise, InitiativeBonus { attack: 0, critical: 15 }, &config);
        assert_eq!(rate, Some(config.max_critical_rate));
    }

    #[test]
    fn weak_applies_after_summed_increases() {
        let config = CombatConfig::default();
        let attacker = with(
            with(combatant(), StatusKind::Strength, 50),
            StatusKind::Weak,
            50,
        );
        let result = calculate_damage(
            &attacker,
            &combatant(),
            &Action::offense("Strike", 20),
            InitiativeBonus::NONE,
            100,
            &config,
        );
        // 20 × 1.5 × 0.5
        assert_eq!(result.final_damage, 15);
    }

    #[test]
    fn tenacity_shrinks_vulnerability_excess() {
        let config = CombatConfig::default();
        let defender = with(
            with(combatant(), StatusKind::Vulnerable, 50),
            StatusKind::Tenacity,
            50,
        );
        let result = calculate_damage(
            &combatant(),
            &defender,
            &Action::offense("Strike", 20),
            InitiativeBonus::NONE,
            100,
            &config,
        );
        // 20 × 1.25
        assert_eq!(result.final_damage, 25);
    }

    #[test]
    fn reflect_and_lifesteal_follow_final_damage() {
        let config = CombatConfig::default();
        let attacker = with(combatant(), StatusKind::Lifesteal, 50);
        let defender = with(combatant(), StatusKind::Thorns, 30);
        let result = calculate_damage(
            &attacker,
            &defender,
            &Action::offense("Strike", 11),
            InitiativeBonus::NONE,
            100,
            &config,
        );
        assert_eq!(result.final_damage, 11);
        assert_eq!(result.reflect_damage, 3);
        assert_eq!(result.lifesteal_amount, 5);
    }

    #[test]
    fn initiative_attack_bonus_adds_to_base() {
        let config = CombatConfig::default();
        let result = calculate_damage(
            &combatant(),
            &combatant(),
            &Action::offense("Strike", 10),
            InitiativeBonus { attack: 2, critical: 0 },
            100,
            &config,
        );
        assert_eq!(result.final_damage, 12);
    }
}
