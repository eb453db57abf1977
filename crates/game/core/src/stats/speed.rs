//! Speed and initiative.
//!
//! Effective speed decides who acts first in a round and how large a
//! first-strike bonus the faster side receives.
//!
//! Formulas:
//! - effective = max(0, base + haste − slow)
//! - differential ≥ major threshold → attack bonus + critical bonus
//! - differential ≥ minor threshold → attack bonus only

use crate::config::CombatConfig;
use crate::state::{CombatantState, Side};

/// Effective speed of a combatant this round.
pub fn effective_speed(state: &CombatantState) -> u32 {
    let speed = i64::from(state.speed) + state.status.speed_modifier();
    u32::try_from(speed.max(0)).unwrap_or(u32::MAX)
}

/// Size of the first-strike bonus earned by a speed differential.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SpeedTier {
    None,
    /// Attack-power bonus only.
    Minor,
    /// Attack-power and critical-chance bonus.
    Major,
}

impl SpeedTier {
    pub fn from_differential(differential: u32, config: &CombatConfig) -> Self {
        if differential >= config.major_speed_threshold {
            SpeedTier::Major
        } else if differential >= config.minor_speed_threshold {
            SpeedTier::Minor
        } else {
            SpeedTier::None
        }
    }

    pub fn bonus(self, config: &CombatConfig) -> InitiativeBonus {
        match self {
            SpeedTier::None => InitiativeBonus::NONE,
            SpeedTier::Minor => InitiativeBonus {
                attack: config.initiative_attack_bonus,
                critical: 0,
            },
            SpeedTier::Major => InitiativeBonus {
                attack: config.initiative_attack_bonus,
                critical: config.initiative_critical_bonus,
            },
        }
    }
}

/// Bonuses carried by the faster side's actions for one round.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InitiativeBonus {
    /// Flat base-power bonus for damaging actions.
    pub attack: u32,
    /// Critical rate bonus (%); also enables the critical check.
    pub critical: u32,
}

impl InitiativeBonus {
    pub const NONE: Self = Self {
        attack: 0,
        critical: 0,
    };
}

/// Who acts first this round and what bonus they earned.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Initiative {
    pub first: Side,
    pub player_speed: u32,
    pub enemy_speed: u32,
    pub tier: SpeedTier,
    pub bonus: InitiativeBonus,
}

impl Initiative {
    /// Bonus applicable to actions taken by `side`.
    pub fn bonus_for(&self, side: Side) -> InitiativeBonus {
        if side == self.first {
            self.bonus
        } else {
            InitiativeBonus::NONE
        }
    }

    pub fn differential(&self) -> u32 {
        self.player_speed.abs_diff(self.enemy_speed)
    }
}

/// Compares effective speeds. Ties go to the player.
pub fn resolve_initiative(
    player: &CombatantState,
    enemy: &CombatantState,
    config: &CombatConfig,
) -> Initiative {
    let player_speed = effective_speed(player);
    let enemy_speed = effective_speed(enemy);

    let first = if enemy_speed > player_speed {
        Side::Enemy
    } else {
        Side::Player
    };
    let tier = SpeedTier::from_differential(player_speed.abs_diff(enemy_speed), config);

    Initiative {
        first,
        player_speed,
        enemy_speed,
        tier,
        bonus: tier.bonus(config),
    }
}

/// Order of phases within one round.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PhaseQueue {
    order: [Side; 2],
}

impl PhaseQueue {
    pub fn from_initiative(initiative: &Initiative) -> Self {
        Self {
            order: [initiative.first, initiative.first.opponent()],
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = Side> + '_ {
        self.order.iter().copied()
    }
}
