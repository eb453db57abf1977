//! Splitting incoming damage across guard, secondary armor and health.

use crate::config::CombatConfig;
use crate::stats::ratio::percent_of;

/// How a damage amount is split across the defender's pools.
///
/// Each component is non-negative and is subtracted by the caller.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DamageAllocation {
    pub guard_damage: u32,
    pub secondary_armor_damage: u32,
    pub health_damage: u32,
}

impl DamageAllocation {
    /// Sum of all components. Exceeds the input amount only in the
    /// broken-armor splash case.
    pub fn total(&self) -> u64 {
        u64::from(self.guard_damage)
            + u64::from(self.secondary_armor_damage)
            + u64::from(self.health_damage)
    }
}

/// Allocate `amount` across guard → secondary armor → health.
///
/// When guard alone can absorb the hit but secondary armor is already broken
/// (≤ 0), a splash of `broken_armor_splash_percent` of the absorbed amount
/// still reaches health. Armor that is low but positive never splashes.
pub fn allocate_damage(
    guard: u32,
    secondary_armor: i64,
    amount: u32,
    config: &CombatConfig,
) -> DamageAllocation {
    if amount <= guard {
        let health_damage = if secondary_armor <= 0 {
            percent_of(amount, config.broken_armor_splash_percent)
        } else {
            0
        };
        return DamageAllocation {
            guard_damage: amount,
            secondary_armor_damage: 0,
            health_damage,
        };
    }

    let remainder = amount - guard;
    let armor = u32::try_from(secondary_armor.max(0)).unwrap_or(u32::MAX);
    let secondary_armor_damage = remainder.min(armor);

    DamageAllocation {
        guard_damage: guard,
        secondary_armor_damage,
        health_damage: remainder - secondary_armor_damage,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn broken_armor_splash_through_full_guard() {
        let config = CombatConfig::default();
        let allocation = allocate_damage(5, 0, 5, &config);
        assert_eq!(
            allocation,
            DamageAllocation {
                guard_damage: 5,
                secondary_armor_damage: 0,
                health_damage: 3,
            }
        );
    }

    #[test]
    fn positive_armor_blocks_splash() {
        let config = CombatConfig::default();
        // exactly consumed
        assert_eq!(allocate_damage(5, 1, 5, &config).health_damage, 0);
        // more than enough guard
        assert_eq!(allocate_damage(9, 1, 5, &config).health_damage, 0);
    }

    #[test]
    fn overflow_flows_through_armor_into_health() {
        let config = CombatConfig::default();
        let allocation = allocate_damage(4, 3, 10, &config);
        assert_eq!(
            allocation,
            DamageAllocation {
                guard_damage: 4,
                secondary_armor_damage: 3,
                health_damage: 3,
            }
        );

        let partial = allocate_damage(0, 8, 5, &config);
        assert_eq!(partial.secondary_armor_damage, 5);
        assert_eq!(partial.health_damage, 0);
    }

    #[test]
    fn components_sum_to_input_outside_the_splash_case() {
        let config = CombatConfig::default();
        for guard in 0..12u32 {
            for armor in -2..12i64 {
                for amount in 0..30u32 {
                    let allocation = allocate_damage(guard, armor, amount, &config);
                    let splash_case = amount <= guard && armor <= 0;
                    if splash_case {
                        assert_eq!(allocation.guard_damage, amount);
                        assert_eq!(allocation.health_damage, amount * 75 / 100);
                    } else {
                        assert_eq!(
                            allocation.total(),
                            u64::from(amount),
                            "guard={guard} armor={armor} amount={amount}"
                        );
                    }
                    assert!(allocation.guard_damage <= guard);
                }
            }
        }
    }
}
