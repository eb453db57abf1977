//! Enemy action patterns.
//!
//! An enemy's behavior is an ordered list of patterns of two distinct kinds:
//! scripted entries bound to an exact phase index, and pooled entries drawn
//! at random once no scripted entry applies. Keeping them as separate
//! variants keeps deterministic and randomized selection apart.

use crate::config::CombatConfig;

use super::types::Action;

/// Health-fraction predicate over plain numbers.
///
/// Bounds are per-mille of maximum health (`667` ≈ two thirds). The lower
/// bound is exclusive and the upper bound inclusive, so adjacent bands such
/// as `(667, 1000]`, `(333, 667]`, `[0, 333]` never overlap.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HealthCondition {
    /// Holds when health fraction is strictly above this bound.
    #[cfg_attr(feature = "serde", serde(default))]
    pub above: Option<u32>,
    /// Holds when health fraction is at or below this bound.
    #[cfg_attr(feature = "serde", serde(default))]
    pub at_or_below: Option<u32>,
}

impl HealthCondition {
    pub const fn above(per_mille: u32) -> Self {
        Self {
            above: Some(per_mille),
            at_or_below: None,
        }
    }

    pub const fn at_or_below(per_mille: u32) -> Self {
        Self {
            above: None,
            at_or_below: Some(per_mille),
        }
    }

    pub const fn between(above: u32, at_or_below: u32) -> Self {
        Self {
            above: Some(above),
            at_or_below: Some(at_or_below),
        }
    }

    /// Evaluates the predicate for `health` out of `max_health`.
    ///
    /// A non-positive maximum is treated as zero health fraction.
    pub fn holds(&self, health: i64, max_health: i64) -> bool {
        let scale = i64::from(CombatConfig::HEALTH_FRACTION_SCALE);
        let (scaled_health, max) = if max_health > 0 {
            (health.max(0) * scale, max_health)
        } else {
            (0, 1)
        };

        let above_ok = self
            .above
            .is_none_or(|bound| scaled_health > i64::from(bound) * max);
        let below_ok = self
            .at_or_below
            .is_none_or(|bound| scaled_health <= i64::from(bound) * max);

        above_ok && below_ok
    }

    /// Whether the bounds describe a non-empty range within `0..=1000`.
    pub fn is_well_formed(&self) -> bool {
        let scale = CombatConfig::HEALTH_FRACTION_SCALE;
        let above_ok = self.above.is_none_or(|b| b < scale);
        let below_ok = self.at_or_below.is_none_or(|b| b <= scale);
        let ordered = match (self.above, self.at_or_below) {
            (Some(lo), Some(hi)) => lo < hi,
            _ => true,
        };
        above_ok && below_ok && ordered
    }
}

fn condition_holds(condition: Option<&HealthCondition>, health: i64, max_health: i64) -> bool {
    condition.is_none_or(|c| c.holds(health, max_health))
}

/// One entry of an enemy's behavior list.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ActionPattern {
    /// Executed deterministically when the enemy's phase counter equals
    /// `phase` (1-based) and the condition holds.
    Scripted {
        phase: u32,
        #[cfg_attr(feature = "serde", serde(default))]
        condition: Option<HealthCondition>,
        action: Action,
    },
    /// Fallback candidate drawn once no scripted entry applies.
    Pooled {
        #[cfg_attr(feature = "serde", serde(default))]
        condition: Option<HealthCondition>,
        /// Relative selection weight; uniform selection when no entry in
        /// the eligible pool carries one.
        #[cfg_attr(feature = "serde", serde(default))]
        weight: Option<f64>,
        action: Action,
    },
}

impl ActionPattern {
    pub fn scripted(phase: u32, action: Action) -> Self {
        Self::Scripted {
            phase,
            condition: None,
            action,
        }
    }

    pub fn pooled(action: Action) -> Self {
        Self::Pooled {
            condition: None,
            weight: None,
            action,
        }
    }

    /// Attaches a health condition (builder pattern).
    #[must_use]
    pub fn when(mut self, health: HealthCondition) -> Self {
        match &mut self {
            Self::Scripted { condition, .. } | Self::Pooled { condition, .. } => {
                *condition = Some(health);
            }
        }
        self
    }

    /// Attaches a weight to a pooled pattern (no-op for scripted ones).
    #[must_use]
    pub fn weighted(mut self, value: f64) -> Self {
        if let Self::Pooled { weight, .. } = &mut self {
            *weight = Some(value);
        }
        self
    }

    pub fn action(&self) -> &Action {
        match self {
            Self::Scripted { action, .. } | Self::Pooled { action, .. } => action,
        }
    }

    pub fn condition(&self) -> Option<&HealthCondition> {
        match self {
            Self::Scripted { condition, .. } | Self::Pooled { condition, .. } => condition.as_ref(),
        }
    }

    pub fn is_scripted(&self) -> bool {
        matches!(self, Self::Scripted { .. })
    }

    /// Whether the condition (if any) holds for the given health.
    pub fn is_eligible(&self, health: i64, max_health: i64) -> bool {
        condition_holds(self.condition(), health, max_health)
    }
}

/// Pooled patterns sharing the same health condition.
#[derive(Clone, Debug, PartialEq)]
pub struct PoolBand {
    pub condition: Option<HealthCondition>,
    pub entries: usize,
    /// Sum of explicit weights, `None` when no entry is weighted.
    pub weight_sum: Option<f64>,
}

impl PoolBand {
    /// Whether the explicit weights deviate from 1.0 beyond `tolerance`.
    pub fn deviates(&self, tolerance: f64) -> bool {
        self.weight_sum.is_some_and(|sum| (sum - 1.0).abs() > tolerance)
    }
}

/// Groups pooled patterns by condition, in first-appearance order.
pub fn pool_bands(patterns: &[ActionPattern]) -> Vec<PoolBand> {
    let mut bands: Vec<PoolBand> = Vec::new();

    for pattern in patterns {
        let ActionPattern::Pooled {
            condition, weight, ..
        } = pattern
        else {
            continue;
        };

        let band = match bands.iter_mut().position(|b| b.condition == *condition) {
            Some(index) => &mut bands[index],
            None => {
                bands.push(PoolBand {
                    condition: *condition,
                    entries: 0,
                    weight_sum: None,
                });
                let last = bands.len() - 1;
                &mut bands[last]
            }
        };

        band.entries += 1;
        if let Some(w) = weight {
            band.weight_sum = Some(band.weight_sum.unwrap_or(0.0) + w);
        }
    }

    bands
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bands_partition_health() {
        let high = HealthCondition::above(667);
        let mid = HealthCondition::between(333, 667);
        let low = HealthCondition::at_or_below(333);

        for health in 0..=90 {
            let matching = [high, mid, low]
                .iter()
                .filter(|c| c.holds(health, 90))
                .count();
            assert_eq!(matching, 1, "health {health}/90");
        }

        assert!(high.holds(61, 90));
        assert!(mid.holds(60, 90));
        assert!(low.holds(29, 90));
        assert!(mid.holds(30, 90));
    }

    #[test]
    fn zero_max_health_counts_as_empty() {
        assert!(HealthCondition::at_or_below(100).holds(10, 0));
        assert!(!HealthCondition::above(0).holds(10, 0));
    }

    #[test]
    fn malformed_bounds_are_detected() {
        assert!(HealthCondition::between(333, 667).is_well_formed());
        assert!(!HealthCondition::between(667, 333).is_well_formed());
        assert!(!HealthCondition::above(1000).is_well_formed());
        assert!(!HealthCondition::at_or_below(1200).is_well_formed());
    }

    #[test]
    fn pool_bands_sum_weights_per_condition() {
        let strike = Action::offense("Strike", 5);
        let patterns = vec![
            ActionPattern::scripted(1, strike.clone()),
            ActionPattern::pooled(strike.clone())
                .when(HealthCondition::above(500))
                .weighted(0.7),
            ActionPattern::pooled(strike.clone())
                .when(HealthCondition::above(500))
                .weighted(0.5),
            ActionPattern::pooled(strike.clone()).when(HealthCondition::at_or_below(500)),
        ];

        let bands = pool_bands(&patterns);

        assert_eq!(bands.len(), 2);
        assert_eq!(bands[0].entries, 2);
        assert!(bands[0].deviates(0.05));
        assert_eq!(bands[1].weight_sum, None);
        assert!(!bands[1].deviates(0.05));
    }
}
