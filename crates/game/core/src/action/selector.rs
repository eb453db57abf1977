//! Enemy action selection.
//!
//! Selection runs in two stages:
//!
//! 1. **Scripted**: the first scripted pattern whose phase equals the
//!    enemy's phase counter and whose condition holds wins outright. No roll
//!    is consumed.
//! 2. **Pooled**: otherwise every pooled pattern whose condition holds is a
//!    candidate. When any candidate carries a weight, selection is weighted
//!    (missing weights count as 1.0) and normalized over the candidates;
//!    otherwise it is uniform.
//!
//! An empty candidate pool yields `None` and the caller idles the enemy.

use crate::config::CombatConfig;
use crate::env::{Dice, RngOracle};

use super::pattern::ActionPattern;
use super::types::Action;

/// Weight assumed for a pooled entry that carries none in a weighted pool.
pub const DEFAULT_POOL_WEIGHT: f64 = 1.0;

/// How a selection was reached.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SelectionSource {
    Scripted {
        phase: u32,
    },
    Pooled {
        candidates: usize,
        /// Normalized probability the chosen entry had.
        probability: f64,
    },
}

/// Chosen enemy action plus the pattern index it came from.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Selection<'a> {
    pub index: usize,
    pub action: &'a Action,
    pub source: SelectionSource,
}

/// Select the enemy's next action.
///
/// * `phase_counter` - 1-based count of enemy phases, including the current one
/// * `health`, `max_health` - the enemy's current health pools
pub fn select_action<'a, R: RngOracle>(
    patterns: &'a [ActionPattern],
    phase_counter: u32,
    health: i64,
    max_health: i64,
    dice: &mut Dice<R>,
    config: &CombatConfig,
) -> Option<Selection<'a>> {
    if let Some(selection) = scripted(patterns, phase_counter, health, max_health) {
        tracing::debug!(
            phase = phase_counter,
            action = %selection.action.name,
            "scripted enemy action selected"
        );
        return Some(selection);
    }

    let candidates: Vec<(usize, Option<f64>)> = patterns
        .iter()
        .enumerate()
        .filter_map(|(index, pattern)| match pattern {
            ActionPattern::Pooled { weight, .. } if pattern.is_eligible(health, max_health) => {
                Some((index, *weight))
            }
            _ => None,
        })
        .collect();

    if candidates.is_empty() {
        tracing::debug!(phase = phase_counter, "no eligible enemy pattern");
        return None;
    }

    let weight_sum = effective_weight_sum(&candidates);
    if let Some(sum) = weight_sum.filter(|sum| (sum - 1.0).abs() > config.weight_tolerance) {
        tracing::warn!(
            weight_sum = sum,
            tolerance = config.weight_tolerance,
            "pooled weights do not sum to 1.0; normalizing"
        );
    }

    let roll = dice.selection_roll();
    let (index, probability) = pick_pooled(&candidates, roll)?;
    let action = patterns[index].action();

    tracing::debug!(
        phase = phase_counter,
        roll,
        candidates = candidates.len(),
        probability,
        action = %action.name,
        "pooled enemy action selected"
    );

    Some(Selection {
        index,
        action,
        source: SelectionSource::Pooled {
            candidates: candidates.len(),
            probability,
        },
    })
}

fn scripted(
    patterns: &[ActionPattern],
    phase_counter: u32,
    health: i64,
    max_health: i64,
) -> Option<Selection<'_>> {
    patterns
        .iter()
        .enumerate()
        .find_map(|(index, pattern)| match pattern {
            ActionPattern::Scripted { phase, action, .. }
                if *phase == phase_counter && pattern.is_eligible(health, max_health) =>
            {
                Some(Selection {
                    index,
                    action,
                    source: SelectionSource::Scripted { phase: *phase },
                })
            }
            _ => None,
        })
}

/// Sum of effective weights, or `None` for a uniform pool.
fn effective_weight_sum(candidates: &[(usize, Option<f64>)]) -> Option<f64> {
    if candidates.iter().all(|(_, w)| w.is_none()) {
        return None;
    }
    Some(
        candidates
            .iter()
            .map(|(_, w)| effective_weight(*w))
            .sum(),
    )
}

fn effective_weight(weight: Option<f64>) -> f64 {
    match weight {
        Some(w) if w.is_finite() => w.max(0.0),
        Some(_) => 0.0,
        None => DEFAULT_POOL_WEIGHT,
    }
}

/// Pick a candidate with `roll` in `[0, 1)`.
///
/// Returns the pattern index and its normalized probability. Pools whose
/// weights sum to zero fall back to uniform selection.
pub fn pick_pooled(candidates: &[(usize, Option<f64>)], roll: f64) -> Option<(usize, f64)> {
    if candidates.is_empty() {
        return None;
    }

    let roll = roll.clamp(0.0, 1.0);

    match effective_weight_sum(candidates) {
        Some(total) if total > 0.0 => {
            let target = roll * total;
            let mut cumulative = 0.0;
            for (index, weight) in candidates {
                let weight = effective_weight(*weight);
                cumulative += weight;
                if weight > 0.0 && target < cumulative {
                    return Some((*index, weight / total));
                }
            }
            // roll == 1.0 or rounding at the upper edge
            candidates
                .iter()
                .rev()
                .find(|(_, w)| effective_weight(*w) > 0.0)
                .map(|(index, w)| (*index, effective_weight(*w) / total))
        }
        _ => {
            let len = candidates.len();
            let slot = ((roll * len as f64) as usize).min(len - 1);
            Some((candidates[slot].0, 1.0 / len as f64))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::HealthCondition;

    fn strike(name: &str) -> Action {
        Action::offense(name, 5)
    }

    #[test]
    fn scripted_phase_is_deterministic_and_consumes_no_roll() {
        let patterns = vec![
            ActionPattern::scripted(1, strike("Opening")),
            ActionPattern::scripted(3, strike("Slam")),
            ActionPattern::pooled(strike("Jab")),
        ];
        let config = CombatConfig::default();

        for seed in 0..20 {
            let mut dice = Dice::seeded(seed);
            let selection = select_action(&patterns, 3, 50, 50, &mut dice, &config).unwrap();
            assert_eq!(selection.action.name, "Slam");
            assert_eq!(selection.source, SelectionSource::Scripted { phase: 3 });
            assert_eq!(dice.nonce(), 0);
        }
    }

    #[test]
    fn scripted_entry_with_failing_condition_falls_back_to_pool() {
        let patterns = vec![
            ActionPattern::scripted(1, strike("Enrage")).when(HealthCondition::at_or_below(500)),
            ActionPattern::pooled(strike("Jab")),
        ];
        let mut dice = Dice::seeded(1);

        let selection =
            select_action(&patterns, 1, 50, 50, &mut dice, &CombatConfig::default()).unwrap();

        assert_eq!(selection.action.name, "Jab");
        assert_eq!(dice.nonce(), 1);
    }

    #[test]
    fn pool_is_filtered_by_health_band() {
        let patterns = vec![
            ActionPattern::pooled(strike("Calm")).when(HealthCondition::above(500)),
            ActionPattern::pooled(strike("Frenzy")).when(HealthCondition::at_or_below(500)),
        ];
        let config = CombatConfig::default();

        for seed in 0..20 {
            let mut dice = Dice::seeded(seed);
            let low = select_action(&patterns, 2, 20, 50, &mut dice, &config).unwrap();
            assert_eq!(low.action.name, "Frenzy");
            let high = select_action(&patterns, 2, 40, 50, &mut dice, &config).unwrap();
            assert_eq!(high.action.name, "Calm");
        }
    }

    #[test]
    fn empty_pool_yields_none() {
        let patterns = vec![
            ActionPattern::scripted(1, strike("Opening")),
            ActionPattern::pooled(strike("Frenzy")).when(HealthCondition::at_or_below(200)),
        ];
        let mut dice = Dice::seeded(3);

        assert!(select_action(&patterns, 2, 50, 50, &mut dice, &CombatConfig::default()).is_none());
        assert!(select_action(&[], 1, 50, 50, &mut dice, &CombatConfig::default()).is_none());
    }

    #[test]
    fn weighted_pick_follows_cumulative_weights() {
        let candidates = [(0, Some(0.25)), (1, Some(0.75))];

        assert_eq!(pick_pooled(&candidates, 0.0), Some((0, 0.25)));
        assert_eq!(pick_pooled(&candidates, 0.2499), Some((0, 0.25)));
        assert_eq!(pick_pooled(&candidates, 0.25), Some((1, 0.75)));
        assert_eq!(pick_pooled(&candidates, 1.0), Some((1, 0.75)));
    }

    #[test]
    fn weighted_pick_normalizes_and_defaults_missing_weights() {
        // effective weights 2.0 and 1.0 → 2/3 and 1/3
        let candidates = [(4, Some(2.0)), (7, None)];

        let (index, probability) = pick_pooled(&candidates, 0.5).unwrap();
        assert_eq!(index, 4);
        assert!((probability - 2.0 / 3.0).abs() < 1e-9);

        let (index, _) = pick_pooled(&candidates, 0.9).unwrap();
        assert_eq!(index, 7);
    }

    #[test]
    fn zero_weights_are_never_picked() {
        let candidates = [(0, Some(0.0)), (1, Some(1.0)), (2, Some(0.0))];
        for step in 0..10 {
            let roll = f64::from(step) / 10.0;
            assert_eq!(pick_pooled(&candidates, roll).map(|(i, _)| i), Some(1));
        }
    }

    #[test]
    fn uniform_pick_covers_every_candidate() {
        let candidates = [(0, None), (1, None), (2, None), (3, None)];

        let picked: Vec<usize> = [0.0, 0.3, 0.6, 0.99]
            .iter()
            .filter_map(|roll| pick_pooled(&candidates, *roll).map(|(i, _)| i))
            .collect();

        assert_eq!(picked, vec![0, 1, 2, 3]);
        assert_eq!(pick_pooled(&candidates, 0.5).map(|(_, p)| p), Some(0.25));
    }

    #[test]
    fn all_zero_weights_fall_back_to_uniform() {
        let candidates = [(0, Some(0.0)), (1, Some(0.0))];
        assert_eq!(pick_pooled(&candidates, 0.75), Some((1, 0.5)));
    }

    #[test]
    fn same_seed_reproduces_pooled_choice() {
        let patterns = vec![
            ActionPattern::pooled(strike("A")).weighted(0.5),
            ActionPattern::pooled(strike("B")).weighted(0.3),
            ActionPattern::pooled(strike("C")).weighted(0.2),
        ];
        let config = CombatConfig::default();

        let run = |seed| {
            let mut dice = Dice::seeded(seed);
            (1..=10)
                .map(|phase| {
                    select_action(&patterns, phase, 30, 30, &mut dice, &config)
                        .map(|s| s.index)
                })
                .collect::<Vec<_>>()
        };

        assert_eq!(run(42), run(42));
    }
}
