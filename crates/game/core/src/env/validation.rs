//! Structural validation of catalog data.
//!
//! Runs before an encounter starts so that malformed actions fail fast
//! instead of mid-resolution. Unknown status kinds never reach this point:
//! [`StatusKind`](crate::state::StatusKind) is a closed enum and fails
//! deserialization in the loader.

use crate::action::{Action, ActionPattern, pool_bands};
use crate::config::CombatConfig;
use crate::error::{ErrorSeverity, GameError};
use crate::state::{EffectDuration, StatusEffectEntry};

use super::catalog::{CardDefinition, Catalog, CatalogOracle, EnemyDefinition};

/// Malformed catalog data.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    #[error("{owner}: action '{action}' needs a base power")]
    MissingBasePower { owner: String, action: String },

    #[error("{owner}: action '{action}' has {hits} hits (allowed 1..={max})")]
    InvalidHitCount {
        owner: String,
        action: String,
        hits: u32,
        max: u32,
    },

    #[error("{owner}: effect '{kind}' on '{action}' has zero stacks")]
    ZeroStacks {
        owner: String,
        action: String,
        kind: &'static str,
    },

    #[error("{owner}: effect '{kind}' on '{action}' lasts zero turns")]
    ZeroDuration {
        owner: String,
        action: String,
        kind: &'static str,
    },

    #[error("{owner}: scripted pattern '{action}' uses phase 0 (phases start at 1)")]
    ZeroPhase { owner: String, action: String },

    #[error("{owner}: pattern '{action}' has a malformed health condition")]
    MalformedCondition { owner: String, action: String },

    #[error("{owner}: pooled pattern '{action}' has an invalid weight")]
    InvalidWeight { owner: String, action: String },

    #[error("{owner}: enemy has no patterns")]
    NoPatterns { owner: String },

    #[error("{owner}: max health must be positive")]
    ZeroMaxHealth { owner: String },

    #[error("player deck references unknown card '{0}'")]
    UnknownCard(String),

    #[error("player deck is empty")]
    EmptyDeck,
}

impl GameError for CatalogError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        use CatalogError::*;
        match self {
            MissingBasePower { .. } => "CATALOG_MISSING_BASE_POWER",
            InvalidHitCount { .. } => "CATALOG_INVALID_HIT_COUNT",
            ZeroStacks { .. } => "CATALOG_ZERO_STACKS",
            ZeroDuration { .. } => "CATALOG_ZERO_DURATION",
            ZeroPhase { .. } => "CATALOG_ZERO_PHASE",
            MalformedCondition { .. } => "CATALOG_MALFORMED_CONDITION",
            InvalidWeight { .. } => "CATALOG_INVALID_WEIGHT",
            NoPatterns { .. } => "CATALOG_NO_PATTERNS",
            ZeroMaxHealth { .. } => "CATALOG_ZERO_MAX_HEALTH",
            UnknownCard(_) => "CATALOG_UNKNOWN_CARD",
            EmptyDeck => "CATALOG_EMPTY_DECK",
        }
    }
}

/// Authoring issue that does not block an encounter.
#[derive(Clone, Debug, PartialEq)]
pub enum CatalogWarning {
    /// A pooled band's explicit weights do not sum to 1.0; they are
    /// normalized at selection time.
    WeightSumDeviation { owner: String, weight_sum: f64 },
    /// Some health fraction (per-mille) has no eligible pooled entry, so
    /// the enemy may idle there.
    PoolGap { owner: String, per_mille: u32 },
}

impl core::fmt::Display for CatalogWarning {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::WeightSumDeviation { owner, weight_sum } => {
                write!(f, "{owner}: pooled weights sum to {weight_sum:.3}, expected 1.0")
            }
            Self::PoolGap { owner, per_mille } => {
                write!(
                    f,
                    "{owner}: no pooled pattern covers health {per_mille}/1000; enemy may idle"
                )
            }
        }
    }
}

/// Check an action's structural requirements.
pub fn validate_action(owner: &str, action: &Action) -> Result<(), CatalogError> {
    if action.category.requires_power() && action.base_power.is_none() {
        return Err(CatalogError::MissingBasePower {
            owner: owner.to_owned(),
            action: action.name.clone(),
        });
    }

    if let Some(hits) = action.hits.filter(|h| !(1..=CombatConfig::MAX_HITS).contains(h)) {
        return Err(CatalogError::InvalidHitCount {
            owner: owner.to_owned(),
            action: action.name.clone(),
            hits,
            max: CombatConfig::MAX_HITS,
        });
    }

    action
        .self_effects
        .iter()
        .chain(&action.target_effects)
        .try_for_each(|effect| validate_effect(owner, &action.name, effect))
}

fn validate_effect(
    owner: &str,
    action: &str,
    effect: &StatusEffectEntry,
) -> Result<(), CatalogError> {
    if effect.stacks == 0 {
        return Err(CatalogError::ZeroStacks {
            owner: owner.to_owned(),
            action: action.to_owned(),
            kind: effect.kind.as_str(),
        });
    }
    if effect.duration == EffectDuration::Turns(0) {
        return Err(CatalogError::ZeroDuration {
            owner: owner.to_owned(),
            action: action.to_owned(),
            kind: effect.kind.as_str(),
        });
    }
    Ok(())
}

pub fn validate_card(card: &CardDefinition) -> Result<(), CatalogError> {
    validate_action(&card.id, &card.action)
}

/// Check an enemy definition, returning non-blocking warnings on success.
pub fn validate_enemy(
    enemy: &EnemyDefinition,
    config: &CombatConfig,
) -> Result<Vec<CatalogWarning>, CatalogError> {
    let owner = enemy.id.as_str();

    if enemy.max_health == 0 {
        return Err(CatalogError::ZeroMaxHealth {
            owner: owner.to_owned(),
        });
    }
    if enemy.patterns.is_empty() {
        return Err(CatalogError::NoPatterns {
            owner: owner.to_owned(),
        });
    }

    for effect in &enemy.starting_effects {
        validate_effect(owner, "starting effects", effect)?;
    }

    for pattern in &enemy.patterns {
        let action = pattern.action();
        validate_action(owner, action)?;

        if pattern.condition().is_some_and(|c| !c.is_well_formed()) {
            return Err(CatalogError::MalformedCondition {
                owner: owner.to_owned(),
                action: action.name.clone(),
            });
        }

        match pattern {
            ActionPattern::Scripted { phase: 0, .. } => {
                return Err(CatalogError::ZeroPhase {
                    owner: owner.to_owned(),
                    action: action.name.clone(),
                });
            }
            ActionPattern::Pooled {
                weight: Some(w), ..
            } if !w.is_finite() || *w < 0.0 => {
                return Err(CatalogError::InvalidWeight {
                    owner: owner.to_owned(),
                    action: action.name.clone(),
                });
            }
            _ => {}
        }
    }

    let bands = pool_bands(&enemy.patterns);
    let mut warnings: Vec<CatalogWarning> = bands
        .iter()
        .filter(|band| band.deviates(config.weight_tolerance))
        .filter_map(|band| band.weight_sum)
        .map(|weight_sum| CatalogWarning::WeightSumDeviation {
            owner: owner.to_owned(),
            weight_sum,
        })
        .collect();

    if let Some(per_mille) = uncovered_fraction(&enemy.patterns) {
        warnings.push(CatalogWarning::PoolGap {
            owner: owner.to_owned(),
            per_mille,
        });
    }

    for warning in &warnings {
        tracing::warn!("{warning}");
    }

    Ok(warnings)
}

/// First health fraction that no pooled condition covers.
fn uncovered_fraction(patterns: &[ActionPattern]) -> Option<u32> {
    let scale = CombatConfig::HEALTH_FRACTION_SCALE;
    (0..=scale).find(|&per_mille| {
        !patterns
            .iter()
            .filter(|p| !p.is_scripted())
            .any(|p| p.is_eligible(i64::from(per_mille), i64::from(scale)))
    })
}

/// Validate every card and enemy plus the player's deck list.
pub fn validate_catalog(
    catalog: &Catalog,
    config: &CombatConfig,
) -> Result<Vec<CatalogWarning>, CatalogError> {
    for card in catalog.cards() {
        validate_card(card)?;
    }

    let mut warnings = Vec::new();
    for enemy in catalog.enemies() {
        warnings.extend(validate_enemy(enemy, config)?);
    }

    let player = catalog.player();
    if player.max_health == 0 {
        return Err(CatalogError::ZeroMaxHealth {
            owner: player.name.clone(),
        });
    }
    if player.deck.is_empty() {
        return Err(CatalogError::EmptyDeck);
    }
    catalog.player_deck().map_err(CatalogError::UnknownCard)?;

    Ok(warnings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::{ActionCategory, HealthCondition};
    use crate::env::PlayerProfile;
    use crate::state::StatusKind;

    fn enemy(patterns: Vec<ActionPattern>) -> EnemyDefinition {
        EnemyDefinition {
            id: "slime".into(),
            name: "Slime".into(),
            max_health: 30,
            secondary_armor: 0,
            speed: 80,
            starting_effects: Vec::new(),
            patterns,
        }
    }

    #[test]
    fn offense_without_power_is_rejected() {
        let mut action = Action::special("Nothing");
        action.category = ActionCategory::Offense;

        let err = validate_action("card", &action).unwrap_err();
        assert!(matches!(err, CatalogError::MissingBasePower { .. }));
        assert_eq!(err.severity(), ErrorSeverity::Validation);
        assert_eq!(err.error_code(), "CATALOG_MISSING_BASE_POWER");
    }

    #[test]
    fn zero_hits_and_zero_turns_are_rejected() {
        let mut action = Action::offense("Flurry", 3);
        action.hits = Some(0);
        assert!(matches!(
            validate_action("card", &action),
            Err(CatalogError::InvalidHitCount { hits: 0, .. })
        ));

        let action = Action::special("Hex")
            .applying_to_target(StatusEffectEntry::timed(StatusKind::Weak, 0, 25));
        assert!(matches!(
            validate_action("card", &action),
            Err(CatalogError::ZeroDuration { kind: "weak", .. })
        ));
    }

    #[test]
    fn scripted_phase_zero_is_rejected() {
        let result = validate_enemy(
            &enemy(vec![ActionPattern::scripted(0, Action::offense("Bite", 3))]),
            &CombatConfig::default(),
        );
        assert!(matches!(result, Err(CatalogError::ZeroPhase { .. })));
    }

    #[test]
    fn negative_weight_and_bad_condition_are_rejected() {
        let config = CombatConfig::default();
        let negative = enemy(vec![
            ActionPattern::pooled(Action::offense("Bite", 3)).weighted(-0.5),
        ]);
        assert!(matches!(
            validate_enemy(&negative, &config),
            Err(CatalogError::InvalidWeight { .. })
        ));

        let inverted = enemy(vec![
            ActionPattern::pooled(Action::offense("Bite", 3))
                .when(HealthCondition::between(800, 200)),
        ]);
        assert!(matches!(
            validate_enemy(&inverted, &config),
            Err(CatalogError::MalformedCondition { .. })
        ));
    }

    #[test]
    fn weight_deviation_is_a_warning_not_an_error() {
        let slime = enemy(vec![
            ActionPattern::pooled(Action::offense("Bite", 3)).weighted(0.6),
            ActionPattern::pooled(Action::defense("Harden", 4)).weighted(0.6),
        ]);

        let warnings = validate_enemy(&slime, &CombatConfig::default()).unwrap();

        assert_eq!(warnings.len(), 1);
        assert!(matches!(
            warnings[0],
            CatalogWarning::WeightSumDeviation { weight_sum, .. } if (weight_sum - 1.2).abs() < 1e-9
        ));
    }

    #[test]
    fn weights_within_tolerance_pass_silently() {
        let slime = enemy(vec![
            ActionPattern::pooled(Action::offense("Bite", 3)).weighted(0.52),
            ActionPattern::pooled(Action::defense("Harden", 4)).weighted(0.5),
        ]);
        assert!(validate_enemy(&slime, &CombatConfig::default()).unwrap().is_empty());
    }

    #[test]
    fn conditional_only_pool_warns_about_gaps() {
        let slime = enemy(vec![
            ActionPattern::pooled(Action::offense("Bite", 3)).when(HealthCondition::above(500)),
        ]);
        let warnings = validate_enemy(&slime, &CombatConfig::default()).unwrap();
        assert!(matches!(
            warnings[0],
            CatalogWarning::PoolGap { per_mille: 0, .. }
        ));
    }

    #[test]
    fn complementary_bands_leave_no_gap() {
        let captain = enemy(vec![
            ActionPattern::pooled(Action::offense("Slash", 9)).when(HealthCondition::above(500)),
            ActionPattern::pooled(Action::offense("Flail", 4))
                .when(HealthCondition::at_or_below(500)),
        ]);
        assert!(validate_enemy(&captain, &CombatConfig::default()).unwrap().is_empty());
    }

    #[test]
    fn catalog_validation_checks_the_deck() {
        let card = CardDefinition::new("strike", 1, Action::offense("Strike", 6));
        let player = PlayerProfile {
            name: "Warden".into(),
            max_health: 50,
            health: None,
            speed: 100,
            equipment: Vec::new(),
            deck: vec!["strike".into(), "lunge".into()],
        };
        let catalog = Catalog::new(vec![card], Vec::new(), player);

        let result = validate_catalog(&catalog, &CombatConfig::default());
        assert_eq!(result, Err(CatalogError::UnknownCard("lunge".into())));
    }
}
