//! Actions: what a played card or a chosen enemy move does.

use crate::config::CombatConfig;
use crate::state::{StatusEffectEntry, StatusKind};

/// Broad category of an action; decides how `base_power` is interpreted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ActionCategory {
    /// `base_power` is damage per hit.
    Offense,
    /// Grants guard; an optional `base_power` also strikes.
    Defense,
    /// `base_power` is health restored to the actor.
    Heal,
    /// Effects, plus damage when `base_power` is present.
    Special,
}

impl ActionCategory {
    /// Whether this category requires `base_power`.
    pub const fn requires_power(self) -> bool {
        matches!(self, Self::Offense | Self::Heal)
    }
}

/// A played card's or an enemy pattern's effect, as plain data.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Action {
    pub name: String,
    pub category: ActionCategory,
    #[cfg_attr(feature = "serde", serde(default))]
    pub base_power: Option<u32>,
    /// Number of hits; one when absent.
    #[cfg_attr(feature = "serde", serde(default))]
    pub hits: Option<u32>,
    /// Guard granted to the actor.
    #[cfg_attr(feature = "serde", serde(default))]
    pub guard: Option<u32>,
    /// Effects applied to the actor after resolution.
    #[cfg_attr(feature = "serde", serde(default))]
    pub self_effects: Vec<StatusEffectEntry>,
    /// Effects applied to the opponent after resolution.
    #[cfg_attr(feature = "serde", serde(default))]
    pub target_effects: Vec<StatusEffectEntry>,
    /// Strip the actor's debuffs before new effects land.
    #[cfg_attr(feature = "serde", serde(default))]
    pub cleanse: bool,
}

impl Action {
    fn base(name: impl Into<String>, category: ActionCategory) -> Self {
        Self {
            name: name.into(),
            category,
            base_power: None,
            hits: None,
            guard: None,
            self_effects: Vec::new(),
            target_effects: Vec::new(),
            cleanse: false,
        }
    }

    pub fn offense(name: impl Into<String>, power: u32) -> Self {
        Self {
            base_power: Some(power),
            ..Self::base(name, ActionCategory::Offense)
        }
    }

    pub fn defense(name: impl Into<String>, guard: u32) -> Self {
        Self {
            guard: Some(guard),
            ..Self::base(name, ActionCategory::Defense)
        }
    }

    pub fn heal(name: impl Into<String>, amount: u32) -> Self {
        Self {
            base_power: Some(amount),
            ..Self::base(name, ActionCategory::Heal)
        }
    }

    pub fn special(name: impl Into<String>) -> Self {
        Self::base(name, ActionCategory::Special)
    }

    #[must_use]
    pub fn with_hits(mut self, hits: u32) -> Self {
        self.hits = Some(hits);
        self
    }

    #[must_use]
    pub fn with_guard(mut self, guard: u32) -> Self {
        self.guard = Some(guard);
        self
    }

    #[must_use]
    pub fn applying_to_self(mut self, effect: StatusEffectEntry) -> Self {
        self.self_effects.push(effect);
        self
    }

    #[must_use]
    pub fn applying_to_target(mut self, effect: StatusEffectEntry) -> Self {
        self.target_effects.push(effect);
        self
    }

    #[must_use]
    pub fn with_cleanse(mut self) -> Self {
        self.cleanse = true;
        self
    }

    /// Base power, zero when absent.
    pub fn power(&self) -> u32 {
        self.base_power.unwrap_or(0)
    }

    /// Effective hit count, clamped to `1..=MAX_HITS`.
    pub fn hit_count(&self) -> u32 {
        self.hits.unwrap_or(1).clamp(1, CombatConfig::MAX_HITS)
    }

    /// Whether each hit runs the damage pipeline. Offense always does,
    /// even at zero power; Heal never does.
    pub fn deals_damage(&self) -> bool {
        match self.category {
            ActionCategory::Offense => true,
            ActionCategory::Heal => false,
            ActionCategory::Defense | ActionCategory::Special => self.base_power.is_some(),
        }
    }

    #[must_use]
    pub fn with_power(mut self, power: u32) -> Self {
        self.base_power = Some(power);
        self
    }

    /// Every status kind this action references.
    pub fn referenced_kinds(&self) -> impl Iterator<Item = StatusKind> + '_ {
        self.self_effects
            .iter()
            .chain(self.target_effects.iter())
            .map(|e| e.kind)
    }
}
