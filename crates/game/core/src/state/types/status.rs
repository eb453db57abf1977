//! Status effect ledger for a single combatant.
//!
//! The ledger holds at most one entry per [`StatusKind`]. Re-applying a kind
//! compounds its stacks while keeping the strongest duration and magnitude,
//! so a weaker application never dilutes a stronger one.
//!
//! # Value semantics
//!
//! Every operation returns a new ledger instead of mutating in place. The
//! engine owns both combatants and swaps in the returned ledger, which keeps
//! each phase transition a whole-value replacement.
//!
//! # Duration
//!
//! Durations count phases of the owning combatant. [`StatusLedger::advance`]
//! runs once per owner phase: periodic damage is read from the ledger as it
//! was *before* decay, then every timed entry loses one phase and entries
//! that reach zero are dropped. An entry applied with duration `N` is gone
//! after exactly `N` advances.

use arrayvec::ArrayVec;
use bitflags::bitflags;
use strum::{EnumCount, EnumIter, IntoStaticStr};

use crate::config::CombatConfig;
use crate::stats::ratio::Ratio;

bitflags! {
    /// Static classification of a status kind.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct StatusTraits: u8 {
        /// Negative for the holder; removed by cleanse.
        const DEBUFF = 1 << 0;
        /// Deals damage at the end of the holder's phase.
        const DAMAGE_OVER_TIME = 1 << 1;
        /// Holder cannot act.
        const DISABLING = 1 << 2;
        /// Alters the damage pipeline.
        const STAT = 1 << 3;
        /// Restores or drains a resource (health, guard, energy).
        const RESOURCE = 1 << 4;
        /// Alters effective speed.
        const SPEED = 1 << 5;
    }
}

/// Types of status effects.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, EnumCount, EnumIter, IntoStaticStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum StatusKind {
    // ========================================================================
    // Damage over time
    // ========================================================================
    Poison,
    Burn,
    Bleed,

    // ========================================================================
    // Disabling
    // ========================================================================
    Stun,
    Freeze,

    // ========================================================================
    // Stat modifiers
    // ========================================================================
    /// Attack +value%.
    Strength,
    /// Attack +value% per stack.
    Momentum,
    /// Attack ×(1 − value%).
    Weak,
    /// Damage taken ×(1 − value%).
    Fortify,
    /// Damage taken ×(1 + value%).
    Vulnerable,
    /// Shrinks the vulnerability excess above ×1.0 by value%.
    Tenacity,
    /// Enables critical checks; +value% rate and +value/100 multiplier.
    Precision,
    /// Reflects value% of incoming damage to the attacker.
    Thorns,
    /// Heals value% of dealt damage.
    Lifesteal,

    // ========================================================================
    // Speed / resources
    // ========================================================================
    /// Effective speed +value.
    Haste,
    /// Effective speed −value and reduced action energy.
    Slow,
    /// Restores value health at the start of the holder's phase.
    Regen,
    /// Grants value guard at the start of the holder's phase.
    ShieldRegen,
}

impl StatusKind {
    /// Number of distinct kinds; bounds the ledger size.
    pub const KINDS: usize = <Self as EnumCount>::COUNT;

    /// Static classification table.
    pub const fn traits(self) -> StatusTraits {
        match self {
            Self::Poison | Self::Burn | Self::Bleed => {
                StatusTraits::DEBUFF.union(StatusTraits::DAMAGE_OVER_TIME)
            }
            Self::Stun | Self::Freeze => StatusTraits::DEBUFF.union(StatusTraits::DISABLING),
            Self::Weak | Self::Vulnerable => StatusTraits::DEBUFF.union(StatusTraits::STAT),
            Self::Strength
            | Self::Momentum
            | Self::Fortify
            | Self::Tenacity
            | Self::Precision
            | Self::Thorns
            | Self::Lifesteal => StatusTraits::STAT,
            Self::Haste => StatusTraits::SPEED,
            Self::Slow => StatusTraits::DEBUFF
                .union(StatusTraits::SPEED)
                .union(StatusTraits::RESOURCE),
            Self::Regen | Self::ShieldRegen => StatusTraits::RESOURCE,
        }
    }

    pub const fn is_debuff(self) -> bool {
        self.traits().contains(StatusTraits::DEBUFF)
    }

    pub const fn is_damage_over_time(self) -> bool {
        self.traits().contains(StatusTraits::DAMAGE_OVER_TIME)
    }

    /// Whether this effect prevents the holder from acting.
    pub const fn prevents_action(self) -> bool {
        self.traits().contains(StatusTraits::DISABLING)
    }

    /// Damage per stack dealt at the end of the holder's phase.
    pub const fn periodic_coefficient(self) -> u32 {
        match self {
            Self::Poison => 3,
            Self::Burn => 4,
            Self::Bleed => 2,
            _ => 0,
        }
    }

    pub fn as_str(self) -> &'static str {
        self.into()
    }
}

impl core::fmt::Display for StatusKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Remaining lifetime of an entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EffectDuration {
    /// Expires after this many owner phases.
    Turns(u32),
    /// Never decays; removed only explicitly or by cleanse.
    Permanent,
}

impl EffectDuration {
    /// The longer of two durations. Permanent dominates.
    pub fn longest(self, other: Self) -> Self {
        match (self, other) {
            (Self::Permanent, _) | (_, Self::Permanent) => Self::Permanent,
            (Self::Turns(a), Self::Turns(b)) => Self::Turns(a.max(b)),
        }
    }

    /// Duration after one phase, or `None` when the entry expires.
    pub fn decayed(self) -> Option<Self> {
        match self {
            Self::Permanent => Some(Self::Permanent),
            Self::Turns(n) if n <= 1 => None,
            Self::Turns(n) => Some(Self::Turns(n - 1)),
        }
    }

    pub fn is_permanent(self) -> bool {
        matches!(self, Self::Permanent)
    }
}

/// A single active status effect, also used to describe what an action
/// applies.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusEffectEntry {
    pub kind: StatusKind,
    #[cfg_attr(feature = "serde", serde(default = "default_stacks"))]
    pub stacks: u32,
    pub duration: EffectDuration,
    /// Magnitude; meaning depends on the kind (percent, flat amount, speed).
    #[cfg_attr(feature = "serde", serde(default))]
    pub value: u32,
    /// Optional tag naming what applied the effect.
    #[cfg_attr(feature = "serde", serde(default))]
    pub source: Option<String>,
}

#[cfg(feature = "serde")]
fn default_stacks() -> u32 {
    1
}

impl StatusEffectEntry {
    pub fn new(kind: StatusKind, stacks: u32, duration: EffectDuration, value: u32) -> Self {
        Self {
            kind,
            stacks,
            duration,
            value,
            source: None,
        }
    }

    /// Single-stack timed effect.
    pub fn timed(kind: StatusKind, turns: u32, value: u32) -> Self {
        Self::new(kind, 1, EffectDuration::Turns(turns), value)
    }

    /// Set the source of this effect.
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    fn merged(&self, incoming: &StatusEffectEntry) -> Self {
        Self {
            kind: self.kind,
            stacks: self.stacks.saturating_add(incoming.stacks.max(1)),
            duration: self.duration.longest(incoming.duration),
            value: self.value.max(incoming.value),
            source: incoming.source.clone().or_else(|| self.source.clone()),
        }
    }
}

/// Health and guard restored at the start of the holder's phase.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Restoration {
    pub health: u32,
    pub guard: u32,
}

impl Restoration {
    pub fn is_empty(&self) -> bool {
        self.health == 0 && self.guard == 0
    }
}

/// Result of advancing a ledger by one owner phase.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LedgerAdvance {
    /// Ledger after decay.
    pub ledger: StatusLedger,
    /// Periodic damage accumulated from the pre-decay ledger.
    pub periodic_damage: u32,
    /// Kinds removed because their duration ran out.
    pub expired: Vec<StatusKind>,
}

/// Active status effects on a combatant, one entry per kind.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusLedger {
    entries: ArrayVec<StatusEffectEntry, { StatusKind::KINDS }>,
}

impl StatusLedger {
    /// Creates an empty ledger.
    pub fn empty() -> Self {
        Self {
            entries: ArrayVec::new(),
        }
    }

    // ========================================================================
    // Transitions
    // ========================================================================

    /// Returns a ledger with `incoming` applied.
    ///
    /// An existing entry of the same kind keeps a single slot: stacks are
    /// summed, duration and value take the maximum.
    #[must_use]
    pub fn with_applied(&self, incoming: &StatusEffectEntry) -> Self {
        let mut next = self.clone();
        if let Some(existing) = next.entries.iter_mut().find(|e| e.kind == incoming.kind) {
            *existing = existing.merged(incoming);
            return next;
        }

        // One slot per kind, so the ledger can never be full here.
        let mut fresh = incoming.clone();
        fresh.stacks = fresh.stacks.max(1);
        next.entries.push(fresh);
        next
    }

    /// Returns a ledger with every entry in `incoming` applied in order.
    #[must_use]
    pub fn with_all_applied<'a>(
        &self,
        incoming: impl IntoIterator<Item = &'a StatusEffectEntry>,
    ) -> Self {
        incoming
            .into_iter()
            .fold(self.clone(), |ledger, entry| ledger.with_applied(entry))
    }

    /// Returns a ledger without `kind`.
    #[must_use]
    pub fn without(&self, kind: StatusKind) -> Self {
        let mut next = self.clone();
        next.entries.retain(|e| e.kind != kind);
        next
    }

    /// Returns a ledger with every debuff removed.
    #[must_use]
    pub fn cleansed(&self) -> Self {
        let mut next = self.clone();
        next.entries.retain(|e| !e.kind.is_debuff());
        next
    }

    /// Returns a ledger with every timed entry decayed by one phase.
    #[must_use]
    pub fn decayed(&self) -> Self {
        self.advance().ledger
    }

    /// Reads periodic damage, then decays one phase.
    #[must_use]
    pub fn advance(&self) -> LedgerAdvance {
        let periodic_damage = self.periodic_damage();
        let mut expired = Vec::new();
        let mut entries = ArrayVec::new();

        for entry in &self.entries {
            match entry.duration.decayed() {
                Some(duration) => entries.push(StatusEffectEntry {
                    duration,
                    ..entry.clone()
                }),
                None => expired.push(entry.kind),
            }
        }

        LedgerAdvance {
            ledger: Self { entries },
            periodic_damage,
            expired,
        }
    }

    // ========================================================================
    // Queries
    // ========================================================================

    pub fn get(&self, kind: StatusKind) -> Option<&StatusEffectEntry> {
        self.entries.iter().find(|e| e.kind == kind)
    }

    pub fn has(&self, kind: StatusKind) -> bool {
        self.get(kind).is_some()
    }

    /// Magnitude of `kind`, or 0 when absent.
    pub fn value_of(&self, kind: StatusKind) -> u32 {
        self.get(kind).map_or(0, |e| e.value)
    }

    pub fn iter(&self) -> impl Iterator<Item = &StatusEffectEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    // ========================================================================
    // Derived modifiers
    // ========================================================================

    /// Attacker-side factors: `[1 + Σ increases, Π (1 − decreases)]`.
    ///
    /// Percentage increases are summed before any decrease is applied.
    pub fn attack_multiplier(&self) -> [Ratio; 2] {
        let increase: u32 = self
            .entries
            .iter()
            .map(|e| match e.kind {
                StatusKind::Strength => e.value,
                StatusKind::Momentum => e.value.saturating_mul(e.stacks),
                _ => 0,
            })
            .fold(0u32, u32::saturating_add);

        let decrease = self
            .entries
            .iter()
            .filter(|e| e.kind == StatusKind::Weak)
            .fold(Ratio::ONE, |acc, e| {
                acc.times(Ratio::one_minus_percent(e.value))
            });

        [Ratio::one_plus_percent(increase), decrease]
    }

    /// Amplification of incoming damage, with tenacity applied to the
    /// excess above ×1.0.
    pub fn vulnerability_multiplier(&self) -> Ratio {
        let raw = Ratio::one_plus_percent(self.value_of(StatusKind::Vulnerable));
        match self.get(StatusKind::Tenacity) {
            Some(tenacity) => raw.shrink_excess(tenacity.value),
            None => raw,
        }
    }

    /// Reduction of incoming damage.
    pub fn damage_reduction_multiplier(&self) -> Ratio {
        self.entries
            .iter()
            .filter(|e| e.kind == StatusKind::Fortify)
            .fold(Ratio::ONE, |acc, e| {
                acc.times(Ratio::one_minus_percent(e.value))
            })
    }

    /// Critical-chance bonus if the holder has a critical buff.
    pub fn critical_bonus(&self) -> Option<u32> {
        self.get(StatusKind::Precision).map(|e| e.value)
    }

    pub fn reflect_percent(&self) -> Option<u32> {
        self.get(StatusKind::Thorns).map(|e| e.value)
    }

    pub fn lifesteal_percent(&self) -> Option<u32> {
        self.get(StatusKind::Lifesteal).map(|e| e.value)
    }

    /// Sum of stacks × coefficient over every active damage-over-time kind.
    pub fn periodic_damage(&self) -> u32 {
        self.entries
            .iter()
            .filter(|e| e.kind.is_damage_over_time())
            .map(|e| e.stacks.saturating_mul(e.kind.periodic_coefficient()))
            .fold(0u32, u32::saturating_add)
    }

    /// Start-of-phase restorations.
    pub fn restoration(&self) -> Restoration {
        Restoration {
            health: self.value_of(StatusKind::Regen),
            guard: self.value_of(StatusKind::ShieldRegen),
        }
    }

    /// `false` while any disabling effect is active.
    pub fn can_act(&self) -> bool {
        !self.entries.iter().any(|e| e.kind.prevents_action())
    }

    /// Action energy removed by active effects.
    pub fn energy_penalty(&self, config: &CombatConfig) -> u32 {
        if self.has(StatusKind::Slow) {
            config.slow_energy_penalty
        } else {
            0
        }
    }

    /// Signed transient speed modifier (haste − slow).
    pub fn speed_modifier(&self) -> i64 {
        i64::from(self.value_of(StatusKind::Haste)) - i64::from(self.value_of(StatusKind::Slow))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn reapplication_keeps_one_entry_and_takes_maximums() {
        let ledger = StatusLedger::empty()
            .with_applied(&StatusEffectEntry::new(
                StatusKind::Strength,
                2,
                EffectDuration::Turns(3),
                50,
            ))
            .with_applied(&StatusEffectEntry::new(
                StatusKind::Strength,
                1,
                EffectDuration::Turns(5),
                20,
            ))
            .with_applied(&StatusEffectEntry::new(
                StatusKind::Strength,
                4,
                EffectDuration::Turns(1),
                30,
            ));

        assert_eq!(ledger.len(), 1);
        let entry = ledger.get(StatusKind::Strength).unwrap();
        assert_eq!(entry.stacks, 7);
        assert_eq!(entry.duration, EffectDuration::Turns(5));
        assert_eq!(entry.value, 50);
    }

    #[test]
    fn operations_leave_the_original_untouched() {
        let original = StatusLedger::empty().with_applied(&StatusEffectEntry::timed(
            StatusKind::Poison,
            2,
            0,
        ));
        let snapshot = original.clone();

        let _ = original.with_applied(&StatusEffectEntry::timed(StatusKind::Burn, 1, 0));
        let _ = original.cleansed();
        let _ = original.advance();

        assert_eq!(original, snapshot);
    }

    #[test]
    fn duration_two_survives_one_decay_and_not_two() {
        let ledger = StatusLedger::empty().with_applied(&StatusEffectEntry::timed(
            StatusKind::Weak,
            2,
            25,
        ));

        let once = ledger.decayed();
        assert_eq!(
            once.get(StatusKind::Weak).map(|e| e.duration),
            Some(EffectDuration::Turns(1))
        );

        let twice = once.decayed();
        assert!(!twice.has(StatusKind::Weak));
    }

    #[test]
    fn duration_n_is_removed_exactly_on_call_n() {
        for n in 1..=6u32 {
            let mut ledger = StatusLedger::empty().with_applied(&StatusEffectEntry::timed(
                StatusKind::Haste,
                n,
                10,
            ));
            for call in 1..=n {
                let advance = ledger.advance();
                ledger = advance.ledger;
                if call < n {
                    assert!(ledger.has(StatusKind::Haste), "n={n} removed early at {call}");
                    assert!(advance.expired.is_empty());
                } else {
                    assert!(!ledger.has(StatusKind::Haste), "n={n} survived call {call}");
                    assert_eq!(advance.expired, vec![StatusKind::Haste]);
                }
            }
        }
    }

    #[test]
    fn permanent_entries_never_decay() {
        let mut ledger = StatusLedger::empty().with_applied(&StatusEffectEntry::new(
            StatusKind::Thorns,
            1,
            EffectDuration::Permanent,
            30,
        ));
        for _ in 0..50 {
            ledger = ledger.decayed();
        }
        assert_eq!(
            ledger.get(StatusKind::Thorns).map(|e| e.duration),
            Some(EffectDuration::Permanent)
        );
    }

    #[test]
    fn periodic_damage_is_read_before_decay() {
        let ledger = StatusLedger::empty()
            .with_applied(&StatusEffectEntry::new(
                StatusKind::Poison,
                3,
                EffectDuration::Turns(1),
                0,
            ))
            .with_applied(&StatusEffectEntry::new(
                StatusKind::Burn,
                2,
                EffectDuration::Turns(2),
                0,
            ));

        let advance = ledger.advance();
        // 3 × 3 + 2 × 4
        assert_eq!(advance.periodic_damage, 17);
        assert!(!advance.ledger.has(StatusKind::Poison));
        assert_eq!(advance.ledger.periodic_damage(), 8);
    }

    #[test]
    fn cleanse_strips_only_debuffs() {
        let ledger = StatusKind::iter().fold(StatusLedger::empty(), |ledger, kind| {
            ledger.with_applied(&StatusEffectEntry::timed(kind, 3, 10))
        });
        assert_eq!(ledger.len(), StatusKind::KINDS);

        let cleansed = ledger.cleansed();
        assert!(cleansed.iter().all(|e| !e.kind.is_debuff()));
        assert!(cleansed.has(StatusKind::Strength));
        assert!(!cleansed.has(StatusKind::Stun));
        assert!(!cleansed.has(StatusKind::Slow));
    }

    #[test]
    fn momentum_scales_with_stacks_and_weak_applies_after() {
        let ledger = StatusLedger::empty()
            .with_applied(&StatusEffectEntry::timed(StatusKind::Strength, 2, 20))
            .with_applied(&StatusEffectEntry::new(
                StatusKind::Momentum,
                3,
                EffectDuration::Permanent,
                10,
            ))
            .with_applied(&StatusEffectEntry::timed(StatusKind::Weak, 2, 25));

        let [increase, decrease] = ledger.attack_multiplier();
        assert_eq!(increase, Ratio::one_plus_percent(50));
        assert_eq!(decrease, Ratio::one_minus_percent(25));
    }

    #[test]
    fn tenacity_never_helps_without_vulnerability() {
        let tenacious = StatusLedger::empty()
            .with_applied(&StatusEffectEntry::timed(StatusKind::Tenacity, 2, 50));
        assert_eq!(tenacious.vulnerability_multiplier(), Ratio::ONE);

        let exposed = tenacious.with_applied(&StatusEffectEntry::timed(StatusKind::Vulnerable, 2, 50));
        assert_eq!(exposed.vulnerability_multiplier(), Ratio::one_plus_percent(25));
    }

    #[test]
    fn gating_restoration_and_resources() {
        let config = CombatConfig::default();
        let ledger = StatusLedger::empty()
            .with_applied(&StatusEffectEntry::timed(StatusKind::Regen, 2, 4))
            .with_applied(&StatusEffectEntry::timed(StatusKind::ShieldRegen, 2, 6))
            .with_applied(&StatusEffectEntry::timed(StatusKind::Slow, 1, 15))
            .with_applied(&StatusEffectEntry::timed(StatusKind::Haste, 1, 5));

        assert!(ledger.can_act());
        assert_eq!(ledger.restoration(), Restoration { health: 4, guard: 6 });
        assert_eq!(ledger.energy_penalty(&config), config.slow_energy_penalty);
        assert_eq!(ledger.speed_modifier(), -10);

        let stunned = ledger.with_applied(&StatusEffectEntry::timed(StatusKind::Stun, 1, 0));
        assert!(!stunned.can_act());
    }
}
