//! Per-encounter combatant state.

use core::fmt;

use crate::combat::DamageAllocation;
use crate::error::{ErrorSeverity, GameError};

use super::status::StatusLedger;

/// Which side of the encounter a combatant fights on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Side {
    Player,
    Enemy,
}

impl Side {
    pub const fn opponent(self) -> Self {
        match self {
            Side::Player => Side::Enemy,
            Side::Enemy => Side::Player,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Side::Player => "player",
            Side::Enemy => "enemy",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A damage-absorbing pool that ended up outside its legal range.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Pool {
    Health,
    SecondaryArmor,
    Guard,
}

/// A pool observed outside its bounds after a mutation.
///
/// This indicates a rules defect, not a gameplay outcome. The pool is clamped
/// back into range and the violation is reported so tests and logs see it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[error("{pool:?} observed at {observed}, clamped to {clamped}")]
pub struct InvariantViolation {
    pub pool: Pool,
    pub observed: i64,
    pub clamped: i64,
}

impl GameError for InvariantViolation {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Internal
    }

    fn error_code(&self) -> &'static str {
        match self.pool {
            Pool::Health => "INVARIANT_HEALTH",
            Pool::SecondaryArmor => "INVARIANT_SECONDARY_ARMOR",
            Pool::Guard => "INVARIANT_GUARD",
        }
    }
}

/// Mutable combat stats of one side for the duration of an encounter.
///
/// Pools are signed so an out-of-range value can be observed and corrected
/// by [`CombatantState::enforce_invariants`] instead of silently wrapping.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatantState {
    pub health: i64,
    pub max_health: i64,
    pub secondary_armor: i64,
    pub max_secondary_armor: i64,
    /// Temporary pool, starts empty at every encounter.
    pub guard: i64,
    pub speed: u32,
    pub status: StatusLedger,
}

impl CombatantState {
    /// Creates a combatant at full health and armor with no guard.
    pub fn new(max_health: u32, max_secondary_armor: u32, speed: u32) -> Self {
        Self {
            health: i64::from(max_health),
            max_health: i64::from(max_health),
            secondary_armor: i64::from(max_secondary_armor),
            max_secondary_armor: i64::from(max_secondary_armor),
            guard: 0,
            speed,
            status: StatusLedger::empty(),
        }
    }

    /// Overrides current health (e.g. carried over from a prior encounter).
    #[must_use]
    pub fn with_health(mut self, health: u32) -> Self {
        self.health = i64::from(health).min(self.max_health);
        self
    }

    #[must_use]
    pub fn with_status(mut self, status: StatusLedger) -> Self {
        self.status = status;
        self
    }

    pub fn is_defeated(&self) -> bool {
        self.health <= 0
    }

    /// Guard as an unsigned amount for the allocator.
    pub fn guard_amount(&self) -> u32 {
        clamp_to_u32(self.guard)
    }

    /// Secondary armor as seen by the allocator (may be ≤ 0 when broken).
    pub fn secondary_armor_amount(&self) -> i64 {
        self.secondary_armor
    }

    /// Subtracts an allocation from the pools.
    pub fn take(&mut self, allocation: &DamageAllocation) {
        self.guard -= i64::from(allocation.guard_damage);
        self.secondary_armor -= i64::from(allocation.secondary_armor_damage);
        self.health -= i64::from(allocation.health_damage);
    }

    /// Direct health loss that bypasses guard and armor (periodic damage).
    pub fn lose_health(&mut self, amount: u32) {
        self.health -= i64::from(amount);
    }

    /// Heals up to `max_health`; returns the amount actually restored.
    pub fn heal(&mut self, amount: u32) -> u32 {
        let before = self.health;
        self.health = (self.health + i64::from(amount)).min(self.max_health.max(before));
        clamp_to_u32(self.health - before)
    }

    pub fn gain_guard(&mut self, amount: u32) {
        self.guard += i64::from(amount);
    }

    /// Clamps every pool into range, reporting each correction.
    ///
    /// Health may legitimately reach zero or below through defeat; only the
    /// upper bound and negative guard/armor are treated as violations, while
    /// negative health is clamped to zero silently.
    pub fn enforce_invariants(&mut self) -> Vec<InvariantViolation> {
        let mut violations = Vec::new();

        if self.health < 0 {
            self.health = 0;
        }
        if self.health > self.max_health {
            violations.push(InvariantViolation {
                pool: Pool::Health,
                observed: self.health,
                clamped: self.max_health,
            });
            self.health = self.max_health;
        }
        if self.guard < 0 {
            violations.push(InvariantViolation {
                pool: Pool::Guard,
                observed: self.guard,
                clamped: 0,
            });
            self.guard = 0;
        }
        if self.secondary_armor < 0 {
            violations.push(InvariantViolation {
                pool: Pool::SecondaryArmor,
                observed: self.secondary_armor,
                clamped: 0,
            });
            self.secondary_armor = 0;
        }

        violations
    }
}

pub(crate) fn clamp_to_u32(value: i64) -> u32 {
    u32::try_from(value.max(0)).unwrap_or(u32::MAX)
}
