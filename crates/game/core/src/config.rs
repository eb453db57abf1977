/// Combat balance constants and tunable parameters.
///
/// Values expressed as percentages are whole numbers (`150` = ×1.5).
/// Tunables can be overridden from `combat.toml` through the content loaders;
/// any field missing from the file falls back to the default below.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CombatConfig {
    /// Critical rate (%) granted to any attacker holding a critical-chance source.
    pub base_critical_rate: u32,
    /// Upper bound (%) on the critical rate after all bonuses.
    pub max_critical_rate: u32,
    /// Critical damage multiplier (%) before buff bonuses.
    pub base_critical_multiplier: u32,

    /// Share (%) of guard-absorbed damage that splashes onto health while
    /// secondary armor is broken.
    pub broken_armor_splash_percent: u32,

    /// Speed differential that grants the attack-power bonus.
    pub minor_speed_threshold: u32,
    /// Speed differential that additionally grants the critical-chance bonus.
    pub major_speed_threshold: u32,
    /// Flat base-power bonus awarded to the faster actor.
    pub initiative_attack_bonus: u32,
    /// Critical-chance bonus (%) awarded at the major tier.
    pub initiative_critical_bonus: u32,

    /// Action energy refilled at the start of every player phase.
    pub energy_per_turn: u32,
    /// Energy removed while the player is slowed.
    pub slow_energy_penalty: u32,
    /// Cards drawn at the start of every player phase.
    pub cards_per_draw: usize,

    /// Allowed deviation of a pooled band's weight sum from 1.0 before an
    /// authoring warning is emitted.
    pub weight_tolerance: f64,
}

impl CombatConfig {
    // ===== compile-time constants used as type parameters =====
    /// Maximum number of cards held at once.
    pub const MAX_HAND_SIZE: usize = 10;
    /// Upper bound on hits for a single action.
    pub const MAX_HITS: u32 = 16;
    /// Denominator for health-fraction bounds (per-mille).
    pub const HEALTH_FRACTION_SCALE: u32 = 1000;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_BASE_CRITICAL_RATE: u32 = 10;
    pub const DEFAULT_MAX_CRITICAL_RATE: u32 = 80;
    pub const DEFAULT_BASE_CRITICAL_MULTIPLIER: u32 = 150;
    pub const DEFAULT_BROKEN_ARMOR_SPLASH_PERCENT: u32 = 75;
    pub const DEFAULT_MINOR_SPEED_THRESHOLD: u32 = 30;
    pub const DEFAULT_MAJOR_SPEED_THRESHOLD: u32 = 50;
    pub const DEFAULT_INITIATIVE_ATTACK_BONUS: u32 = 2;
    pub const DEFAULT_INITIATIVE_CRITICAL_BONUS: u32 = 15;
    pub const DEFAULT_ENERGY_PER_TURN: u32 = 3;
    pub const DEFAULT_SLOW_ENERGY_PENALTY: u32 = 1;
    pub const DEFAULT_CARDS_PER_DRAW: usize = 5;
    pub const DEFAULT_WEIGHT_TOLERANCE: f64 = 0.05;

    pub fn new() -> Self {
        Self {
            base_critical_rate: Self::DEFAULT_BASE_CRITICAL_RATE,
            max_critical_rate: Self::DEFAULT_MAX_CRITICAL_RATE,
            base_critical_multiplier: Self::DEFAULT_BASE_CRITICAL_MULTIPLIER,
            broken_armor_splash_percent: Self::DEFAULT_BROKEN_ARMOR_SPLASH_PERCENT,
            minor_speed_threshold: Self::DEFAULT_MINOR_SPEED_THRESHOLD,
            major_speed_threshold: Self::DEFAULT_MAJOR_SPEED_THRESHOLD,
            initiative_attack_bonus: Self::DEFAULT_INITIATIVE_ATTACK_BONUS,
            initiative_critical_bonus: Self::DEFAULT_INITIATIVE_CRITICAL_BONUS,
            energy_per_turn: Self::DEFAULT_ENERGY_PER_TURN,
            slow_energy_penalty: Self::DEFAULT_SLOW_ENERGY_PENALTY,
            cards_per_draw: Self::DEFAULT_CARDS_PER_DRAW,
            weight_tolerance: Self::DEFAULT_WEIGHT_TOLERANCE,
        }
    }
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self::new()
    }
}
