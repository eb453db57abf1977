//! Fixed-point multipliers for the damage pipeline.
//!
//! Multipliers are stored in basis points (`10_000` = ×1.0) so that every
//! percentage used by the rules is represented exactly and the pipeline's
//! floor steps are bit-for-bit reproducible.
//!
//! Chained multipliers are applied in one step by [`scale`], which multiplies
//! the numerators first and divides once, so intermediate products never
//! round.

/// Basis points per ×1.0.
pub const RATIO_SCALE: u64 = 10_000;

/// A non-negative multiplier in basis points.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Ratio(u64);

impl Ratio {
    pub const ZERO: Self = Self(0);
    pub const ONE: Self = Self(RATIO_SCALE);

    /// `percent` as a multiplier (`150` = ×1.5).
    pub const fn from_percent(percent: u32) -> Self {
        Self(percent as u64 * 100)
    }

    /// `1 + percent/100`.
    pub const fn one_plus_percent(percent: u32) -> Self {
        Self(RATIO_SCALE + percent as u64 * 100)
    }

    /// `1 - percent/100`, floored at zero.
    pub const fn one_minus_percent(percent: u32) -> Self {
        Self(RATIO_SCALE.saturating_sub(percent as u64 * 100))
    }

    /// Exact product, rounded down to the nearest basis point.
    pub const fn times(self, other: Ratio) -> Self {
        Self(self.0 * other.0 / RATIO_SCALE)
    }

    /// Shrinks the part of this multiplier above ×1.0 by `percent`.
    ///
    /// A multiplier at or below ×1.0 is returned unchanged.
    pub const fn shrink_excess(self, percent: u32) -> Self {
        if self.0 <= RATIO_SCALE {
            return self;
        }
        let kept = (self.0 - RATIO_SCALE) * (100u64.saturating_sub(percent as u64)) / 100;
        Self(RATIO_SCALE + kept)
    }
}

impl Default for Ratio {
    fn default() -> Self {
        Self::ONE
    }
}

impl core::fmt::Display for Ratio {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "x{}.{:04}", self.0 / RATIO_SCALE, self.0 % RATIO_SCALE)
    }
}

/// Computes `floor(base × r1 × r2 × …)` exactly.
///
/// # Examples
/// ```
/// # use combat_core::stats::ratio::{Ratio, scale};
/// // floor(15 × 1.0 × 0.8) = 12
/// let out = scale(15, &[Ratio::ONE, Ratio::one_minus_percent(20)]);
/// assert_eq!(out, 12);
/// ```
pub fn scale(base: u32, factors: &[Ratio]) -> u32 {
    let mut numerator = u128::from(base);
    let mut denominator = 1u128;
    for factor in factors {
        numerator *= u128::from(factor.0);
        denominator *= u128::from(RATIO_SCALE);
    }
    let value = numerator / denominator;
    u32::try_from(value).unwrap_or(u32::MAX)
}

/// Computes `floor(amount × percent / 100)`.
pub fn percent_of(amount: u32, percent: u32) -> u32 {
    let value = u64::from(amount) * u64::from(percent) / 100;
    u32::try_from(value).unwrap_or(u32::MAX)
}
