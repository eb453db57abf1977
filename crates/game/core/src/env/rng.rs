//! Deterministic roll source for criticals, pooled selection and shuffles.
//!
//! Every random decision in an encounter is derived from the encounter seed
//! plus a monotonically increasing nonce, so replaying the same seed with the
//! same plays reproduces the same encounter.

/// RNG oracle for deterministic random number generation.
///
/// Implementations must be deterministic and produce the same values
/// given the same seed.
pub trait RngOracle: Send + Sync {
    /// Generate a random u32 value from a seed.
    fn next_u32(&self, seed: u64) -> u32;

    /// Roll a d100 (1-100 inclusive).
    ///
    /// Used for critical checks: a roll hits when `roll <= rate`.
    fn roll_d100(&self, seed: u64) -> u32 {
        (self.next_u32(seed) % 100) + 1
    }

    /// Uniform index in `0..len`. Returns 0 for an empty range.
    fn index(&self, seed: u64, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        (self.next_u32(seed) as usize) % len
    }

    /// Uniform fraction in `[0, 1)`.
    fn unit(&self, seed: u64) -> f64 {
        f64::from(self.next_u32(seed)) / (f64::from(u32::MAX) + 1.0)
    }
}

/// PCG random number generator (PCG-XSH-RR, 64-bit state, 32-bit output).
#[derive(Clone, Copy, Debug, Default)]
pub struct PcgRng;

impl PcgRng {
    const MULTIPLIER: u64 = 6364136223846793005;
    const INCREMENT: u64 = 1442695040888963407;

    #[inline]
    fn pcg_step(state: u64) -> u64 {
        state
            .wrapping_mul(Self::MULTIPLIER)
            .wrapping_add(Self::INCREMENT)
    }

    #[inline]
    fn pcg_output(state: u64) -> u32 {
        let xorshifted = (((state >> 18) ^ state) >> 27) as u32;
        let rot = (state >> 59) as u32;
        xorshifted.rotate_right(rot)
    }
}

impl RngOracle for PcgRng {
    fn next_u32(&self, seed: u64) -> u32 {
        Self::pcg_output(Self::pcg_step(seed))
    }
}

/// Purpose of a roll, mixed into the seed so independent decisions made in
/// the same step never share a value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u32)]
pub enum RollPurpose {
    Critical = 0,
    EnemySelection = 1,
    Shuffle = 2,
}

/// Compute a deterministic seed from encounter components.
///
/// * `encounter_seed` - Base seed fixed at encounter start
/// * `nonce` - Roll sequence number
/// * `purpose` - Which decision the roll feeds
pub fn compute_seed(encounter_seed: u64, nonce: u64, purpose: RollPurpose) -> u64 {
    let mut hash = encounter_seed;

    hash ^= nonce.wrapping_mul(0x9e3779b97f4a7c15);
    hash ^= (purpose as u64).wrapping_mul(0x517cc1b727220a95);

    // Final avalanche step
    hash ^= hash >> 33;
    hash = hash.wrapping_mul(0xff51afd7ed558ccd);
    hash ^= hash >> 33;

    hash
}

/// Stateful roll source owned by the engine.
///
/// Each call consumes one nonce, so the sequence of rolls depends only on the
/// seed and on the order of decisions.
#[derive(Clone, Debug)]
pub struct Dice<R: RngOracle = PcgRng> {
    rng: R,
    seed: u64,
    nonce: u64,
}

impl Dice<PcgRng> {
    pub fn seeded(seed: u64) -> Self {
        Self::new(PcgRng, seed)
    }
}

impl<R: RngOracle> Dice<R> {
    pub fn new(rng: R, seed: u64) -> Self {
        Self { rng, seed, nonce: 0 }
    }

    fn next_seed(&mut self, purpose: RollPurpose) -> u64 {
        let seed = compute_seed(self.seed, self.nonce, purpose);
        self.nonce += 1;
        seed
    }

    /// Roll a d100 for a critical check.
    pub fn critical_roll(&mut self) -> u32 {
        let seed = self.next_seed(RollPurpose::Critical);
        self.rng.roll_d100(seed)
    }

    /// Fraction in `[0, 1)` for weighted selection.
    pub fn selection_roll(&mut self) -> f64 {
        let seed = self.next_seed(RollPurpose::EnemySelection);
        self.rng.unit(seed)
    }

    /// Index in `0..len` for shuffles.
    pub fn shuffle_index(&mut self, len: usize) -> usize {
        let seed = self.next_seed(RollPurpose::Shuffle);
        self.rng.index(seed, len)
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Number of rolls consumed so far.
    pub fn nonce(&self) -> u64 {
        self.nonce
    }
}
