//! Seeded sequence generator used by every generation stage.
//!
//! The generator is a 32-bit linear congruential recurrence with the classic
//! Numerical Recipes constants. The recurrence is part of the output contract:
//! any client must reproduce the exact same stream from the same seed.

use rand::{RngCore, SeedableRng};

/// LCG multiplier (`a`).
pub const LCG_MULTIPLIER: u32 = 1_664_525;

/// LCG increment (`c`).
pub const LCG_INCREMENT: u32 = 1_013_904_223;

/// 2^32 as a float, the modulus of the recurrence.
const STATE_SPAN: f64 = 4_294_967_296.0;

/// Deterministic pseudo-random stream.
///
/// Two generators built from the same seed yield bit-identical sequences for
/// any number of calls. The generator never reads ambient entropy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeededRng {
    seed: u32,
    state: u32,
}

impl SeededRng {
    /// Create a generator whose initial state is `seed`.
    pub const fn new(seed: u32) -> Self {
        Self { seed, state: seed }
    }

    /// Seed this generator was created from.
    pub const fn seed(&self) -> u32 {
        self.seed
    }

    /// Derive an independent generator for a nested stage.
    ///
    /// The child seed is computed from this generator's *seed*, not drawn from
    /// its stream, so the child is reproducible regardless of how many values
    /// the parent has produced.
    pub fn derive(&self, offset: u32) -> Self {
        Self::new(crate::seed::sub_seed(self.seed, offset))
    }

    fn step(&mut self) -> u32 {
        self.state = self
            .state
            .wrapping_mul(LCG_MULTIPLIER)
            .wrapping_add(LCG_INCREMENT);
        self.state
    }

    /// Next value in `[0, 1)`.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> f64 {
        f64::from(self.step()) / STATE_SPAN
    }

    /// Uniform integer in `[min, max]` (inclusive). Bounds may be given in
    /// either order.
    pub fn next_int(&mut self, min: i32, max: i32) -> i32 {
        let (lo, hi) = if min <= max { (min, max) } else { (max, min) };
        let span = i64::from(hi) - i64::from(lo) + 1;
        let offset = (self.next() * span as f64).floor() as i64;
        (i64::from(lo) + offset.min(span - 1)) as i32
    }

    /// Uniform index in `[0, len)`. `len` must be non-zero.
    pub fn next_index(&mut self, len: usize) -> usize {
        debug_assert!(len > 0, "next_index on empty range");
        let idx = (self.next() * len as f64).floor() as usize;
        idx.min(len.saturating_sub(1))
    }

    /// Uniform float in `[min, max)`.
    pub fn next_float(&mut self, min: f64, max: f64) -> f64 {
        min + self.next() * (max - min)
    }

    /// Uniform float in `[-magnitude, magnitude)`.
    pub fn next_signed(&mut self, magnitude: f64) -> f64 {
        self.next_float(-magnitude, magnitude)
    }

    /// `true` with probability `p`.
    pub fn chance(&mut self, p: f64) -> bool {
        self.next() < p
    }

    /// Uniform angle in `[0, 2π)`.
    pub fn next_angle(&mut self) -> f64 {
        self.next() * std::f64::consts::TAU
    }

    /// Pick one element. Returns `None` for an empty slice without consuming
    /// a value from the stream.
    pub fn choose<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            return None;
        }
        let idx = self.next_index(items.len());
        items.get(idx)
    }

    /// Fisher–Yates shuffle driven by this stream.
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        for i in (1..items.len()).rev() {
            let j = self.next_int(0, i as i32) as usize;
            items.swap(i, j);
        }
    }
}

/// Lets callers drive `rand` distributions from a territory stream.
impl RngCore for SeededRng {
    fn next_u32(&mut self) -> u32 {
        self.step()
    }

    fn next_u64(&mut self) -> u64 {
        let hi = u64::from(self.step());
        let lo = u64::from(self.step());
        (hi << 32) | lo
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(4) {
            let bytes = self.step().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

impl SeedableRng for SeededRng {
    type Seed = [u8; 4];

    fn from_seed(seed: Self::Seed) -> Self {
        Self::new(u32::from_le_bytes(seed))
    }

    /// Truncates to the low 32 bits so `seed_from_u64(n)` matches `new(n as u32)`.
    fn seed_from_u64(state: u64) -> Self {
        Self::new(state as u32)
    }
}
