//! Mulberry32: the 32-bit seeded generator behind every layout decision.
//!
//! The stream is cheap (a handful of wrapping multiplies, xors and shifts per
//! draw) and fully determined by its seed, so constructing two generators
//! with the same seed replays the same sequence bit-for-bit.

use rand::{RngCore, SeedableRng};

/// Increment added to the state before every draw.
const GOLDEN_STEP: u32 = 0x6D2B_79F5;

/// 2^32 as `f64`, the divisor that maps a raw `u32` into `[0, 1)`.
const U32_SPAN: f64 = 4_294_967_296.0;

/// Deterministic 32-bit pseudo-random generator.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Mulberry32 {
    state: u32,
}

impl Mulberry32 {
    /// Start a new stream from `seed`.
    pub fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    /// Current internal state. Feeding it back into [`Mulberry32::new`]
    /// resumes the stream from this point.
    pub fn state(&self) -> u32 {
        self.state
    }

    /// Advance the stream and return the raw 32-bit output.
    #[inline]
    pub fn next_raw(&mut self) -> u32 {
        self.state = self.state.wrapping_add(GOLDEN_STEP);
        let s = self.state;
        let mut t = (s ^ (s >> 15)).wrapping_mul(s | 1);
        t ^= t.wrapping_add((t ^ (t >> 7)).wrapping_mul(t | 61));
        t ^ (t >> 14)
    }

    /// Next float, uniformly distributed in `[0, 1)`.
    #[inline]
    pub fn next_f64(&mut self) -> f64 {
        f64::from(self.next_raw()) / U32_SPAN
    }

    /// Next float in `[lo, hi)`.
    #[inline]
    pub fn range(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.next_f64()
    }

    /// Returns `true` with probability `p`.
    #[inline]
    pub fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }

    /// Uniform index in `0..len`. Returns 0 for an empty range.
    pub fn pick_index(&mut self, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        ((self.next_f64() * len as f64) as usize).min(len - 1)
    }
}

impl RngCore for Mulberry32 {
    fn next_u32(&mut self) -> u32 {
        self.next_raw()
    }

    fn next_u64(&mut self) -> u64 {
        let lo = u64::from(self.next_raw());
        let hi = u64::from(self.next_raw());
        (hi << 32) | lo
    }

    fn fill_bytes(&mut self, dst: &mut [u8]) {
        for chunk in dst.chunks_mut(4) {
            let bytes = self.next_raw().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }
}

impl SeedableRng for Mulberry32 {
    type Seed = [u8; 4];

    fn from_seed(seed: Self::Seed) -> Self {
        Self::new(u32::from_le_bytes(seed))
    }

    /// Truncates to the low 32 bits so `seed_from_u64(s)` matches `new(s as u32)`.
    fn seed_from_u64(state: u64) -> Self {
        Self::new(state as u32)
    }
}
