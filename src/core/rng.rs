// Copyright @yucwang 2026

use crate::math::constants::Float;

#[derive(Debug, Clone)]
pub struct LcgRng {
    state: u64,
}

impl LcgRng {
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    /// Seed taken from the wall clock, for runs without an explicit seed.
    pub fn from_entropy() -> Self {
        let seed = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0);
        Self::new(seed)
    }

    pub fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_mul(6364136223846793005).wrapping_add(1);
        (self.state >> 32) as u32
    }

    /// Uniform sample in [0, 1).
    pub fn next_f32(&mut self) -> Float {
        // 24 mantissa bits keep the result strictly below 1.0.
        ((self.next_u32() >> 8) as Float) / ((1u32 << 24) as Float)
    }

    /// Uniform sample in [lo, hi).
    pub fn next_range(&mut self, lo: Float, hi: Float) -> Float {
        lo + (hi - lo) * self.next_f32()
    }
}
