//! Seeded xorshift32 generator.
//!
//! This is the only source of randomness for arrangement decisions. Nothing
//! else (wall clock, OS entropy) is allowed to influence what plays, so a
//! seed fully determines an arrangement.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Xorshift32 {
    state: u32,
}

impl Xorshift32 {
    /// A zero seed would lock the generator at zero; it is replaced by 1.
    pub fn new(seed: u32) -> Self {
        Self {
            state: if seed == 0 { 1 } else { seed },
        }
    }

    #[inline]
    pub fn next_u32(&mut self) -> u32 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.state = x;
        x
    }

    /// `(x mod 1_000_000) / 1_000_000`, a value in [0, 1).
    #[inline]
    pub fn rand01(&mut self) -> f32 {
        (self.next_u32() % 1_000_000) as f32 / 1_000_000.0
    }

    /// Uniform value in [-1, 1).
    #[inline]
    pub fn next_bipolar(&mut self) -> f32 {
        self.rand01() * 2.0 - 1.0
    }

    /// Integer in `lo..=hi`.
    pub fn range_inclusive(&mut self, lo: u64, hi: u64) -> u64 {
        if hi <= lo {
            return lo;
        }
        let span = hi - lo + 1;
        lo + ((self.rand01() * span as f32) as u64).min(span - 1)
    }

    /// True with probability `p`.
    pub fn chance(&mut self, p: f32) -> bool {
        self.rand01() < p
    }

    /// Index picked proportionally to `weights`. Falls back to 0 when all
    /// weights are zero.
    pub fn weighted_index(&mut self, weights: &[f32]) -> usize {
        let total: f32 = weights.iter().map(|w| w.max(0.0)).sum();
        if total <= 0.0 {
            return 0;
        }
        let mut r = self.rand01() * total;
        for (i, w) in weights.iter().enumerate() {
            let w = w.max(0.0);
            if r < w {
                return i;
            }
            r -= w;
        }
        weights.len().saturating_sub(1)
    }

    pub fn state(&self) -> u32 {
        self.state
    }
}
