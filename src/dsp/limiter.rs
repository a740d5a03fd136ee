//! Stereo peak limiter for the master bus.
//!
//! Gain drops instantly to keep the peak at the ceiling and recovers with a
//! one-pole release. Both channels share one gain so the stereo image does
//! not wander when one side peaks.

use crate::dsp::distortion::hard_clip;
use crate::dsp::one_pole::ms_coef;

pub struct Limiter {
    ceiling: f32,
    gain: f32,
    release_coef: f32,
}

impl Limiter {
    pub fn new(sample_rate: f32, ceiling: f32, release_ms: f32) -> Self {
        Self {
            ceiling: ceiling.clamp(0.1, 1.0),
            gain: 1.0,
            release_coef: ms_coef(sample_rate, release_ms),
        }
    }

    #[inline]
    pub fn process(&mut self, left: f32, right: f32) -> (f32, f32) {
        let peak = left.abs().max(right.abs());
        let needed = if peak > self.ceiling {
            self.ceiling / peak
        } else {
            1.0
        };

        if needed < self.gain {
            self.gain = needed;
        } else {
            self.gain += self.release_coef * (needed - self.gain);
        }

        (
            hard_clip(left * self.gain, self.ceiling),
            hard_clip(right * self.gain, self.ceiling),
        )
    }

    /// Current gain reduction factor (1.0 = untouched).
    pub fn gain(&self) -> f32 {
        self.gain
    }

    pub fn reset(&mut self) {
        self.gain = 1.0;
    }
}
