//! Phase-accumulator oscillators and the render-side noise source.
//!
//! Every oscillator here is a plain phase in [0, 1) advanced by
//! `freq / sample_rate` per sample. Waveforms are computed from the phase, so
//! retuning between samples never produces a discontinuity.
//!
//! The sawtooth is band-limited with polyBLEP: the naive ramp is corrected
//! by a two-sample polynomial residual around each wrap, which removes most of
//! the aliasing a hard reset would fold back into the audible band.

use std::f32::consts::TAU;

use crate::sequencing::rng::Xorshift32;

/// Phase accumulator shared by all waveforms.
#[derive(Debug, Clone, Copy, Default)]
pub struct Phasor {
    phase: f32,
}

impl Phasor {
    pub fn new(phase: f32) -> Self {
        Self {
            phase: phase.rem_euclid(1.0),
        }
    }

    /// Returns the phase before advancing, and the increment used.
    #[inline]
    pub fn tick(&mut self, freq: f32, sample_rate: f32) -> (f32, f32) {
        let dt = (freq / sample_rate).clamp(0.0, 0.5);
        let phase = self.phase;
        self.phase += dt;
        if self.phase >= 1.0 {
            self.phase -= 1.0;
        }
        (phase, dt)
    }

    pub fn phase(&self) -> f32 {
        self.phase
    }

    pub fn reset(&mut self, phase: f32) {
        self.phase = phase.rem_euclid(1.0);
    }
}

/// Two-sample polynomial band-limited step residual.
#[inline]
pub fn poly_blep(t: f32, dt: f32) -> f32 {
    if dt <= 0.0 {
        return 0.0;
    }
    if t < dt {
        let x = t / dt;
        x + x - x * x - 1.0
    } else if t > 1.0 - dt {
        let x = (t - 1.0) / dt;
        x * x + x + x + 1.0
    } else {
        0.0
    }
}

#[inline]
pub fn sine(phase: f32) -> f32 {
    (TAU * phase).sin()
}

#[inline]
pub fn triangle(phase: f32) -> f32 {
    1.0 - 4.0 * (phase - 0.5).abs()
}

/// Band-limited sawtooth in [-1, 1].
#[inline]
pub fn saw_blep(phase: f32, dt: f32) -> f32 {
    (2.0 * phase - 1.0) - poly_blep(phase, dt)
}

/// Band-limited sawtooth oscillator.
#[derive(Debug, Clone, Copy, Default)]
pub struct BlepSaw {
    phasor: Phasor,
}

impl BlepSaw {
    pub fn with_phase(phase: f32) -> Self {
        Self {
            phasor: Phasor::new(phase),
        }
    }

    #[inline]
    pub fn next_sample(&mut self, freq: f32, sample_rate: f32) -> f32 {
        let (phase, dt) = self.phasor.tick(freq, sample_rate);
        saw_blep(phase, dt)
    }
}

/// White noise from the render thread's own xorshift stream.
#[derive(Debug, Clone, Copy)]
pub struct Noise {
    rng: Xorshift32,
}

impl Noise {
    pub fn new(seed: u32) -> Self {
        Self {
            rng: Xorshift32::new(seed),
        }
    }

    /// Uniform sample in [-1, 1].
    #[inline]
    pub fn next_sample(&mut self) -> f32 {
        self.rng.next_bipolar()
    }

    /// Uniform value in [0, 1), for render-side probabilistic gates.
    #[inline]
    pub fn next_unit(&mut self) -> f32 {
        self.rng.rand01()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn saw_stays_in_range() {
        let mut saw = BlepSaw::default();
        for _ in 0..48_000 {
            let s = saw.next_sample(3_520.0, 48_000.0);
            assert!((-1.1..=1.1).contains(&s), "saw sample {} out of range", s);
        }
    }

    #[test]
    fn blep_smooths_the_wrap() {
        // at the exact wrap the naive saw jumps by 2; the corrected one less so
        let dt = 0.05;
        let before = saw_blep(1.0 - dt * 0.5, dt);
        let after = saw_blep(dt * 0.5, dt);
        assert!(
            (before - after).abs() < 1.5,
            "blep should soften the discontinuity: {} -> {}",
            before,
            after
        );
    }

    #[test]
    fn triangle_hits_extremes() {
        assert!((triangle(0.0) + 1.0).abs() < 1e-6);
        assert!((triangle(0.5) - 1.0).abs() < 1e-6);
        assert!((triangle(0.25)).abs() < 1e-6);
    }

    #[test]
    fn phasor_wraps() {
        let mut p = Phasor::default();
        for _ in 0..1000 {
            p.tick(440.0, 48_000.0);
            assert!((0.0..1.0).contains(&p.phase()));
        }
    }

    #[test]
    fn noise_is_bipolar() {
        let mut noise = Noise::new(7);
        let (mut min, mut max) = (0.0f32, 0.0f32);
        for _ in 0..10_000 {
            let s = noise.next_sample();
            min = min.min(s);
            max = max.max(s);
        }
        assert!(min < -0.9 && max > 0.9);
    }
}
