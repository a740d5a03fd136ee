use crate::dsp::one_pole::ms_coef;

/*
Attack/Release Follower
=======================

The envelopes in the render core are not ADSR state machines. They follow a
target level (a gate, or a gate multiplied by a gain) with two one-pole
slopes:

    target > level   → move with the attack coefficient
    target <= level  → move with the release coefficient

  Level
    1.0 ┐      ╭──────────╮
        │     ╱            ╲
        │    ╱              ╲__
    0.0 └───╯                  ╲___________→ Time
         gate on          gate off

Because the follower always starts from its current level, a gate flip
mid-attack or mid-release never produces a discontinuity. Coefficients are
supplied by the caller (computed once per quantum), so the same envelope
can be retimed between quanta without resetting.
*/

/// Per-quantum coefficients for an [`AttackRelease`] follower.
#[derive(Debug, Clone, Copy)]
pub struct ArCoefs {
    pub attack: f32,
    pub release: f32,
}

impl ArCoefs {
    pub fn from_ms(sample_rate: f32, attack_ms: f32, release_ms: f32) -> Self {
        Self {
            attack: ms_coef(sample_rate, attack_ms),
            release: ms_coef(sample_rate, release_ms),
        }
    }
}

/// One-pole envelope follower with separate attack and release slopes.
#[derive(Debug, Clone, Copy, Default)]
pub struct AttackRelease {
    level: f32,
}

impl AttackRelease {
    pub fn new() -> Self {
        Self { level: 0.0 }
    }

    /// Advance one sample toward `target`.
    #[inline]
    pub fn next_sample(&mut self, target: f32, coefs: ArCoefs) -> f32 {
        let coef = if target > self.level {
            coefs.attack
        } else {
            coefs.release
        };
        self.level += coef * (target - self.level);
        // flush denormals on long releases
        if self.level.abs() < 1.0e-9 {
            self.level = 0.0;
        }
        self.level
    }

    pub fn level(&self) -> f32 {
        self.level
    }

    /// Returns true while the envelope still contributes audible output.
    pub fn is_active(&self) -> bool {
        self.level > 1.0e-5
    }

    pub fn reset(&mut self) {
        self.level = 0.0;
    }
}

/// Exponential decay for one-shot transients (pluck pulses, ducking).
#[derive(Debug, Clone, Copy, Default)]
pub struct Decay {
    level: f32,
}

impl Decay {
    pub fn trigger(&mut self, level: f32) {
        self.level = self.level.max(level);
    }

    /// `mult` is the per-sample multiplier, `exp(-1 / (sr * tau))`.
    #[inline]
    pub fn next_sample(&mut self, mult: f32) -> f32 {
        let out = self.level;
        self.level *= mult;
        if self.level < 1.0e-6 {
            self.level = 0.0;
        }
        out
    }

    pub fn level(&self) -> f32 {
        self.level
    }

    pub fn reset(&mut self) {
        self.level = 0.0;
    }
}

/// Per-sample multiplier for a [`Decay`] with time constant `tau_ms`.
#[inline]
pub fn decay_mult(sample_rate: f32, tau_ms: f32) -> f32 {
    (-1.0 / (sample_rate * (tau_ms / 1000.0).max(1.0e-5))).exp()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_RATE: f32 = 48_000.0;

    #[test]
    fn attack_is_faster_than_release() {
        let coefs = ArCoefs::from_ms(SAMPLE_RATE, 5.0, 200.0);
        let mut env = AttackRelease::new();

        let mut rise_samples = 0;
        while env.next_sample(1.0, coefs) < 0.9 {
            rise_samples += 1;
        }

        let mut fall_samples = 0;
        while env.next_sample(0.0, coefs) > 0.1 {
            fall_samples += 1;
        }

        assert!(
            fall_samples > rise_samples * 10,
            "release should be much slower: rise={} fall={}",
            rise_samples,
            fall_samples
        );
    }

    #[test]
    fn gate_flip_mid_attack_is_continuous() {
        let coefs = ArCoefs::from_ms(SAMPLE_RATE, 20.0, 20.0);
        let mut env = AttackRelease::new();
        for _ in 0..200 {
            env.next_sample(1.0, coefs);
        }
        let before = env.level();
        let after = env.next_sample(0.0, coefs);
        assert!((before - after).abs() < 0.01, "no jump on gate flip");
    }

    #[test]
    fn decay_reaches_zero() {
        let mult = decay_mult(SAMPLE_RATE, 10.0);
        let mut d = Decay::default();
        d.trigger(1.0);
        for _ in 0..48_000 {
            d.next_sample(mult);
        }
        assert_eq!(d.level(), 0.0);
    }
}
