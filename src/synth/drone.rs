//! Drone bed: two detuned triangles, a sub sine and a noise floor.
//!
//! Bass notes retune it and kick the sub with a short pulse, which is what
//! gives the bed its rhythmic breathing once the kick stage arrives.

use crate::dsp::envelope::{decay_mult, Decay};
use crate::dsp::one_pole::{cutoff_coef, OnePole};
use crate::dsp::oscillator::{sine, triangle, Noise, Phasor};

const PRIMARY: f32 = 0.45;
const SECONDARY: f32 = 0.3;
const SUB: f32 = 0.6;

/// Per-sample inputs, already smoothed by the core.
#[derive(Debug, Clone, Copy)]
pub struct DroneInput {
    pub freq: f32,
    pub detune: f32,
    pub sub: f32,
    pub noise: f32,
    pub pulse_amt: f32,
    pub tick_amt: f32,
}

#[derive(Debug, Clone)]
pub struct Drone {
    sample_rate: f32,
    primary: Phasor,
    secondary: Phasor,
    sub: Phasor,
    noise: Noise,
    pulse: Decay,
    tick: Decay,
    pulse_mult: f32,
    tick_mult: f32,
    tick_hp: OnePole,
    tick_coef: f32,
}

impl Drone {
    pub fn new(sample_rate: f32) -> Self {
        Self {
            sample_rate,
            primary: Phasor::new(0.0),
            secondary: Phasor::new(0.25),
            sub: Phasor::new(0.0),
            noise: Noise::new(0xd20e),
            pulse: Decay::default(),
            tick: Decay::default(),
            pulse_mult: decay_mult(sample_rate, 180.0),
            tick_mult: decay_mult(sample_rate, 6.0),
            tick_hp: OnePole::new(0.0),
            tick_coef: cutoff_coef(sample_rate, 3_000.0),
        }
    }

    /// Bass note: pulse the sub and click the tick layer.
    pub fn retrigger(&mut self, gain: f32) {
        let gain = gain.clamp(0.0, 1.0);
        self.pulse.trigger(gain);
        self.tick.trigger(gain);
    }

    #[inline]
    pub fn next_sample(&mut self, input: &DroneInput) -> f32 {
        let sr = self.sample_rate;
        let (p1, _) = self.primary.tick(input.freq, sr);
        let (p2, _) = self.secondary.tick(input.freq * (1.0 + input.detune), sr);
        let (ps, _) = self.sub.tick(input.freq * 0.5, sr);
        let n = self.noise.next_sample();

        let pulse = self.pulse.next_sample(self.pulse_mult);
        let tick = self.tick.next_sample(self.tick_mult);
        let click = self.tick_hp.process_highpass(n, self.tick_coef) * tick * input.tick_amt;

        let sub_level = input.sub * SUB * (1.0 - input.pulse_amt + input.pulse_amt * pulse);
        PRIMARY * triangle(p1)
            + SECONDARY * triangle(p2)
            + sub_level * sine(ps)
            + input.noise * n
            + click
    }

    pub fn reset(&mut self) {
        self.pulse.reset();
        self.tick.reset();
        self.tick_hp.reset(0.0);
    }
}
