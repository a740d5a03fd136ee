//! One-pole filters and parameter smoothers.

/*
One-Pole Filter
===============

The simplest recursive filter: each output moves a fixed fraction of the way
from the previous output toward the input.

    y[n] = y[n-1] + a * (x[n] - y[n-1])

With a = 1 the input passes unchanged; as a approaches 0 the output barely
moves. The same structure serves two jobs in this crate:

  tone shaping      a derived from a cutoff in Hz (6 dB/octave lowpass)
  de-clicking       a derived from a time constant in seconds, so a
                    parameter jump becomes an exponential glide

Coefficient from a time constant
--------------------------------

For a time constant tau (seconds) at sample rate sr:

    a = 1 - exp(-1 / (sr * tau))

After tau seconds the output has covered ~63% of a step. Coefficients are
computed once per render quantum and reused for every sample in it, so two
branches that smooth the same parameter always agree on the slope.

Coefficient from a cutoff
-------------------------

    a = 1 - exp(-2π * fc / sr)
*/

use std::f32::consts::TAU;

/// Smoothing coefficient for a time constant given in seconds.
#[inline]
pub fn time_coef(sample_rate: f32, tau_secs: f32) -> f32 {
    let tau = tau_secs.max(1.0e-5);
    1.0 - (-1.0 / (sample_rate * tau)).exp()
}

/// Smoothing coefficient for a time constant given in milliseconds.
#[inline]
pub fn ms_coef(sample_rate: f32, tau_ms: f32) -> f32 {
    time_coef(sample_rate, tau_ms / 1000.0)
}

/// Lowpass coefficient for a cutoff frequency in Hz.
#[inline]
pub fn cutoff_coef(sample_rate: f32, cutoff_hz: f32) -> f32 {
    let fc = cutoff_hz.clamp(1.0, sample_rate * 0.49);
    1.0 - (-TAU * fc / sample_rate).exp()
}

/// First-order lowpass. Holds only its previous output.
#[derive(Debug, Clone, Copy, Default)]
pub struct OnePole {
    state: f32,
}

impl OnePole {
    pub fn new(initial: f32) -> Self {
        Self { state: initial }
    }

    #[inline]
    pub fn process(&mut self, input: f32, coef: f32) -> f32 {
        self.state += coef * (input - self.state);
        self.state
    }

    /// Highpass output: input minus the lowpassed signal.
    #[inline]
    pub fn process_highpass(&mut self, input: f32, coef: f32) -> f32 {
        input - self.process(input, coef)
    }

    pub fn value(&self) -> f32 {
        self.state
    }

    pub fn reset(&mut self, value: f32) {
        self.state = value;
    }
}
