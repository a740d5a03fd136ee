//! Low Frequency Oscillator.

/*
An LFO is an oscillator below the audible range (roughly 0.01 - 20 Hz) whose
output moves a parameter rather than reaching the speakers.

    0.01 - 0.1 Hz   slow drift, evolving beds
    0.1 - 0.5 Hz    chorus-rate detune movement (pad bank)
    2 - 7 Hz        vibrato

The render core runs one free-running sine LFO for the drone pitch wobble and
one slow LFO per pad oscillator for chorus detune. They are never reset on
note events, so the movement stays continuous across chord changes.

Output is bipolar (-1..1); callers scale it by an amount in their own units.
*/

use crate::dsp::oscillator::{sine, Phasor};

#[derive(Debug, Clone, Copy, Default)]
pub struct Lfo {
    phasor: Phasor,
}

impl Lfo {
    pub fn with_phase(phase: f32) -> Self {
        Self {
            phasor: Phasor::new(phase),
        }
    }

    #[inline]
    pub fn next_sample(&mut self, freq: f32, sample_rate: f32) -> f32 {
        let (phase, _) = self.phasor.tick(freq.max(0.0), sample_rate);
        sine(phase)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lfo_output_range() {
        let mut lfo = Lfo::default();
        for _ in 0..48_000 {
            let s = lfo.next_sample(5.0, 48_000.0);
            assert!((-1.0..=1.0).contains(&s), "lfo sample {} out of range", s);
        }
    }

    #[test]
    fn test_lfo_period() {
        // a 1 Hz LFO at 1 kHz returns to the same phase after 1000 samples
        let mut lfo = Lfo::with_phase(0.1);
        let first = lfo.next_sample(1.0, 1_000.0);
        for _ in 0..999 {
            lfo.next_sample(1.0, 1_000.0);
        }
        let again = lfo.next_sample(1.0, 1_000.0);
        assert!((first - again).abs() < 1e-3, "{} vs {}", first, again);
    }
}
