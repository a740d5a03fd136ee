//! Circular delay lines.
//!
//! Buffers are sized once, from the sample rate and the longest delay the
//! engine will ever ask for. Reads past that length are clamped, never
//! reallocated, so these are safe to own on the render thread.

/// Mono circular buffer with fractional read.
pub struct DelayLine {
    buffer: Vec<f32>,
    write_pos: usize,
}

impl DelayLine {
    /// Allocates `max_delay_samples + 2` slots up front.
    pub fn new(max_delay_samples: usize) -> Self {
        Self {
            buffer: vec![0.0; max_delay_samples.max(1) + 2],
            write_pos: 0,
        }
    }

    pub fn max_delay(&self) -> usize {
        self.buffer.len() - 2
    }

    /// Read `delay` samples behind the write head with linear interpolation.
    #[inline]
    pub fn read(&self, delay: f32) -> f32 {
        let len = self.buffer.len();
        let delay = delay.clamp(1.0, self.max_delay() as f32);
        let whole = delay.floor();
        let frac = delay - whole;
        let i0 = (self.write_pos + len - whole as usize) % len;
        let i1 = (i0 + len - 1) % len;
        self.buffer[i0] * (1.0 - frac) + self.buffer[i1] * frac
    }

    #[inline]
    pub fn write(&mut self, sample: f32) {
        self.buffer[self.write_pos] = sample;
        self.write_pos = (self.write_pos + 1) % self.buffer.len();
    }

    pub fn reset(&mut self) {
        self.buffer.fill(0.0);
        self.write_pos = 0;
    }
}

/// Stereo feedback delay with wet/dry mix.
///
/// The right channel reads at three quarters of the left offset so repeats
/// spread across the stereo field instead of stacking in the centre.
pub struct StereoDelay {
    left: DelayLine,
    right: DelayLine,
}

/// Per-quantum settings for [`StereoDelay`].
#[derive(Debug, Clone, Copy)]
pub struct DelaySettings {
    /// Left read offset in samples (`delay_time * sample_rate`)
    pub delay_samples: f32,
    pub feedback: f32,
    pub mix: f32,
}

impl StereoDelay {
    pub fn new(sample_rate: f32, max_delay_secs: f32) -> Self {
        let max = (sample_rate * max_delay_secs).ceil() as usize;
        Self {
            left: DelayLine::new(max),
            right: DelayLine::new(max),
        }
    }

    #[inline]
    pub fn process(&mut self, input: f32, settings: DelaySettings) -> (f32, f32) {
        let feedback = settings.feedback.clamp(0.0, 0.95);
        let mix = settings.mix.clamp(0.0, 1.0);

        let wet_l = self.left.read(settings.delay_samples);
        let wet_r = self.right.read(settings.delay_samples * 0.75);

        self.left.write(input + wet_l * feedback);
        self.right.write(input + wet_r * feedback);

        let dry = 1.0 - mix;
        (input * dry + wet_l * mix, input * dry + wet_r * mix)
    }

    pub fn reset(&mut self) {
        self.left.reset();
        self.right.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_impulse_returns_after_delay() {
        let mut line = DelayLine::new(64);
        line.write(1.0);
        for _ in 0..9 {
            line.write(0.0);
        }
        // impulse was written 10 samples ago
        assert!((line.read(10.0) - 1.0).abs() < 1e-6);
        assert!(line.read(9.0).abs() < 1e-6);
    }

    #[test]
    fn test_read_is_clamped_to_capacity() {
        let mut line = DelayLine::new(16);
        for _ in 0..100 {
            line.write(0.5);
        }
        assert!((line.read(10_000.0) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_feedback_decays() {
        let sr = 1_000.0;
        let mut delay = StereoDelay::new(sr, 0.1);
        let settings = DelaySettings {
            delay_samples: 20.0,
            feedback: 0.5,
            mix: 1.0,
        };

        delay.process(1.0, settings);
        let mut echoes = Vec::new();
        for _ in 0..100 {
            let (l, _) = delay.process(0.0, settings);
            if l.abs() > 1e-6 {
                echoes.push(l);
            }
        }
        assert!(echoes.len() >= 3, "expected repeating echoes");
        assert!(echoes.windows(2).all(|w| w[1] < w[0]), "echoes must decay");
    }

    #[test]
    fn test_dry_signal_passes_at_zero_mix() {
        let mut delay = StereoDelay::new(48_000.0, 0.5);
        let settings = DelaySettings {
            delay_samples: 100.0,
            feedback: 0.9,
            mix: 0.0,
        };
        let (l, r) = delay.process(0.3, settings);
        assert_eq!((l, r), (0.3, 0.3));
    }
}
