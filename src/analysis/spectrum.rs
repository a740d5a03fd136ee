//! FFT snapshot of the output with log-spaced bins.

use rustfft::{num_complex::Complex, Fft, FftPlanner};
use std::sync::Arc;

/// Number of log-spaced display bins
pub const SPECTRUM_BINS: usize = 48;
const FLOOR_DB: f64 = -120.0;

pub struct SpectrumAnalyzer {
    /// Hann window coefficients
    window: Vec<f32>,
    /// Frequency of each display bin (Hz)
    freq_bins: Vec<f64>,
    /// FFT bin index for each display bin
    bin_indices: Vec<usize>,
    fft: Arc<dyn Fft<f32>>,
    scratch: Vec<Complex<f32>>,
    /// (frequency_hz, magnitude_db)
    spectrum: Vec<(f64, f64)>,
}

impl SpectrumAnalyzer {
    /// `buffer_len` is the FFT size; [`update`](Self::update) ignores
    /// buffers of any other length.
    pub fn new(buffer_len: usize, sample_rate: f32) -> Self {
        let buffer_len = buffer_len.max(2);
        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(buffer_len);

        let denom = (buffer_len - 1) as f32;
        let window: Vec<f32> = (0..buffer_len)
            .map(|i| 0.5 * (1.0 - (std::f32::consts::TAU * i as f32 / denom).cos()))
            .collect();

        // 20 Hz to Nyquist (capped at 20 kHz)
        let max_freq = (sample_rate / 2.0).clamp(1.0, 20_000.0) as f64;
        let min_freq = 20.0f64.min(max_freq);
        let ratio = max_freq / min_freq;
        let half = buffer_len / 2;

        let mut freq_bins = Vec::with_capacity(SPECTRUM_BINS);
        let mut bin_indices = Vec::with_capacity(SPECTRUM_BINS);
        for i in 0..SPECTRUM_BINS {
            let t = i as f64 / (SPECTRUM_BINS - 1) as f64;
            let freq = min_freq * ratio.powf(t);
            let index = ((freq * buffer_len as f64 / sample_rate as f64).round() as usize)
                .min(half - 1);
            freq_bins.push(freq);
            bin_indices.push(index);
        }

        let spectrum = freq_bins.iter().map(|&f| (f, FLOOR_DB)).collect();
        Self {
            window,
            freq_bins,
            bin_indices,
            fft,
            scratch: vec![Complex::new(0.0, 0.0); buffer_len],
            spectrum,
        }
    }

    pub fn len(&self) -> usize {
        self.window.len()
    }

    pub fn is_empty(&self) -> bool {
        self.window.is_empty()
    }

    pub fn update(&mut self, buffer: &[f32]) {
        if buffer.len() != self.window.len() {
            return;
        }
        for (i, sample) in buffer.iter().enumerate() {
            self.scratch[i] = Complex::new(*sample * self.window[i], 0.0);
        }
        self.fft.process(&mut self.scratch);

        for (i, &idx) in self.bin_indices.iter().enumerate() {
            let bin = self.scratch[idx];
            let power = (bin.re * bin.re + bin.im * bin.im).max(1e-12);
            self.spectrum[i] = (self.freq_bins[i], 10.0 * (power as f64).log10());
        }
    }

    pub fn data(&self) -> &[(f64, f64)] {
        &self.spectrum
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sine_peaks_near_its_frequency() {
        let sr = 48_000.0;
        let n = 2_048;
        let mut analyzer = SpectrumAnalyzer::new(n, sr);
        let tone: Vec<f32> = (0..n)
            .map(|i| (std::f32::consts::TAU * 1_000.0 * i as f32 / sr).sin())
            .collect();
        analyzer.update(&tone);
        let (peak_freq, _) = analyzer
            .data()
            .iter()
            .copied()
            .fold((0.0, f64::MIN), |best, bin| if bin.1 > best.1 { bin } else { best });
        assert!((700.0..1_400.0).contains(&peak_freq), "peak at {}", peak_freq);
    }

    #[test]
    fn wrong_length_is_ignored() {
        let mut analyzer = SpectrumAnalyzer::new(1_024, 48_000.0);
        analyzer.update(&[1.0; 10]);
        assert!(analyzer.data().iter().all(|(_, db)| *db == FLOOR_DB));
    }
}
