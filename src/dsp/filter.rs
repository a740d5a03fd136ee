use std::f32::consts::PI;

/*
| type              | passes          | rejects      |
| ----------------- | --------------- | ------------ |
| low-pass          | below cutoff    | above cutoff |
| high-pass         | above cutoff    | below cutoff |
| band-pass         | around cutoff   | outside      |
| notch / band-stop | outside         | around       |

Topology-preserving (TPT) state-variable filter. All four responses come out
of one pass; the amp drone takes its fixed notch from it.
*/

#[derive(Debug, Clone, Copy)]
pub enum FilterType {
    LowPass,
    HighPass,
    BandPass,
    Notch,
}

pub struct FilterOutputs {
    pub lowpass: f32,
    pub bandpass: f32,
    pub highpass: f32,
    pub notch: f32,
}

/// Pre-warped integrator gain and damping, computed once per quantum.
#[derive(Debug, Clone, Copy)]
pub struct SvfCoefs {
    g: f32,
    k: f32,
    h: f32,
}

impl SvfCoefs {
    /// `resonance` in [0, 1): 0 is Q≈0.5, values near 1 ring strongly.
    pub fn new(sample_rate: f32, cutoff_hz: f32, resonance: f32) -> Self {
        let cutoff = cutoff_hz.clamp(10.0, sample_rate * 0.45);
        let g = (PI * cutoff / sample_rate).tan();
        let k = 2.0 - 2.0 * resonance.clamp(0.0, 0.98);
        let h = 1.0 / (1.0 + g * (g + k));
        Self { g, k, h }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct SVFilter {
    ic1eq: f32, // first integrator memory
    ic2eq: f32, // second integrator memory
    filter_type: FilterType,
}

impl SVFilter {
    pub fn new(filter_type: FilterType) -> Self {
        Self {
            ic1eq: 0.0,
            ic2eq: 0.0,
            filter_type,
        }
    }

    pub fn lowpass() -> Self {
        Self::new(FilterType::LowPass)
    }

    pub fn notch() -> Self {
        Self::new(FilterType::Notch)
    }

    #[inline]
    pub fn next_outputs(&mut self, sample: f32, coefs: SvfCoefs) -> FilterOutputs {
        let v3 = sample - self.ic2eq;
        let v1 = coefs.h * (self.ic1eq + coefs.g * v3);
        let v2 = self.ic2eq + coefs.g * v1;

        self.ic1eq = 2.0 * v1 - self.ic1eq;
        self.ic2eq = 2.0 * v2 - self.ic2eq;

        FilterOutputs {
            lowpass: v2,
            bandpass: v1,
            highpass: sample - coefs.k * v1 - v2,
            notch: sample - coefs.k * v1,
        }
    }

    #[inline]
    pub fn process(&mut self, sample: f32, coefs: SvfCoefs) -> f32 {
        let outputs = self.next_outputs(sample, coefs);
        match self.filter_type {
            FilterType::LowPass => outputs.lowpass,
            FilterType::HighPass => outputs.highpass,
            FilterType::BandPass => outputs.bandpass,
            FilterType::Notch => outputs.notch,
        }
    }

    pub fn render(&mut self, buffer: &mut [f32], coefs: SvfCoefs) {
        for sample in buffer.iter_mut() {
            *sample = self.process(*sample, coefs);
        }
    }

    pub fn reset(&mut self) {
        self.ic1eq = 0.0;
        self.ic2eq = 0.0;
    }
}
