//! Visualization feeds: activity meters, waveform and spectrum snapshots.
//!
//! All of these run off the render thread. They only read what the renderer
//! pushed into its best-effort rings.

pub mod activity;
pub mod spectrum;
pub mod waveform;

pub use activity::ActivityMeters;
pub use spectrum::{SpectrumAnalyzer, SPECTRUM_BINS};
pub use waveform::WaveformTap;
