//! Low-level DSP primitives used by the render core.
//!
//! These components are allocation-free after construction and realtime-safe,
//! making them safe to embed directly inside render-thread state. They stay
//! focused on the signal-processing math; the synth module layers voices and
//! parameter smoothing on top.

/// Circular delay lines and the stereo feedback delay.
pub mod delay;
/// Waveshaping curves (soft clip, tanh, asymmetric stages).
pub mod distortion;
/// Attack/release followers and one-shot decays.
pub mod envelope;
/// Sine LFO for pitch and detune movement.
pub mod lfo;
/// Master-bus peak limiter.
pub mod limiter;
/// One-pole filters and smoothing coefficients.
pub mod one_pole;
/// Phase-accumulator oscillators, polyBLEP saw, noise.
pub mod oscillator;
/// Schroeder reverb used as the percussion send bus.
pub mod reverb;
/// State-variable filter with multiple responses.
pub mod filter;

pub use envelope::{ArCoefs, AttackRelease};
pub use one_pole::OnePole;
