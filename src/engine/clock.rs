//! Time sources.
//!
//! Musical time is the audio clock: frames rendered so far divided by the
//! sample rate, published by the render thread. The scheduler reads it but
//! never advances it, and never consults the wall clock.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct AudioClock {
    frames: Arc<AtomicU64>,
    sample_rate: f64,
}

impl AudioClock {
    pub fn new(sample_rate: f32) -> Self {
        Self {
            frames: Arc::new(AtomicU64::new(0)),
            sample_rate: sample_rate.max(1.0) as f64,
        }
    }

    /// Seconds of audio rendered so far.
    pub fn now(&self) -> f64 {
        self.frames() as f64 / self.sample_rate
    }

    pub fn frames(&self) -> u64 {
        self.frames.load(Ordering::Acquire)
    }

    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    /// Render side only.
    pub fn advance(&self, frames: u64) {
        self.frames.fetch_add(frames, Ordering::Release);
    }

    pub fn seconds_to_frame(&self, seconds: f64) -> u64 {
        (seconds.max(0.0) * self.sample_rate).round() as u64
    }
}

/// Issues strictly increasing trigger times for bursty discrete input.
///
/// Each time is `max(now, previous + epsilon)`, so two triggers from the
/// same source never share or swap timestamps.
#[derive(Debug, Clone)]
pub struct MonotonicClock {
    last: Option<f64>,
    epsilon: f64,
}

impl MonotonicClock {
    pub fn new(epsilon_secs: f64) -> Self {
        Self {
            last: None,
            epsilon: epsilon_secs.max(0.0),
        }
    }

    pub fn next(&mut self, now: f64) -> f64 {
        let time = match self.last {
            Some(last) => now.max(last + self.epsilon),
            None => now,
        };
        self.last = Some(time);
        time
    }

    pub fn reset(&mut self) {
        self.last = None;
    }
}
