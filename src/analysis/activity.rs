//! Per-voice activity levels for the meters.
//!
//! The render thread sends one peak per voice per quantum. Meters jump up to
//! a new peak and fall back at a fixed rate.

use rtrb::Consumer;

use crate::synth::message::{Activity, ActivityVoice};

/// Level lost per second of falloff
const FALL_PER_SEC: f32 = 1.8;

#[derive(Debug, Clone, Default)]
pub struct ActivityMeters {
    levels: [f32; ActivityVoice::COUNT],
}

impl ActivityMeters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, activity: Activity) {
        let slot = &mut self.levels[activity.voice.index()];
        *slot = slot.max(activity.level.clamp(0.0, 1.0));
    }

    /// Decay every meter by `dt` seconds, then take in what arrived.
    pub fn update(&mut self, rx: &mut Consumer<Activity>, dt: f32) {
        let fall = FALL_PER_SEC * dt.max(0.0);
        for level in &mut self.levels {
            *level = (*level - fall).max(0.0);
        }
        while let Ok(activity) = rx.pop() {
            self.record(activity);
        }
    }

    pub fn level(&self, voice: ActivityVoice) -> f32 {
        self.levels[voice.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = (ActivityVoice, f32)> + '_ {
        ActivityVoice::ALL.iter().map(|v| (*v, self.levels[v.index()]))
    }
}
