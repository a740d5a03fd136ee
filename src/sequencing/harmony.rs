//! Chord timeline.
//!
//! A fixed progression walked bar by bar. Each entry lasts a whole number of
//! bars; the cursor moves at most one entry per bar boundary and wraps at the
//! end, so the index never skips or rewinds.

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Chord {
    pub name: &'static str,
    pub bars: u64,
    /// Drone / bass root in Hz
    pub low_pitch: f32,
    /// Pad root in Hz
    pub high_pitch: f32,
    /// Lead target in Hz
    pub lead_pitch: f32,
}

/// i - VI - III - VII in A minor.
pub static PROGRESSION: [Chord; 4] = [
    Chord {
        name: "Am",
        bars: 4,
        low_pitch: 55.00,
        high_pitch: 220.00,
        lead_pitch: 329.63,
    },
    Chord {
        name: "F",
        bars: 4,
        low_pitch: 43.65,
        high_pitch: 174.61,
        lead_pitch: 523.25,
    },
    Chord {
        name: "C",
        bars: 2,
        low_pitch: 65.41,
        high_pitch: 261.63,
        lead_pitch: 392.00,
    },
    Chord {
        name: "G",
        bars: 2,
        low_pitch: 49.00,
        high_pitch: 196.00,
        lead_pitch: 493.88,
    },
];

/// Scale-degree ratios used by melody plucks over the current chord root.
pub const MELODY_RATIOS: [f32; 6] = [1.0, 1.189_207, 1.334_84, 1.498_307, 1.781_797, 2.0];

/// Cursor over [`PROGRESSION`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HarmonyCursor {
    pub index: usize,
    pub bar_start: u64,
}

impl Default for HarmonyCursor {
    fn default() -> Self {
        Self {
            index: 0,
            bar_start: 0,
        }
    }
}

impl HarmonyCursor {
    pub fn chord(&self) -> &'static Chord {
        &PROGRESSION[self.index % PROGRESSION.len()]
    }

    /// Called once per bar boundary. Returns true when the chord changed.
    pub fn on_bar(&mut self, bar: u64) -> bool {
        if bar >= self.bar_start + self.chord().bars {
            self.index = (self.index + 1) % PROGRESSION.len();
            self.bar_start = bar;
            true
        } else {
            false
        }
    }
}
