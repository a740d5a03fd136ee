//! Fixed 16-step pattern tables.
//!
//! Grooves are the rhythmic skeletons the arrangement chooses between. Each
//! one fixes where kicks, snares, rims and bass notes may land; hats are not
//! fixed here but generated per bar by the euclidean generator, with the
//! groove contributing a pulse offset and rotation bias.

pub const STEPS_PER_BAR: usize = 16;

/// Set of active steps in a bar (bit i = step i).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StepMask(pub u32);

impl StepMask {
    pub const EMPTY: StepMask = StepMask(0);

    pub const fn from_steps(steps: &[usize]) -> Self {
        let mut bits = 0u32;
        let mut i = 0;
        while i < steps.len() {
            bits |= 1 << steps[i];
            i += 1;
        }
        StepMask(bits)
    }

    pub fn from_bools(grid: &[bool]) -> Self {
        let bits = grid
            .iter()
            .take(32)
            .enumerate()
            .filter(|(_, &on)| on)
            .fold(0u32, |acc, (i, _)| acc | (1 << i));
        StepMask(bits)
    }

    #[inline]
    pub fn contains(self, step: usize) -> bool {
        step < 32 && self.0 & (1 << step) != 0
    }

    pub fn count(self) -> u32 {
        self.0.count_ones()
    }

    pub fn union(self, other: StepMask) -> StepMask {
        StepMask(self.0 | other.0)
    }
}

/// Quarter-note positions.
pub const QUARTERS: StepMask = StepMask::from_steps(&[0, 4, 8, 12]);
/// Offbeat eighths, where open hats sit.
pub const OFFBEATS: StepMask = StepMask::from_steps(&[2, 6, 10, 14]);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GrooveId {
    FourFloor,
    Broken,
    Shuffle,
    Stepper,
}

impl GrooveId {
    pub const ALL: [GrooveId; 4] = [
        GrooveId::FourFloor,
        GrooveId::Broken,
        GrooveId::Shuffle,
        GrooveId::Stepper,
    ];

    /// Selection weights, aligned with [`GrooveId::ALL`].
    pub const WEIGHTS: [f32; 4] = [0.40, 0.25, 0.20, 0.15];

    pub fn index(self) -> u8 {
        match self {
            GrooveId::FourFloor => 0,
            GrooveId::Broken => 1,
            GrooveId::Shuffle => 2,
            GrooveId::Stepper => 3,
        }
    }

    /// Unknown ids fall back to four-on-the-floor.
    pub fn from_index(index: u8) -> Self {
        match index {
            1 => GrooveId::Broken,
            2 => GrooveId::Shuffle,
            3 => GrooveId::Stepper,
            _ => GrooveId::FourFloor,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            GrooveId::FourFloor => "four",
            GrooveId::Broken => "broken",
            GrooveId::Shuffle => "shuffle",
            GrooveId::Stepper => "stepper",
        }
    }

    pub fn pattern(self) -> &'static GroovePattern {
        &GROOVES[self.index() as usize]
    }
}

#[derive(Debug, Clone, Copy)]
pub struct GroovePattern {
    pub kick: StepMask,
    pub snare: StepMask,
    pub rim: StepMask,
    pub bass: StepMask,
    /// Added to the density-derived hat pulse count
    pub hat_pulse_offset: i32,
    /// Added to the axis-derived hat rotation
    pub hat_rotation: i32,
    /// Open hats allowed on offbeats
    pub open_hats: bool,
}

pub static GROOVES: [GroovePattern; 4] = [
    // four on the floor
    GroovePattern {
        kick: StepMask::from_steps(&[0, 4, 8, 12]),
        snare: StepMask::from_steps(&[4, 12]),
        rim: StepMask::from_steps(&[7, 15]),
        bass: StepMask::from_steps(&[2, 6, 10, 14]),
        hat_pulse_offset: 0,
        hat_rotation: 2,
        open_hats: true,
    },
    // broken
    GroovePattern {
        kick: StepMask::from_steps(&[0, 6, 10]),
        snare: StepMask::from_steps(&[4, 12]),
        rim: StepMask::from_steps(&[3, 9, 15]),
        bass: StepMask::from_steps(&[0, 3, 6, 10, 13]),
        hat_pulse_offset: 1,
        hat_rotation: 1,
        open_hats: false,
    },
    // shuffle
    GroovePattern {
        kick: StepMask::from_steps(&[0, 8, 11]),
        snare: StepMask::from_steps(&[4, 12]),
        rim: StepMask::from_steps(&[6, 14]),
        bass: StepMask::from_steps(&[3, 7, 11, 15]),
        hat_pulse_offset: -1,
        hat_rotation: 3,
        open_hats: true,
    },
    // stepper
    GroovePattern {
        kick: StepMask::from_steps(&[0, 3, 8, 10]),
        snare: StepMask::from_steps(&[12]),
        rim: StepMask::from_steps(&[4, 7]),
        bass: StepMask::from_steps(&[0, 2, 8, 11, 14]),
        hat_pulse_offset: 2,
        hat_rotation: 0,
        open_hats: false,
    },
];

/// Fill rolls, applied over the last quarter of a bar.
pub const SNARE_ROLL: StepMask = StepMask::from_steps(&[12, 13, 14, 15]);
pub const HAT_ROLL: StepMask = StepMask::from_steps(&[8, 9, 10, 11, 12, 13, 14, 15]);
pub const KICK_ROLL: StepMask = StepMask::from_steps(&[12, 14, 15]);

/// Per-step accent weight: downbeats loud, sixteenth offbeats soft.
pub fn accent(step: usize) -> f32 {
    match step % 4 {
        0 => 1.0,
        2 => 0.8,
        _ => 0.62,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_mask_roundtrips_steps() {
        let mask = StepMask::from_steps(&[0, 5, 15]);
        assert!(mask.contains(0) && mask.contains(5) && mask.contains(15));
        assert!(!mask.contains(1));
        assert!(!mask.contains(40));
        assert_eq!(mask.count(), 3);
    }

    #[test]
    fn every_groove_has_a_downbeat_kick() {
        for id in GrooveId::ALL {
            assert!(id.pattern().kick.contains(0), "{} lacks a step-0 kick", id.name());
        }
    }

    #[test]
    fn groove_index_roundtrip_and_fallback() {
        for id in GrooveId::ALL {
            assert_eq!(GrooveId::from_index(id.index()), id);
        }
        assert_eq!(GrooveId::from_index(200), GrooveId::FourFloor);
    }
}
