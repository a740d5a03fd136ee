//! Bar variants and fills.
//!
//! A variant is a rhythmic deviation that holds for one or two whole bars.
//! It starts and ends only on bar boundaries: a variant picked at bar `B`
//! with duration `D` is active for `B..=B+D-1` and cleared at the first
//! boundary past that.

use crate::sequencing::patterns::{StepMask, HAT_ROLL, KICK_ROLL, QUARTERS, SNARE_ROLL};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Variant {
    #[default]
    Normal,
    KickDrop,
    KickSparse,
    HalfTime,
    HatsOnly,
    HatBreak,
    QuarterTime,
}

/// How the kick lane is rewritten.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KickRule {
    Pattern,
    Off,
    Step0,
    Step0And8,
}

/// How the closed-hat lane is rewritten.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HatRule {
    Pattern,
    /// Keep the grid, scale the level
    Scaled(f32),
    /// Quarter-note positions only
    Quarters,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VariantRule {
    pub kick: KickRule,
    /// Snare and rim survive
    pub snare: bool,
    pub hats: HatRule,
    /// Extra delay send while the variant holds, 0..1
    pub fx_swell: f32,
}

impl Variant {
    /// Candidates for a random pick, aligned with [`Variant::PICK_WEIGHTS`].
    pub const PICKABLE: [Variant; 6] = [
        Variant::KickDrop,
        Variant::KickSparse,
        Variant::HalfTime,
        Variant::HatsOnly,
        Variant::HatBreak,
        Variant::QuarterTime,
    ];

    pub const PICK_WEIGHTS: [f32; 6] = [0.25, 0.20, 0.20, 0.12, 0.10, 0.13];

    pub fn id(self) -> u8 {
        match self {
            Variant::Normal => 0,
            Variant::KickDrop => 1,
            Variant::KickSparse => 2,
            Variant::HalfTime => 3,
            Variant::HatsOnly => 4,
            Variant::HatBreak => 5,
            Variant::QuarterTime => 6,
        }
    }

    /// Unknown ids decode to `Normal`.
    pub fn from_id(id: u8) -> Self {
        match id {
            1 => Variant::KickDrop,
            2 => Variant::KickSparse,
            3 => Variant::HalfTime,
            4 => Variant::HatsOnly,
            5 => Variant::HatBreak,
            6 => Variant::QuarterTime,
            _ => Variant::Normal,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Variant::Normal => "normal",
            Variant::KickDrop => "kick-drop",
            Variant::KickSparse => "kick-sparse",
            Variant::HalfTime => "half-time",
            Variant::HatsOnly => "hats-only",
            Variant::HatBreak => "hat-break",
            Variant::QuarterTime => "quarter-time",
        }
    }

    pub fn rule(self) -> VariantRule {
        match self {
            Variant::Normal => VariantRule {
                kick: KickRule::Pattern,
                snare: true,
                hats: HatRule::Pattern,
                fx_swell: 0.0,
            },
            Variant::KickDrop => VariantRule {
                kick: KickRule::Off,
                snare: true,
                hats: HatRule::Pattern,
                fx_swell: 0.0,
            },
            Variant::KickSparse => VariantRule {
                kick: KickRule::Step0,
                snare: true,
                hats: HatRule::Pattern,
                fx_swell: 0.0,
            },
            Variant::HalfTime => VariantRule {
                kick: KickRule::Step0And8,
                snare: false,
                hats: HatRule::Scaled(0.55),
                fx_swell: 0.35,
            },
            Variant::HatsOnly => VariantRule {
                kick: KickRule::Off,
                snare: false,
                hats: HatRule::Pattern,
                fx_swell: 0.0,
            },
            Variant::HatBreak => VariantRule {
                kick: KickRule::Step0,
                snare: false,
                hats: HatRule::Scaled(0.08),
                fx_swell: 0.7,
            },
            Variant::QuarterTime => VariantRule {
                kick: KickRule::Step0,
                snare: false,
                hats: HatRule::Quarters,
                fx_swell: 0.2,
            },
        }
    }

    /// Bars a freshly picked variant holds, from a unit random draw.
    pub fn duration_bars(self, r: f32) -> u64 {
        match self {
            Variant::Normal => 0,
            Variant::HalfTime => 2,
            _ => {
                if r < 0.5 {
                    1
                } else {
                    2
                }
            }
        }
    }
}

impl KickRule {
    pub fn apply(self, pattern: StepMask) -> StepMask {
        match self {
            KickRule::Pattern => pattern,
            KickRule::Off => StepMask::EMPTY,
            KickRule::Step0 => StepMask::from_steps(&[0]),
            KickRule::Step0And8 => StepMask::from_steps(&[0, 8]),
        }
    }
}

impl HatRule {
    pub fn apply(self, grid: StepMask) -> (StepMask, f32) {
        match self {
            HatRule::Pattern => (grid, 1.0),
            HatRule::Scaled(gain) => (grid, gain),
            HatRule::Quarters => (QUARTERS, 1.0),
        }
    }
}

/// A variant together with the bars it covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VariantWindow {
    pub variant: Variant,
    pub start_bar: u64,
    /// Inclusive last bar; -1 when nothing is scheduled
    pub until_bar: i64,
}

impl Default for VariantWindow {
    fn default() -> Self {
        Self {
            variant: Variant::Normal,
            start_bar: 0,
            until_bar: -1,
        }
    }
}

impl VariantWindow {
    pub fn starting(variant: Variant, bar: u64, duration: u64) -> Self {
        Self {
            variant,
            start_bar: bar,
            until_bar: bar as i64 + duration.max(1) as i64 - 1,
        }
    }

    pub fn is_active(&self, bar: u64) -> bool {
        self.variant != Variant::Normal && bar >= self.start_bar && (bar as i64) <= self.until_bar
    }

    /// Clear the window once `bar` has moved past it. Called at bar
    /// boundaries only. Returns true when something was cleared.
    pub fn expire(&mut self, bar: u64) -> bool {
        if self.variant != Variant::Normal && (bar as i64) > self.until_bar {
            *self = Self::default();
            true
        } else {
            false
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Fill {
    #[default]
    None,
    SnareRoll,
    HatRoll,
    KickRoll,
}

impl Fill {
    pub const PICKABLE: [Fill; 3] = [Fill::SnareRoll, Fill::HatRoll, Fill::KickRoll];

    pub fn id(self) -> u8 {
        match self {
            Fill::None => 0,
            Fill::SnareRoll => 1,
            Fill::HatRoll => 2,
            Fill::KickRoll => 3,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Fill::None => "-",
            Fill::SnareRoll => "snare-roll",
            Fill::HatRoll => "hat-roll",
            Fill::KickRoll => "kick-roll",
        }
    }

    pub fn roll(self) -> StepMask {
        match self {
            Fill::None => StepMask::EMPTY,
            Fill::SnareRoll => SNARE_ROLL,
            Fill::HatRoll => HAT_ROLL,
            Fill::KickRoll => KICK_ROLL,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_is_active_for_exactly_its_duration() {
        let window = VariantWindow::starting(Variant::KickDrop, 10, 2);
        assert!(!window.is_active(9));
        assert!(window.is_active(10));
        assert!(window.is_active(11));
        assert!(!window.is_active(12));
    }

    #[test]
    fn expire_only_after_until_bar() {
        let mut window = VariantWindow::starting(Variant::HatBreak, 4, 1);
        assert!(!window.expire(4));
        assert_eq!(window.variant, Variant::HatBreak);
        assert!(window.expire(5));
        assert_eq!(window, VariantWindow::default());
    }

    #[test]
    fn unknown_ids_are_normal() {
        assert_eq!(Variant::from_id(0), Variant::Normal);
        assert_eq!(Variant::from_id(99), Variant::Normal);
        for v in Variant::PICKABLE {
            assert_eq!(Variant::from_id(v.id()), v);
        }
    }

    #[test]
    fn variant_rules_match_definitions() {
        let kick = StepMask::from_steps(&[0, 4, 8, 12]);
        assert_eq!(Variant::KickDrop.rule().kick.apply(kick), StepMask::EMPTY);
        assert_eq!(
            Variant::HalfTime.rule().kick.apply(kick),
            StepMask::from_steps(&[0, 8])
        );
        assert!(!Variant::HatsOnly.rule().snare);
        let (hats, gain) = Variant::HatBreak.rule().hats.apply(StepMask(0xffff));
        assert_eq!(hats, StepMask(0xffff));
        assert!(gain < 0.1);
        assert_eq!(Variant::QuarterTime.rule().hats.apply(StepMask(0xffff)).0, QUARTERS);
    }

    #[test]
    fn half_time_always_holds_two_bars() {
        assert_eq!(Variant::HalfTime.duration_bars(0.0), 2);
        assert_eq!(Variant::KickDrop.duration_bars(0.1), 1);
        assert_eq!(Variant::KickDrop.duration_bars(0.9), 2);
    }
}
