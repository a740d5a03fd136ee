//! Macro effects: pad lift, percussion boost, FX blast.
//!
//! A trigger pushes a deadline into the future; the level chases 1 while the
//! deadline is ahead and 0 after it. Attack is faster than release so a
//! burst swells in quickly and fades out without a step.

pub const ATTACK_RATE: f32 = 6.0;
pub const RELEASE_RATE: f32 = 1.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MacroKind {
    PadLift,
    PercBoost,
    FxBlast,
}

impl MacroKind {
    pub const ALL: [MacroKind; 3] = [MacroKind::PadLift, MacroKind::PercBoost, MacroKind::FxBlast];

    /// Seconds a full-strength trigger holds before release.
    pub fn base_duration(self) -> f64 {
        match self {
            MacroKind::PadLift => 4.0,
            MacroKind::PercBoost => 2.0,
            MacroKind::FxBlast => 1.5,
        }
    }

    fn slot(self) -> usize {
        match self {
            MacroKind::PadLift => 0,
            MacroKind::PercBoost => 1,
            MacroKind::FxBlast => 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MacroLevels {
    pub pad_lift: f32,
    pub perc_boost: f32,
    pub fx_blast: f32,
}

impl MacroLevels {
    pub fn get(&self, kind: MacroKind) -> f32 {
        match kind {
            MacroKind::PadLift => self.pad_lift,
            MacroKind::PercBoost => self.perc_boost,
            MacroKind::FxBlast => self.fx_blast,
        }
    }

    fn get_mut(&mut self, kind: MacroKind) -> &mut f32 {
        match kind {
            MacroKind::PadLift => &mut self.pad_lift,
            MacroKind::PercBoost => &mut self.perc_boost,
            MacroKind::FxBlast => &mut self.fx_blast,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Macros {
    levels: MacroLevels,
    deadlines: [f64; 3],
}

impl Macros {
    /// Extend the deadline for `kind` to `now + base * (0.5 + strength)`.
    /// A weaker trigger never shortens a pending one.
    pub fn trigger(&mut self, kind: MacroKind, strength: f32, now: f64) {
        let strength = strength.clamp(0.0, 1.0) as f64;
        let deadline = now + kind.base_duration() * (0.5 + strength);
        let slot = &mut self.deadlines[kind.slot()];
        *slot = slot.max(deadline);
    }

    /// Smooth every level toward its target over `dt` seconds.
    pub fn tick(&mut self, now: f64, dt: f32) {
        if dt <= 0.0 {
            return;
        }
        for kind in MacroKind::ALL {
            let held = now < self.deadlines[kind.slot()];
            let (target, rate) = if held {
                (1.0, ATTACK_RATE)
            } else {
                (0.0, RELEASE_RATE)
            };
            let level = self.levels.get_mut(kind);
            *level += (target - *level) * (1.0 - (-rate * dt).exp());
            *level = level.clamp(0.0, 1.0);
        }
    }

    pub fn levels(&self) -> MacroLevels {
        self.levels
    }

    pub fn deadline(&self, kind: MacroKind) -> f64 {
        self.deadlines[kind.slot()]
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trigger_extends_by_strength() {
        let mut macros = Macros::default();
        macros.trigger(MacroKind::PercBoost, 1.0, 10.0);
        assert!((macros.deadline(MacroKind::PercBoost) - 13.0).abs() < 1e-9);
        macros.trigger(MacroKind::PercBoost, 0.0, 10.0);
        assert!((macros.deadline(MacroKind::PercBoost) - 13.0).abs() < 1e-9);
    }

    #[test]
    fn attack_is_faster_than_release() {
        let mut macros = Macros::default();
        macros.trigger(MacroKind::FxBlast, 1.0, 0.0);
        let dt = 1.0 / 60.0;
        let mut now = 0.0;
        for _ in 0..6 {
            now += dt as f64;
            macros.tick(now, dt);
        }
        let risen = macros.levels().fx_blast;

        let mut fading = Macros::default();
        fading.levels.fx_blast = 1.0;
        for _ in 0..6 {
            fading.tick(100.0, dt);
        }
        let fallen = 1.0 - fading.levels().fx_blast;
        assert!(risen > fallen, "attack {} should beat release {}", risen, fallen);
    }

    #[test]
    fn level_settles_at_zero_after_deadline() {
        let mut macros = Macros::default();
        macros.trigger(MacroKind::PadLift, 0.5, 0.0);
        let mut now = 0.0;
        for _ in 0..2000 {
            now += 0.01;
            macros.tick(now, 0.01);
        }
        let level = macros.levels().pad_lift;
        assert!(level < 1e-3, "level {} should have released", level);
    }
}
