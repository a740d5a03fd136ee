//! Per-frame control snapshot from the gesture collaborator.

/// Continuous axes are normalized to `[0, 1]`; `dt` is in seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlState {
    pub dt: f32,
    pub left_x: f32,
    pub left_y: f32,
    pub right_x: f32,
    pub right_y: f32,
    pub pinch_right: f32,
    pub pinch_left: f32,
    pub speed_right: f32,
    pub build: f32,
    pub kill: bool,
    pub hand_count: u32,
}

impl Default for ControlState {
    fn default() -> Self {
        Self {
            dt: 1.0 / 60.0,
            left_x: 0.5,
            left_y: 0.5,
            right_x: 0.5,
            right_y: 0.5,
            pinch_right: 0.0,
            pinch_left: 0.0,
            speed_right: 0.0,
            build: 0.0,
            kill: false,
            hand_count: 0,
        }
    }
}

#[inline]
fn unit(v: f32) -> f32 {
    if v.is_finite() {
        v.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

impl ControlState {
    /// Copy with every axis forced into range. NaN maps to zero.
    pub fn clamped(&self) -> Self {
        Self {
            dt: if self.dt.is_finite() {
                self.dt.clamp(0.0, 0.25)
            } else {
                0.0
            },
            left_x: unit(self.left_x),
            left_y: unit(self.left_y),
            right_x: unit(self.right_x),
            right_y: unit(self.right_y),
            pinch_right: unit(self.pinch_right),
            pinch_left: unit(self.pinch_left),
            speed_right: unit(self.speed_right),
            build: unit(self.build),
            kill: self.kill,
            hand_count: self.hand_count.min(2),
        }
    }

    /// No hands in view: the arrangement runs on its own.
    pub fn is_idle(&self) -> bool {
        self.hand_count == 0
    }
}
