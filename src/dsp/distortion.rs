//! Distortion / Waveshaping
//!
//! A waveshaper applies a transfer function to each sample:
//!   output = f(input * drive)
//!
//! At low drive the signal stays in the near-linear region of f(); pushing it
//! harder reaches the curved region and adds harmonics.
//!
//! Three curves are used in the render core:
//!
//! Tanh (normalised):
//!   f(x) = tanh(x * drive) / tanh(drive)
//!   - Master soft clip after the tone filter
//!   - Unity gain for small signals at any drive, peaks never exceed 1
//!
//! Rational soft clip:
//!   f(x) = x / (1 + |x|)
//!   - Pad bank saturation, cheaper than tanh
//!
//! Asymmetric stage:
//!   positive half through tanh, negative half through a softer knee
//!   - Cascaded in the amplifier path for even harmonics ("tube" grit)
//!
//! # Drive Values
//!
//!   1.0  = Clean
//!   2-4  = Warm saturation
//!   5-10 = Obvious distortion
//!   10+  = Heavy, amp-like

/// Soft clipping using x / (1 + |x|) transfer function.
#[inline]
pub fn soft_clip(sample: f32, drive: f32) -> f32 {
    let x = sample * drive;
    x / (1.0 + x.abs())
}

/// Tanh soft clip normalised so full-scale input maps to full-scale output.
#[inline]
pub fn tanh_clip(sample: f32, drive: f32) -> f32 {
    let drive = drive.max(0.1);
    (sample * drive).tanh() / drive.tanh()
}

/// One asymmetric saturation stage.
#[inline]
pub fn asym_stage(sample: f32, drive: f32) -> f32 {
    let x = sample * drive;
    if x >= 0.0 {
        x.tanh()
    } else {
        x / (1.0 - 0.6 * x)
    }
}

/// Hard clipping at a threshold. Only used as a last-resort safety clamp.
#[inline]
pub fn hard_clip(sample: f32, threshold: f32) -> f32 {
    sample.clamp(-threshold, threshold)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_soft_clip_unity_drive() {
        // f(0.1) = 0.1 / 1.1 ≈ 0.0909
        let output = soft_clip(0.1, 1.0);
        assert!((output - 0.0909).abs() < 0.01);
    }

    #[test]
    fn test_tanh_clip_bounded() {
        for drive in [0.5, 1.0, 3.0, 12.0] {
            for i in -20..=20 {
                let x = i as f32 * 0.1;
                let y = tanh_clip(x, drive);
                assert!(y.abs() <= 1.0 + 1e-5 || x.abs() > 1.0, "drive {} x {} -> {}", drive, x, y);
            }
            assert!((tanh_clip(1.0, drive) - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_asym_stage_is_asymmetric() {
        let pos = asym_stage(0.3, 3.0);
        let neg = asym_stage(-0.3, 3.0);
        assert!(pos > 0.0 && neg < 0.0);
        assert!((pos + neg).abs() > 0.01, "halves should differ");
        assert!(neg > -1.0 / 0.6);
    }

    #[test]
    fn test_hard_clip_above_threshold() {
        assert_eq!(hard_clip(1.6, 1.0), 1.0);
        assert_eq!(hard_clip(-0.3, 1.0), -0.3);
    }
}
