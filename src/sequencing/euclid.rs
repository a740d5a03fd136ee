/*
Euclidean Rhythms
=================

Distribute k pulses as evenly as possible over n steps. Many traditional
rhythms fall out of this: E(3,8) is the tresillo, E(5,8) the cinquillo.

We use the bucket form rather than Bjorklund's recursion. Slot i is a pulse
when the running quotient steps over an integer boundary:

    pulse(i) = floor((i+1) * k / n) != floor(i * k / n)

    E(3,8):  i      0 1 2 3 4 5 6 7
             i*k/n  0 0 0 1 1 1 2 2   (floored)
             pulse  . . x . . x . x

The result is the same set of necklaces Bjorklund produces, up to rotation.
Rotation then shifts the whole grid to the right:

    E(3,8) rot 1:   x . . x . . x .

Grids are recomputed every bar from control axes (pulse count from density,
rotation from a second axis), so this runs on the scheduler side only.
*/

use super::patterns::StepMask;

/// Euclidean grid of length `steps` with `pulses` onsets rotated right by
/// `rotation` (taken mod `steps`).
///
/// `pulses <= 0` yields all rests, `pulses >= steps` all onsets.
pub fn euclidean(steps: usize, pulses: i32, rotation: i32) -> Vec<bool> {
    if steps == 0 {
        return Vec::new();
    }
    if pulses <= 0 {
        return vec![false; steps];
    }
    let k = pulses as usize;
    if k >= steps {
        return vec![true; steps];
    }

    let mut grid: Vec<bool> = (0..steps)
        .map(|i| ((i + 1) * k) / steps != (i * k) / steps)
        .collect();

    let rot = rotation.rem_euclid(steps as i32) as usize;
    grid.rotate_right(rot);
    grid
}

/// Same grid packed into a [`StepMask`]. Steps beyond 32 are dropped.
pub fn euclidean_mask(steps: usize, pulses: i32, rotation: i32) -> StepMask {
    StepMask::from_bools(&euclidean(steps.min(32), pulses, rotation))
}
