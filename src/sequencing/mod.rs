//! Musical timing primitives: randomness, rhythm grids, pattern tables and
//! the chord timeline.
//!
//! Everything here is deterministic and allocation-light. The arrangement
//! layer composes these into per-bar decisions.

pub mod euclid;
pub mod harmony;
pub mod patterns;
pub mod rng;

pub use euclid::{euclidean, euclidean_mask};
pub use harmony::{Chord, HarmonyCursor, PROGRESSION};
pub use patterns::{GrooveId, GroovePattern, StepMask, STEPS_PER_BAR};
pub use rng::Xorshift32;
