//! Arrangement: what should sound, decided one bar at a time.
//!
//! The state machine moves through stages (intro, kick-in, full), walks the
//! chord timeline, rolls grooves, and schedules bar variants, fills and
//! breakdowns from a seeded PRNG. The resolved [`BarPlan`] is what the step
//! scheduler reads while it walks the sixteen steps of the bar.

pub mod macros;
pub mod plan;
pub mod scene;
pub mod state;
pub mod variant;

pub use macros::{MacroKind, MacroLevels, Macros};
pub use plan::BarPlan;
pub use scene::{FlowScene, Stage, FLOW_SCENES};
pub use state::{Arrangement, ArrangementState};
pub use variant::{Fill, Variant, VariantWindow};
