pub mod analysis; // Waveform, spectrum and activity feeds for the HUD
pub mod arrangement; // Bar-driven arrangement state machine
pub mod config;
pub mod dsp;
pub mod engine; // Lookahead scheduler and the scheduler-side engine
pub mod error;
pub mod io;
pub mod runtime; // cpal stream and scheduler thread
pub mod samples;
pub mod sequencing; // PRNG, euclidean grids, groove and chord tables
pub mod synth; // Render core and render-thread messaging

pub use config::EngineConfig;
pub use engine::{Engine, EngineStatus};
pub use error::{EngineError, LoadError};

/// Largest block any render call processes at once.
pub const MAX_BLOCK_SIZE: usize = 2048;
