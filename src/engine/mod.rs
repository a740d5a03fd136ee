// Purpose: decide what plays and when, on the scheduler side of the engine

pub mod clock;
pub mod conductor;
pub mod events;
pub mod scheduler;
pub mod status;

pub use clock::{AudioClock, MonotonicClock};
pub use conductor::Engine;
pub use events::{StepEvent, StepKind};
pub use scheduler::{sec_per_step, LookaheadScheduler, StepSource, TickReport};
pub use status::EngineStatus;
