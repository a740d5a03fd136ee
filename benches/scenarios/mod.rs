//! Engine-level benchmarks.
//!
//! Voices on their own, the whole render quantum with percussion in flight,
//! and one scheduler tick that crosses a bar boundary.

mod render;
mod scheduler;
mod voices;

pub use render::bench_render;
pub use scheduler::bench_scheduler;
pub use voices::bench_voices;
