//! Render side: parameter snapshots, messages, voices and the render loop.
//!
//! The scheduler posts [`RenderMessage`]s; the [`Renderer`] owns everything
//! else here and runs it on the audio thread.

pub mod channel;
pub mod core;
pub mod drone;
pub mod lead;
pub mod message;
pub mod pad;
pub mod params;
pub mod renderer;
pub mod sampler;
pub mod string;

pub use channel::ParamSender;
pub use self::core::{CorePeaks, SynthCore};
pub use message::{
    Activity, ActivityVoice, MessageReceiver, MessageSender, NoteKind, RenderMessage,
};
pub use params::{compose, LeadMode, ParamInput, SynthParams};
pub use renderer::{Renderer, Transport};
pub use sampler::SamplePlayer;
