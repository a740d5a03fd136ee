// Purpose - inputs from external collaborators: gesture snapshots and MIDI

pub mod control;
pub mod converter;
pub mod midi;

pub use control::ControlState;
pub use converter::{midi_to_command, ControlAxis, MidiCommand};
pub use midi::MidiEvent;
