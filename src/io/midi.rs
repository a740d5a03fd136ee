/// Discrete MIDI input, already parsed by the transport layer.
///
/// Velocities and controller values are normalized to `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MidiEvent {
    NoteOn { note: u8, velocity: f32 },
    NoteOff { note: u8 },
    Cc { controller: u8, value: f32 },
}

impl MidiEvent {
    /// Build from 7-bit wire values. A note-on with zero velocity is a
    /// note-off, as most controllers send it that way.
    pub fn note_on_u7(note: u8, velocity: u8) -> Self {
        if velocity == 0 {
            MidiEvent::NoteOff { note: note & 0x7f }
        } else {
            MidiEvent::NoteOn {
                note: note & 0x7f,
                velocity: (velocity & 0x7f) as f32 / 127.0,
            }
        }
    }

    pub fn cc_u7(controller: u8, value: u8) -> Self {
        MidiEvent::Cc {
            controller: controller & 0x7f,
            value: (value & 0x7f) as f32 / 127.0,
        }
    }
}
