//! MIDI events to engine commands.

use crate::arrangement::MacroKind;
use crate::engine::StepKind;
use crate::io::midi::MidiEvent;

pub const NOTE_KICK: u8 = 36;
pub const NOTE_RIM: u8 = 37;
pub const NOTE_SNARE: u8 = 38;
pub const NOTE_HAT: u8 = 42;
pub const NOTE_OPEN_HAT: u8 = 46;
pub const NOTE_PAD_LIFT: u8 = 48;
pub const NOTE_PERC_BOOST: u8 = 49;
pub const NOTE_FX_BLAST: u8 = 50;

pub const CC_BUILD: u8 = 1;
pub const CC_LEFT_Y: u8 = 71;
pub const CC_RIGHT_Y: u8 = 74;

/// Control axes a CC can take over from the gesture input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlAxis {
    Build,
    LeftY,
    RightY,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MidiCommand {
    /// Live percussion hit, scheduled through the monotonic trigger clock
    Hit { kind: StepKind, velocity: f32 },
    Macro { kind: MacroKind, strength: f32 },
    LeadOn { note: u8, freq: f32, velocity: f32 },
    LeadOff { note: u8 },
    Axis { axis: ControlAxis, value: f32 },
}

pub fn midi_to_command(midi: MidiEvent) -> Option<MidiCommand> {
    match midi {
        MidiEvent::NoteOn { note, velocity } => {
            let velocity = velocity.clamp(0.0, 1.0);
            let hit = |kind| Some(MidiCommand::Hit { kind, velocity });
            let macro_ = |kind| {
                Some(MidiCommand::Macro {
                    kind,
                    strength: velocity,
                })
            };
            match note {
                NOTE_KICK => hit(StepKind::Kick),
                NOTE_SNARE => hit(StepKind::Snare),
                NOTE_RIM => hit(StepKind::Rim),
                NOTE_HAT => hit(StepKind::Hat),
                NOTE_OPEN_HAT => hit(StepKind::OpenHat),
                NOTE_PAD_LIFT => macro_(MacroKind::PadLift),
                NOTE_PERC_BOOST => macro_(MacroKind::PercBoost),
                NOTE_FX_BLAST => macro_(MacroKind::FxBlast),
                _ => Some(MidiCommand::LeadOn {
                    note,
                    freq: midi_note_to_freq(note),
                    velocity,
                }),
            }
        }
        MidiEvent::NoteOff { note } => match note {
            NOTE_KICK | NOTE_SNARE | NOTE_RIM | NOTE_HAT | NOTE_OPEN_HAT | NOTE_PAD_LIFT
            | NOTE_PERC_BOOST | NOTE_FX_BLAST => None,
            _ => Some(MidiCommand::LeadOff { note }),
        },
        MidiEvent::Cc { controller, value } => {
            let axis = match controller {
                CC_BUILD => ControlAxis::Build,
                CC_LEFT_Y => ControlAxis::LeftY,
                CC_RIGHT_Y => ControlAxis::RightY,
                _ => return None,
            };
            Some(MidiCommand::Axis {
                axis,
                value: value.clamp(0.0, 1.0),
            })
        }
    }
}

pub fn midi_note_to_freq(note: u8) -> f32 {
    440.0 * 2.0_f32.powf((note as f32 - 69.0) / 12.0)
}
