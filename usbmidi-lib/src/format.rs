use crate::constants::PITCH_BEND_CENTER;
use crate::message::{DecodedMessage, MessageKind};
use std::fmt;

const PITCH_CLASSES: [&str; 12] = ["C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B"];

/// Scientific pitch name of a MIDI note number, e.g. 60 -> "C4", 0 -> "C-1"
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoteName(pub u8);

impl NoteName {
    pub fn pitch_class(&self) -> &'static str {
        PITCH_CLASSES[usize::from(self.0 % 12)]
    }

    pub fn octave(&self) -> i32 {
        i32::from(self.0 / 12) - 1
    }
}

impl fmt::Display for NoteName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.pitch_class(), self.octave())
    }
}

pub fn note_name(note: u8) -> String {
    NoteName(note).to_string()
}

/// Signed pitch bend from the two 7-bit data bytes (LSB first), centered at 0.
pub fn bend_value(data1: u8, data2: u8) -> i32 {
    ((i32::from(data2) << 7) | i32::from(data1)) - PITCH_BEND_CENTER
}

/// Render a message as one fixed-layout display line
pub fn format_message(message: &DecodedMessage) -> String {
    message.to_string()
}

impl fmt::Display for DecodedMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Channels are shown 1-based
        let ch = u16::from(self.channel()) + 1;
        match self.kind() {
            MessageKind::NoteOn if self.data2 > 0 => {
                write!(f, "NoteOn  Ch{:02} {} Vel{:03}", ch, NoteName(self.data1), self.data2)
            }
            MessageKind::NoteOn => write!(f, "NoteOff Ch{:02} {}", ch, NoteName(self.data1)),
            MessageKind::NoteOff => {
                write!(f, "NoteOff Ch{:02} {} Vel{:03}", ch, NoteName(self.data1), self.data2)
            }
            MessageKind::ControlChange => {
                write!(f, "CC      Ch{:02} #{:03}={:03}", ch, self.data1, self.data2)
            }
            MessageKind::ProgramChange => write!(f, "ProgChg Ch{:02} Prg{:03}", ch, self.data1),
            MessageKind::PitchBend => {
                write!(f, "PitchBd Ch{:02} {:+05}", ch, bend_value(self.data1, self.data2))
            }
            MessageKind::ChannelAftertouch => write!(f, "ChPress Ch{:02} Val{:03}", ch, self.data1),
            MessageKind::PolyAftertouch => {
                write!(f, "PolyAT  Ch{:02} {} P{:03}", ch, NoteName(self.data1), self.data2)
            }
            MessageKind::SystemMessage => write!(f, "System  0x{:02X}", self.status),
            MessageKind::Unrecognized => write!(f, "Unknown 0x{:02X}", self.status),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn note_names_cover_full_range() {
        assert_eq!(note_name(60), "C4");
        assert_eq!(note_name(69), "A4");
        assert_eq!(note_name(0), "C-1");
        assert_eq!(note_name(11), "B-1");
        assert_eq!(note_name(61), "C#4");
        assert_eq!(note_name(127), "G9");
        for note in 0u8..=127 {
            let name = NoteName(note);
            assert_eq!(name.octave(), i32::from(note) / 12 - 1);
            assert!(name.to_string().starts_with(name.pitch_class()));
        }
    }

    #[test]
    fn bend_extremes() {
        assert_eq!(bend_value(0, 0), -8192);
        assert_eq!(bend_value(0, 64), 0);
        assert_eq!(bend_value(127, 127), 8191);
    }

    #[test]
    fn pitch_bend_sign_and_padding() {
        assert_eq!(format_message(&DecodedMessage::new(0xE0, 0, 64)), "PitchBd Ch01 +0000");
        assert_eq!(format_message(&DecodedMessage::new(0xE3, 0, 0)), "PitchBd Ch04 -8192");
        assert_eq!(format_message(&DecodedMessage::new(0xE0, 100, 64)), "PitchBd Ch01 +0100");
        assert_eq!(format_message(&DecodedMessage::new(0xEF, 127, 127)), "PitchBd Ch16 +8191");
    }
}
