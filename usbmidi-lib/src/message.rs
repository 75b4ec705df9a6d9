use crate::constants::{STATUS_MIN, SYSTEM_STATUS_MIN};
use num_enum::{FromPrimitive, IntoPrimitive};
use std::time::Instant;
use strum_macros::Display;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// MIDI message kinds, keyed by the upper nibble of the status byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, IntoPrimitive, FromPrimitive)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[repr(u8)]
pub enum MessageKind {
    NoteOff = 0x80,
    NoteOn = 0x90,
    PolyAftertouch = 0xA0,
    ControlChange = 0xB0,
    ProgramChange = 0xC0,
    ChannelAftertouch = 0xD0,
    PitchBend = 0xE0,
    SystemMessage = 0xF0,
    /// A data byte (< 0x80) found where a status byte was expected
    #[num_enum(default)]
    Unrecognized = 0x00,
}

impl MessageKind {
    pub fn is_channel_message(&self) -> bool {
        !matches!(self, MessageKind::SystemMessage | MessageKind::Unrecognized)
    }
}

/// Split a status byte into its message kind and channel (0-15).
///
/// Total over the whole byte range: system messages and unrecognized bytes
/// always report channel 0.
pub fn classify(status: u8) -> (MessageKind, u8) {
    match status {
        s if s < STATUS_MIN => (MessageKind::Unrecognized, 0),
        s if s >= SYSTEM_STATUS_MIN => (MessageKind::SystemMessage, 0),
        s => (MessageKind::from_primitive(s & 0xF0), s & 0x0F),
    }
}

/// A MIDI message decoded from one USB-MIDI stride.
///
/// Kind and channel are derived from `status` on demand so they can never
/// disagree with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodedMessage {
    pub status: u8,
    pub data1: u8,
    pub data2: u8,
    pub received_at: Instant,
}

impl DecodedMessage {
    /// Create a message stamped with the current time
    pub fn new(status: u8, data1: u8, data2: u8) -> Self {
        Self::at(status, data1, data2, Instant::now())
    }

    pub fn at(status: u8, data1: u8, data2: u8, received_at: Instant) -> Self {
        Self {
            status,
            data1,
            data2,
            received_at,
        }
    }

    pub fn kind(&self) -> MessageKind {
        classify(self.status).0
    }

    pub fn channel(&self) -> u8 {
        classify(self.status).1
    }

    /// Note On with velocity 0, which by MIDI convention releases the note
    pub fn is_implicit_note_off(&self) -> bool {
        self.kind() == MessageKind::NoteOn && self.data2 == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_channel_messages() {
        for status in 0x80u8..=0xEF {
            let (kind, channel) = classify(status);
            assert_eq!(u8::from(kind), status & 0xF0, "status {status:#04x}");
            assert_eq!(channel, status & 0x0F, "status {status:#04x}");
            assert!(kind.is_channel_message());
        }
    }

    #[test]
    fn classify_system_messages() {
        for status in 0xF0u8..=0xFF {
            assert_eq!(classify(status), (MessageKind::SystemMessage, 0));
        }
    }

    #[test]
    fn classify_data_bytes_as_unrecognized() {
        for status in 0x00u8..0x80 {
            assert_eq!(classify(status), (MessageKind::Unrecognized, 0));
        }
    }

    #[test]
    fn kind_follows_status() {
        let msg = DecodedMessage::new(0xB5, 7, 100);
        assert_eq!(msg.kind(), MessageKind::ControlChange);
        assert_eq!(msg.channel(), 5);
        assert!(!msg.is_implicit_note_off());
        assert!(DecodedMessage::new(0x92, 60, 0).is_implicit_note_off());
    }
}
