//! USB-MIDI packet decoding.
//!
//! A transfer is a run of 4-byte strides. Strides with Code Index Number 0 are
//! padding, a trailing partial stride is a transport artifact, and neither is
//! reported. Every other stride becomes one [`DecodedMessage`].

use crate::message::DecodedMessage;
use crate::packet::{Events, RawPacket, events};
use std::time::Instant;
use tracing::debug;

/// Lazily decode every MIDI message carried by `packet`.
///
/// Holds no state between calls. Each message is stamped when the iterator
/// yields it, so deferred decoding gets the time of decoding.
pub fn decode(packet: &[u8]) -> Decode<'_> {
    Decode {
        events: events(packet),
    }
}

impl RawPacket {
    /// Decode the MIDI messages carried by this transfer
    pub fn decode(&self) -> Decode<'_> {
        decode(self.as_bytes())
    }
}

/// Iterator returned by [`decode`]
#[derive(Debug, Clone)]
pub struct Decode<'a> {
    events: Events<'a>,
}

impl Iterator for Decode<'_> {
    type Item = DecodedMessage;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let event = self.events.next()?;
            if event.is_empty() {
                continue;
            }

            debug!(
                "MIDI: CIN={:X} Cable={} Status={:02X} Data={:02X} {:02X}",
                u8::from(event.code_index()),
                event.cable(),
                event.status,
                event.data1,
                event.data2
            );

            return Some(DecodedMessage::at(
                event.status,
                event.data1,
                event.data2,
                Instant::now(),
            ));
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, self.events.size_hint().1)
    }
}
