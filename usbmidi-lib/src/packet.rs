use crate::constants::EVENT_SIZE;
use bytes::Bytes;
use modular_bitfield::prelude::*;
use num_enum::{FromPrimitive, IntoPrimitive};
use std::slice::ChunksExact;
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout, Unaligned};

/// First byte of every USB-MIDI event packet.
///
/// The low nibble is the Code Index Number (CIN) classifying the payload,
/// the high nibble the virtual cable number.
#[bitfield(bytes = 1)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PacketHeader {
    pub code_index: B4,
    pub cable: B4,
}

/// USB-MIDI Code Index Numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, IntoPrimitive, FromPrimitive)]
#[repr(u8)]
pub enum CodeIndex {
    // 0 carries no payload
    Misc = 0x0,
    CableEvent = 0x1,
    SystemCommon2 = 0x2,
    SystemCommon3 = 0x3,
    SysExStart = 0x4,
    SysExEnd1 = 0x5,
    SysExEnd2 = 0x6,
    SysExEnd3 = 0x7,
    NoteOff = 0x8,
    NoteOn = 0x9,
    PolyKeyPress = 0xA,
    ControlChange = 0xB,
    ProgramChange = 0xC,
    ChannelPressure = 0xD,
    PitchBend = 0xE,
    SingleByte = 0xF,

    #[num_enum(catch_all)]
    Unknown(u8),
}

impl CodeIndex {
    /// Whether a stride with this CIN carries a MIDI message at all
    pub fn has_payload(&self) -> bool {
        *self != CodeIndex::Misc
    }
}

/// One 4-byte stride of a USB-MIDI transfer as it appears on the wire
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, KnownLayout, Immutable, Unaligned)]
#[repr(C)]
pub struct UsbMidiEventRaw {
    pub header: u8,
    pub status: u8,
    pub data1: u8,
    pub data2: u8,
}

/// A parsed USB-MIDI event packet
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UsbMidiEvent {
    pub header: PacketHeader,
    pub status: u8,
    pub data1: u8,
    pub data2: u8,
}

impl UsbMidiEvent {
    pub fn code_index(&self) -> CodeIndex {
        CodeIndex::from_primitive(self.header.code_index())
    }

    pub fn cable(&self) -> u8 {
        self.header.cable()
    }

    /// CIN 0 strides are padding and must be skipped
    pub fn is_empty(&self) -> bool {
        !self.code_index().has_payload()
    }
}

impl From<UsbMidiEventRaw> for UsbMidiEvent {
    fn from(raw: UsbMidiEventRaw) -> Self {
        Self {
            header: PacketHeader::from_bytes([raw.header]),
            status: raw.status,
            data1: raw.data1,
            data2: raw.data2,
        }
    }
}

impl From<UsbMidiEvent> for UsbMidiEventRaw {
    fn from(event: UsbMidiEvent) -> Self {
        let [header] = event.header.into_bytes();
        Self {
            header,
            status: event.status,
            data1: event.data1,
            data2: event.data2,
        }
    }
}

/// A transport-level frame received from a USB-MIDI endpoint
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RawPacket(Bytes);

impl RawPacket {
    pub fn new(bytes: impl Into<Bytes>) -> Self {
        Self(bytes.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate the complete 4-byte strides, including CIN 0 padding
    pub fn events(&self) -> Events<'_> {
        events(&self.0)
    }
}

impl From<Bytes> for RawPacket {
    fn from(bytes: Bytes) -> Self {
        Self(bytes)
    }
}

impl From<Vec<u8>> for RawPacket {
    fn from(bytes: Vec<u8>) -> Self {
        Self(Bytes::from(bytes))
    }
}

impl AsRef<[u8]> for RawPacket {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// Iterator over the 4-byte strides of a packet. A trailing partial stride is dropped.
#[derive(Debug, Clone)]
pub struct Events<'a> {
    strides: ChunksExact<'a, u8>,
}

impl Iterator for Events<'_> {
    type Item = UsbMidiEvent;

    fn next(&mut self) -> Option<Self::Item> {
        let stride = self.strides.next()?;
        // chunks_exact guarantees EVENT_SIZE bytes, so this cannot fail
        UsbMidiEventRaw::read_from_bytes(stride).ok().map(UsbMidiEvent::from)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.strides.size_hint()
    }
}

pub fn events(bytes: &[u8]) -> Events<'_> {
    Events {
        strides: bytes.chunks_exact(EVENT_SIZE),
    }
}
