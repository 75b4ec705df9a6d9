use std::io;
use thiserror::Error;

/// The primary error type for the `usbmidi-lib` library.
///
/// Only the edges (USB transport, replay files, the display) can fail. Decoding,
/// storing and formatting MIDI messages never produce an error.
#[derive(Error, Debug)]
pub enum MidiError {
    #[error("USB MIDI device not found. Is it connected?")]
    DeviceNotFound,

    #[error("USB device has no MIDI streaming interface with an IN endpoint")]
    NoMidiInterface,

    #[error("USB error: {0}")]
    Usb(#[source] nusb::Error),

    #[error("USB transfer error: {0}")]
    Transfer(#[from] nusb::transfer::TransferError),

    #[error("Descriptor error: {0}")]
    Descriptor(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Invalid hex on line {line}: {source}")]
    InvalidHex {
        line: usize,
        #[source]
        source: hex::FromHexError,
    },

    #[error("Event queue closed")]
    QueueClosed,
}
