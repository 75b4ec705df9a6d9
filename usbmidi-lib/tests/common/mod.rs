//! Common test utilities and shared imports

// Allow unused imports and dead code since this is a shared module
// used across multiple test files - not all items are used in every test file
#[allow(unused_imports)]
pub use bytes::Bytes;
#[allow(unused_imports)]
pub use usbmidi_lib::coordinator::{Renderer, ViewSnapshot};
#[allow(unused_imports)]
pub use usbmidi_lib::error::MidiError;
#[allow(unused_imports)]
pub use usbmidi_lib::event::{Event, InputEvent, InputKey, InputPhase};
#[allow(unused_imports)]
pub use usbmidi_lib::message::{DecodedMessage, MessageKind};

/// Route library logs to the test harness output. Safe to call from every test.
#[allow(dead_code)]
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Decode hex string to bytes for testing
#[allow(dead_code)]
pub fn hex_to_bytes(hex_data: &str) -> Bytes {
    Bytes::from(hex::decode(hex_data).expect("Failed to decode hex"))
}

#[allow(dead_code)]
pub fn note_on(note: u8) -> Event {
    Event::Midi(DecodedMessage::new(0x90, note, 100))
}

#[allow(dead_code)]
pub fn press(key: InputKey) -> Event {
    Event::Input(InputEvent::press(key))
}

/// Renderer that keeps every frame it was asked to draw
#[allow(dead_code)]
#[derive(Default)]
pub struct RecordingRenderer {
    pub frames: Vec<ViewSnapshot>,
}

#[allow(dead_code)]
impl RecordingRenderer {
    pub fn last(&self) -> &ViewSnapshot {
        self.frames.last().expect("no frame rendered")
    }
}

impl Renderer for RecordingRenderer {
    fn render(&mut self, view: &ViewSnapshot) -> Result<(), MidiError> {
        self.frames.push(view.clone());
        Ok(())
    }
}

/// Replay captured from a small keyboard: C4 press/release, a CC sweep
/// step, a pitch bend and a timing clock, with one padding stride.
#[allow(dead_code)]
pub const KEYBOARD_CAPTURE: &str = "\
# note on C4, padding, note off C4
09903c64 00000000 08803c00
0bb00140
0ee00050
0ff80000
";
