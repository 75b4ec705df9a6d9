pub mod config;
pub mod constants;
pub mod coordinator;
pub mod decoder;
pub mod device;
pub mod error;
pub mod event;
pub mod format;
pub mod history;
pub mod message;
pub mod packet;
pub mod replay;
pub mod view;


pub use config::MonitorConfig;
pub use coordinator::{Coordinator, ExitReason, MonitorState, Renderer, RunSummary, SharedState, ViewSnapshot};
pub use decoder::decode;
pub use device::{DeviceFilter, UsbMidiDevice, list_midi_devices, run_usb_receiver};
pub use error::MidiError;
pub use event::{Event, EventReceiver, EventSender, InputEvent, InputKey, InputPhase, event_queue};
pub use format::{bend_value, format_message, note_name};
pub use history::History;
pub use message::{DecodedMessage, MessageKind, classify};
pub use packet::RawPacket;
pub use replay::{load_replay, parse_replay, run_replay};
