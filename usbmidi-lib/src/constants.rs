// Protocol and sizing constants for the USB MIDI monitor

use std::time::Duration;

/// Size of one USB-MIDI event packet (header + 3 MIDI bytes)
pub const EVENT_SIZE: usize = 4;

/// Number of decoded messages kept in the history buffer
pub const HISTORY_CAPACITY: usize = 8;

/// Number of history lines visible at once
pub const WINDOW_SIZE: usize = 4;

/// Pending events the coordinator queue holds before dropping new ones
pub const EVENT_QUEUE_DEPTH: usize = 16;

/// How long the coordinator waits for an event before an idle redraw
pub const POLL_TIMEOUT: Duration = Duration::from_millis(100);

/// Raw 14-bit pitch bend value meaning "no bend"
pub const PITCH_BEND_CENTER: i32 = 8192;

/// Lowest status byte; anything below is a data byte
pub const STATUS_MIN: u8 = 0x80;

/// First system (channel-less) status byte
pub const SYSTEM_STATUS_MIN: u8 = 0xF0;

/// USB Audio interface class
pub const USB_CLASS_AUDIO: u8 = 0x01;

/// USB Audio subclass for MIDI streaming
pub const USB_SUBCLASS_MIDI_STREAMING: u8 = 0x03;

/// Size of the bulk IN request used when receiving from a device
pub const RECEIVE_BUFFER_SIZE: usize = 64;
