//! Events flowing from the producers (USB receiver, replay, input thread) to
//! the coordinator over one bounded queue.

use crate::error::MidiError;
use crate::message::DecodedMessage;
use crate::packet::RawPacket;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tokio::time::timeout;
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputKey {
    Up,
    Down,
    Left,
    Right,
    Confirm,
    Back,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputPhase {
    Press,
    Repeat,
    Release,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputEvent {
    pub key: InputKey,
    pub phase: InputPhase,
}

impl InputEvent {
    pub fn new(key: InputKey, phase: InputPhase) -> Self {
        Self { key, phase }
    }

    pub fn press(key: InputKey) -> Self {
        Self::new(key, InputPhase::Press)
    }

    /// Only presses and auto-repeats act; releases are ignored
    pub fn is_actionable(&self) -> bool {
        matches!(self.phase, InputPhase::Press | InputPhase::Repeat)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// User key action
    Input(InputEvent),
    /// A message decoded by the receive path
    Midi(DecodedMessage),
    /// Transport connected (`true`) or disconnected (`false`)
    Connectivity(bool),
}

/// Create the bounded queue between producers and the coordinator
pub fn event_queue(depth: usize) -> (EventSender, EventReceiver) {
    let (tx, rx) = mpsc::channel(depth.max(1));
    let dropped = Arc::new(AtomicU64::new(0));
    (
        EventSender {
            tx,
            dropped: Arc::clone(&dropped),
        },
        EventReceiver { rx, dropped },
    )
}

/// Producer half of the event queue. Cheap to clone, one per producer.
#[derive(Debug, Clone)]
pub struct EventSender {
    tx: mpsc::Sender<Event>,
    dropped: Arc<AtomicU64>,
}

impl EventSender {
    /// Enqueue without blocking. A full queue drops the new event.
    ///
    /// Returns `false` if the event was not queued.
    pub fn push(&self, event: Event) -> bool {
        match self.tx.try_send(event) {
            Ok(()) => true,
            Err(TrySendError::Full(event)) => {
                let total = self.dropped.fetch_add(1, Ordering::Relaxed) + 1;
                warn!("Event queue full, dropping {:?} ({} dropped so far)", event, total);
                false
            }
            Err(TrySendError::Closed(_)) => false,
        }
    }

    /// Enqueue, waiting for room. Used for events that must not be lost.
    pub async fn send(&self, event: Event) -> Result<(), MidiError> {
        self.tx.send(event).await.map_err(|_| MidiError::QueueClosed)
    }

    /// Enqueue from a plain OS thread, waiting for room.
    ///
    /// Must not be called from inside the async runtime.
    pub fn send_blocking(&self, event: Event) -> Result<(), MidiError> {
        self.tx.blocking_send(event).map_err(|_| MidiError::QueueClosed)
    }

    /// Decode a received packet and enqueue every message it carries.
    ///
    /// Returns how many messages were queued.
    pub fn deliver_packet(&self, packet: &RawPacket) -> usize {
        packet.decode().filter(|msg| self.push(Event::Midi(*msg))).count()
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }

    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}

/// Outcome of waiting on the queue
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Received {
    Event(Event),
    /// Nothing arrived within the timeout
    Idle,
    /// Every sender is gone
    Closed,
}

/// Consumer half of the event queue, owned by the coordinator
#[derive(Debug)]
pub struct EventReceiver {
    rx: mpsc::Receiver<Event>,
    dropped: Arc<AtomicU64>,
}

impl EventReceiver {
    pub async fn recv_timeout(&mut self, wait: Duration) -> Received {
        match timeout(wait, self.rx.recv()).await {
            Ok(Some(event)) => Received::Event(event),
            Ok(None) => Received::Closed,
            Err(_) => Received::Idle,
        }
    }

    pub fn try_recv(&mut self) -> Option<Event> {
        self.rx.try_recv().ok()
    }

    /// Stop accepting events; queued ones can still be drained
    pub fn close(&mut self) {
        self.rx.close();
    }

    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}
