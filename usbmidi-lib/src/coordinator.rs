//! The event coordinator: the single consumer of the event queue.
//!
//! All state shared with the display lives in one [`MonitorState`] behind one
//! lock. The lock is held only while an event is applied or while the visible
//! window is copied out; decoding and formatting happen outside it.

use crate::config::MonitorConfig;
use crate::constants::HISTORY_CAPACITY;
use crate::error::MidiError;
use crate::event::{Event, EventReceiver, InputEvent, InputKey, Received};
use crate::history::History;
use crate::message::DecodedMessage;
use crate::view::Viewport;
use std::ops::ControlFlow;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Everything the coordinator mutates and the display reads
#[derive(Debug, Clone)]
pub struct MonitorState<const N: usize = { HISTORY_CAPACITY }> {
    history: History<N>,
    view: Viewport,
    connected: bool,
    last_message_at: Option<Instant>,
}

impl<const N: usize> MonitorState<N> {
    pub fn new(window_size: usize) -> Self {
        Self {
            history: History::new(),
            view: Viewport::new(window_size),
            connected: false,
            last_message_at: None,
        }
    }

    pub fn history(&self) -> &History<N> {
        &self.history
    }

    pub fn view(&self) -> &Viewport {
        &self.view
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    pub fn last_message_at(&self) -> Option<Instant> {
        self.last_message_at
    }

    /// Apply one event. `Break` means the user asked to leave.
    pub fn apply(&mut self, event: &Event) -> ControlFlow<()> {
        match event {
            Event::Input(input) => return self.handle_input(*input),
            Event::Midi(message) => {
                self.history.insert(*message);
                self.last_message_at = Some(message.received_at);
                info!(
                    "MIDI message: Type={} Ch={} D1={} D2={}",
                    message.kind(),
                    message.channel(),
                    message.data1,
                    message.data2
                );
            }
            Event::Connectivity(connected) => {
                self.connected = *connected;
                info!("USB status: {}", if *connected { "Connected" } else { "Disconnected" });
            }
        }
        ControlFlow::Continue(())
    }

    fn handle_input(&mut self, input: InputEvent) -> ControlFlow<()> {
        if !input.is_actionable() {
            return ControlFlow::Continue(());
        }
        match input.key {
            InputKey::Up => {
                self.view.scroll_up();
            }
            InputKey::Down => {
                self.view.scroll_down(self.history.len());
            }
            InputKey::Confirm => {
                info!("Clearing MIDI message history");
                self.clear();
            }
            InputKey::Back => {
                info!("Exit requested");
                return ControlFlow::Break(());
            }
            InputKey::Left | InputKey::Right => debug!("Ignoring {:?}", input.key),
        }
        ControlFlow::Continue(())
    }

    /// Empty the history and scroll back to the top
    pub fn clear(&mut self) {
        self.history.clear();
        self.view.reset();
    }

    /// Copy of the messages currently in the visible window
    pub fn visible(&self) -> Vec<DecodedMessage> {
        self.history
            .window(self.view.offset(), self.view.window_size())
            .copied()
            .collect()
    }
}

/// What the display needs for one frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewSnapshot {
    pub connected: bool,
    /// Visible history, newest first, already formatted
    pub lines: Vec<String>,
    /// Valid history entries
    pub count: usize,
    pub offset: usize,
    pub window_size: usize,
    pub has_more_above: bool,
    pub has_more_below: bool,
    /// Time since the newest message was decoded
    pub last_message_age: Option<Duration>,
    pub dropped_events: u64,
}

/// The display collaborator. Rendering may be coalesced; every call carries
/// the complete current view.
pub trait Renderer {
    fn render(&mut self, view: &ViewSnapshot) -> Result<(), MidiError>;
}

/// Handle to the single lock guarding [`MonitorState`]
#[derive(Debug)]
pub struct SharedState<const N: usize = { HISTORY_CAPACITY }>(Arc<Mutex<MonitorState<N>>>);

impl<const N: usize> Clone for SharedState<N> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<const N: usize> SharedState<N> {
    pub fn new(state: MonitorState<N>) -> Self {
        Self(Arc::new(Mutex::new(state)))
    }

    /// Every mutation leaves the state consistent, so a poisoned lock is still usable
    pub fn lock(&self) -> MutexGuard<'_, MonitorState<N>> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn with<R>(&self, f: impl FnOnce(&mut MonitorState<N>) -> R) -> R {
        f(&mut self.lock())
    }

    pub fn snapshot(&self, dropped_events: u64) -> ViewSnapshot {
        let (visible, connected, count, view, last_message_at) = {
            let state = self.lock();
            (
                state.visible(),
                state.connected,
                state.history.len(),
                state.view,
                state.last_message_at,
            )
        };

        ViewSnapshot {
            connected,
            lines: visible.iter().map(DecodedMessage::to_string).collect(),
            count,
            offset: view.offset(),
            window_size: view.window_size(),
            has_more_above: view.has_more_above(),
            has_more_below: view.has_more_below(count),
            last_message_age: last_message_at.map(|at| at.elapsed()),
            dropped_events,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitReason {
    /// The user pressed Back
    Back,
    /// Every producer dropped its sender
    QueueClosed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub events: u64,
    pub midi_messages: u64,
    pub dropped_events: u64,
    pub exit: ExitReason,
}

/// Drains the event queue in arrival order and applies each event to the
/// shared state, redrawing after every event and on idle timeouts.
pub struct Coordinator<const N: usize = { HISTORY_CAPACITY }> {
    state: SharedState<N>,
    events: EventReceiver,
    config: MonitorConfig,
}

impl<const N: usize> Coordinator<N> {
    pub fn new(config: MonitorConfig, events: EventReceiver) -> Self {
        Self {
            state: SharedState::new(MonitorState::new(config.window_size)),
            events,
            config,
        }
    }

    pub fn state(&self) -> SharedState<N> {
        self.state.clone()
    }

    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    fn redraw<R: Renderer + ?Sized>(&self, renderer: &mut R) -> Result<(), MidiError> {
        renderer.render(&self.state.snapshot(self.events.dropped()))
    }

    /// Run until Back is pressed or every producer is gone.
    ///
    /// Events still queued when the loop exits are discarded.
    pub async fn run<R: Renderer + ?Sized>(mut self, renderer: &mut R) -> Result<RunSummary, MidiError> {
        info!("Entering main loop");
        self.redraw(renderer)?;

        let mut events = 0u64;
        let mut midi_messages = 0u64;
        let exit = loop {
            match self.events.recv_timeout(self.config.poll_timeout).await {
                Received::Event(event) => {
                    events += 1;
                    if matches!(event, Event::Midi(_)) {
                        midi_messages += 1;
                    }
                    let flow = self.state.with(|state| state.apply(&event));
                    self.redraw(renderer)?;
                    if flow.is_break() {
                        break ExitReason::Back;
                    }
                }
                Received::Idle => self.redraw(renderer)?,
                Received::Closed => {
                    warn!("All event producers are gone, leaving main loop");
                    break ExitReason::QueueClosed;
                }
            }
        };

        self.events.close();
        Ok(RunSummary {
            events,
            midi_messages,
            dropped_events: self.events.dropped(),
            exit,
        })
    }
}
