//! Terminal display and keyboard input for the monitor.

use crossterm::event::{self, Event as TermEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    DefaultTerminal, Frame,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use std::io;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{debug, warn};
use usbmidi_lib::{Event, EventSender, InputEvent, InputKey, InputPhase, MidiError, Renderer, ViewSnapshot};

const TITLE: &str = "USB MIDI Monitor";
const INPUT_POLL: Duration = Duration::from_millis(100);

/// Full-screen terminal renderer. Restores the terminal when dropped.
pub struct TerminalDisplay {
    terminal: DefaultTerminal,
}

impl TerminalDisplay {
    pub fn new() -> io::Result<Self> {
        Ok(Self {
            terminal: ratatui::try_init()?,
        })
    }
}

impl Drop for TerminalDisplay {
    fn drop(&mut self) {
        ratatui::restore();
    }
}

impl Renderer for TerminalDisplay {
    fn render(&mut self, view: &ViewSnapshot) -> Result<(), MidiError> {
        self.terminal.draw(|frame| draw(frame, view))?;
        Ok(())
    }
}

fn draw(frame: &mut Frame, view: &ViewSnapshot) {
    // window plus the block borders
    let history_height = u16::try_from(view.window_size)
        .unwrap_or(u16::MAX)
        .saturating_add(2);
    let [header, status, history, footer] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Length(history_height),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    frame.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled(TITLE, Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(format!("  v{}", env!("CARGO_PKG_VERSION"))),
        ])),
        header,
    );

    let usb = if view.connected {
        Span::styled("USB: Connected", Style::default().fg(Color::Green))
    } else {
        Span::styled("USB: Waiting...", Style::default().fg(Color::Yellow))
    };
    let mut status_line = vec![usb];
    if let Some(age) = view.last_message_age {
        status_line.push(Span::raw(format!("  last {:.1}s ago", age.as_secs_f32())));
    }
    if view.dropped_events > 0 {
        status_line.push(Span::raw(format!("  dropped {}", view.dropped_events)).red());
    }
    frame.render_widget(Paragraph::new(Line::from(status_line)).centered(), status);

    draw_history(frame, history, view);

    let mut hints = vec![Span::raw("Back: exit  OK: clear")];
    if view.has_more_above {
        hints.push(Span::raw("  ↑"));
    }
    if view.has_more_below {
        hints.push(Span::raw("  ↓"));
    }
    frame.render_widget(Paragraph::new(Line::from(hints)), footer);
}

fn draw_history(frame: &mut Frame, area: Rect, view: &ViewSnapshot) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" {} messages ", view.count));

    let body = if view.count == 0 {
        Paragraph::new("Waiting for MIDI...").centered().dim()
    } else {
        let lines: Vec<Line> = view.lines.iter().map(|l| Line::raw(l.as_str())).collect();
        Paragraph::new(lines)
    };
    frame.render_widget(body.block(block), area);
}

fn map_key(key: &KeyEvent) -> Option<InputKey> {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(InputKey::Back);
    }
    match key.code {
        KeyCode::Up | KeyCode::Char('k') => Some(InputKey::Up),
        KeyCode::Down | KeyCode::Char('j') => Some(InputKey::Down),
        KeyCode::Left => Some(InputKey::Left),
        KeyCode::Right => Some(InputKey::Right),
        KeyCode::Enter | KeyCode::Char(' ') => Some(InputKey::Confirm),
        KeyCode::Esc | KeyCode::Backspace | KeyCode::Char('q') => Some(InputKey::Back),
        _ => None,
    }
}

fn map_phase(kind: KeyEventKind) -> InputPhase {
    match kind {
        KeyEventKind::Press => InputPhase::Press,
        KeyEventKind::Repeat => InputPhase::Repeat,
        KeyEventKind::Release => InputPhase::Release,
    }
}

/// Read keys on a dedicated thread and queue them for the coordinator.
///
/// Key events wait for queue space rather than being dropped. The thread
/// exits once the coordinator closes the queue.
pub fn spawn_input_thread(sender: EventSender) -> JoinHandle<()> {
    thread::spawn(move || {
        while !sender.is_closed() {
            match event::poll(INPUT_POLL) {
                Ok(false) => continue,
                Ok(true) => {}
                Err(e) => {
                    warn!("Failed to poll terminal input: {}", e);
                    break;
                }
            }
            let key = match event::read() {
                Ok(TermEvent::Key(key)) => key,
                Ok(_) => continue,
                Err(e) => {
                    warn!("Failed to read terminal input: {}", e);
                    break;
                }
            };
            let Some(input_key) = map_key(&key) else {
                continue;
            };
            debug!("Key {:?} {:?}", input_key, key.kind);
            let input = InputEvent::new(input_key, map_phase(key.kind));
            if sender.send_blocking(Event::Input(input)).is_err() {
                break;
            }
        }
        debug!("Input thread terminated");
    })
}
