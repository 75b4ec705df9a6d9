//! End-to-end tests of the event loop: queue -> coordinator -> renderer

mod common;

use common::*;
use std::time::Duration;
use usbmidi_lib::{Coordinator, ExitReason, MonitorConfig, event_queue, parse_replay, run_replay};

fn test_config() -> MonitorConfig {
    init_tracing();
    MonitorConfig {
        poll_timeout: Duration::from_millis(20),
        ..MonitorConfig::default()
    }
}

#[tokio::test]
async fn test_events_applied_in_order_until_back() {
    let config = test_config();
    let (tx, rx) = event_queue(config.queue_depth);
    let coordinator: Coordinator<8> = Coordinator::new(config, rx);
    let state = coordinator.state();

    assert!(tx.push(Event::Connectivity(true)));
    for note in 60..66 {
        assert!(tx.push(note_on(note)));
    }
    assert!(tx.push(press(InputKey::Down)));
    assert!(tx.push(press(InputKey::Back)));
    // queued after Back, never applied
    assert!(tx.push(note_on(90)));

    let mut renderer = RecordingRenderer::default();
    let summary = coordinator.run(&mut renderer).await.unwrap();

    assert_eq!(summary.exit, ExitReason::Back);
    assert_eq!(summary.midi_messages, 6);
    assert_eq!(summary.events, 9);

    let view = renderer.last();
    assert!(view.connected);
    assert_eq!(view.count, 6);
    assert_eq!(view.offset, 1);
    assert!(view.has_more_above);
    assert!(view.has_more_below);
    assert_eq!(
        view.lines,
        vec![
            "NoteOn  Ch01 E4 Vel100",
            "NoteOn  Ch01 D#4 Vel100",
            "NoteOn  Ch01 D4 Vel100",
            "NoteOn  Ch01 C#4 Vel100",
        ]
    );

    let guard = state.lock();
    assert_eq!(guard.history().newest().map(|m| m.data1), Some(65));
}

#[tokio::test]
async fn test_redraw_after_every_event() {
    let config = MonitorConfig {
        poll_timeout: Duration::from_secs(5),
        ..MonitorConfig::default()
    };
    let (tx, rx) = event_queue(config.queue_depth);
    let coordinator: Coordinator<8> = Coordinator::new(config, rx);

    tx.push(note_on(60));
    tx.push(Event::Connectivity(true));
    tx.push(press(InputKey::Back));

    let mut renderer = RecordingRenderer::default();
    coordinator.run(&mut renderer).await.unwrap();

    // initial frame plus one per event
    assert_eq!(renderer.frames.len(), 4);
    assert!(!renderer.frames[0].connected);
    assert_eq!(renderer.frames[1].count, 1);
    assert!(renderer.frames[2].connected);
}

#[tokio::test]
async fn test_confirm_clears_history() {
    let config = test_config();
    let (tx, rx) = event_queue(config.queue_depth);
    let coordinator: Coordinator<8> = Coordinator::new(config, rx);

    for note in 0..8 {
        tx.push(note_on(note));
    }
    tx.push(press(InputKey::Down));
    tx.push(press(InputKey::Confirm));
    tx.push(press(InputKey::Back));

    let mut renderer = RecordingRenderer::default();
    coordinator.run(&mut renderer).await.unwrap();

    let view = renderer.last();
    assert_eq!(view.count, 0);
    assert_eq!(view.offset, 0);
    assert!(view.lines.is_empty());
    assert!(!view.has_more_above);
    assert!(!view.has_more_below);
}

#[tokio::test]
async fn test_loop_ends_when_producers_vanish() {
    let config = test_config();
    let (tx, rx) = event_queue(config.queue_depth);
    let coordinator: Coordinator<8> = Coordinator::new(config, rx);

    tx.push(note_on(60));
    drop(tx);

    let mut renderer = RecordingRenderer::default();
    let summary = coordinator.run(&mut renderer).await.unwrap();
    assert_eq!(summary.exit, ExitReason::QueueClosed);
    assert_eq!(summary.midi_messages, 1);
}

#[tokio::test]
async fn test_overflow_is_counted_not_fatal() {
    let config = MonitorConfig {
        queue_depth: 4,
        ..test_config()
    };
    let (tx, rx) = event_queue(config.queue_depth);
    let coordinator: Coordinator<8> = Coordinator::new(config, rx);

    let queued = (0..10).filter(|n| tx.push(note_on(*n))).count();
    assert_eq!(queued, 4);
    drop(tx);

    let mut renderer = RecordingRenderer::default();
    let summary = coordinator.run(&mut renderer).await.unwrap();
    assert_eq!(summary.midi_messages, 4);
    assert_eq!(summary.dropped_events, 6);
    assert_eq!(renderer.last().dropped_events, 6);
}

#[tokio::test]
async fn test_replay_feeds_history() {
    let config = test_config();
    let (tx, rx) = event_queue(config.queue_depth);
    let coordinator: Coordinator<8> = Coordinator::new(config, rx);
    let packets = parse_replay(KEYBOARD_CAPTURE).unwrap();

    let producer = tokio::spawn(async move {
        run_replay(packets, tx.clone(), Duration::from_millis(1)).await;
        tx.send(press(InputKey::Back)).await.unwrap();
    });

    let mut renderer = RecordingRenderer::default();
    let summary = coordinator.run(&mut renderer).await.unwrap();
    producer.await.unwrap();

    assert_eq!(summary.exit, ExitReason::Back);
    assert_eq!(summary.midi_messages, 5);

    let view = renderer.last();
    assert!(view.connected);
    assert_eq!(view.count, 5);
    assert_eq!(
        view.lines,
        vec![
            "System  0xF8",
            "PitchBd Ch01 +2048",
            "CC      Ch01 #001=064",
            "NoteOff Ch01 C4 Vel000",
        ]
    );
    assert!(view.has_more_below);
}
