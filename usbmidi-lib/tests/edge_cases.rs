//! Tests for malformed input and boundary behavior

mod common;

use common::*;
use usbmidi_lib::{History, bend_value, decode, format_message, note_name};

#[test]
fn test_packet_too_short_for_a_stride() {
    let test_cases = vec![
        (vec![], "Empty packet"),
        (vec![0x09], "1 byte packet"),
        (vec![0x09, 0x90], "2 byte packet"),
        (vec![0x09, 0x90, 0x3C], "3 byte packet"),
    ];

    for (bytes_vec, description) in test_cases {
        assert_eq!(decode(&bytes_vec).count(), 0, "{}", description);
    }
}

#[test]
fn test_only_padding_strides() {
    let bytes = hex_to_bytes("0000000000000000");
    assert_eq!(decode(&bytes).count(), 0);
}

#[test]
fn test_padding_then_message() {
    let bytes = hex_to_bytes("000000000990457f");
    let messages: Vec<_> = decode(&bytes).collect();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].data1, 0x45);
}

#[test]
fn test_data_byte_in_status_position() {
    let bytes = hex_to_bytes("09403c64");
    let messages: Vec<_> = decode(&bytes).collect();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].kind(), MessageKind::Unrecognized);
    assert_eq!(messages[0].channel(), 0);
    assert_eq!(format_message(&messages[0]), "Unknown 0x40");
}

#[test]
fn test_out_of_range_data_bytes_pass_through() {
    let msg = DecodedMessage::new(0xB0, 200, 255);
    assert_eq!(format_message(&msg), "CC      Ch01 #200=255");
    // still total for notes past 127
    assert_eq!(note_name(255), "D#20");
}

#[test]
fn test_note_name_reference_points() {
    assert_eq!(note_name(60), "C4");
    assert_eq!(note_name(69), "A4");
    assert!(note_name(0).ends_with("-1"));
    assert_eq!(note_name(0), "C-1");
}

#[test]
fn test_pitch_bend_reference_points() {
    assert_eq!(bend_value(0, 0), -8192);
    assert_eq!(bend_value(0, 64), 0);
    assert_eq!(bend_value(127, 127), 8191);
}

#[test]
fn test_history_overflow_by_one() {
    let mut history: History<8> = History::new();
    for note in 0..9u8 {
        history.insert(DecodedMessage::new(0x90, note, 1));
    }
    assert_eq!(history.len(), 8);
    let notes: Vec<u8> = history.iter().map(|m| m.data1).collect();
    assert_eq!(notes, (1..9u8).rev().collect::<Vec<_>>());
}

#[test]
fn test_history_window_past_end() {
    let mut history: History<8> = History::new();
    history.insert(DecodedMessage::new(0x90, 1, 1));
    assert_eq!(history.window(0, 4).count(), 1);
    assert_eq!(history.window(1, 4).count(), 0);
}
