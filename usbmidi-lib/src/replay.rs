//! Replay of recorded USB-MIDI transfers from a text file.
//!
//! One transfer per line as hex, bytes optionally separated by whitespace.
//! Blank lines and lines starting with `#` are skipped.

use crate::error::MidiError;
use crate::event::{Event, EventSender};
use crate::packet::RawPacket;
use std::path::Path;
use std::time::Duration;
use tokio::time::sleep;
use tracing::info;

/// Parse replay text into packets, reporting the first malformed line
pub fn parse_replay(text: &str) -> Result<Vec<RawPacket>, MidiError> {
    text.lines()
        .enumerate()
        .map(|(idx, line)| (idx + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
        .map(|(line, content)| {
            let compact: String = content.split_whitespace().collect();
            hex::decode(compact)
                .map(RawPacket::from)
                .map_err(|source| MidiError::InvalidHex { line, source })
        })
        .collect()
}

pub async fn load_replay(path: impl AsRef<Path>) -> Result<Vec<RawPacket>, MidiError> {
    let text = tokio::fs::read_to_string(path.as_ref()).await?;
    let packets = parse_replay(&text)?;
    info!("Loaded {} packets from {}", packets.len(), path.as_ref().display());
    Ok(packets)
}

/// Producer task standing in for a live device: reports a connection, then
/// feeds each packet through the decoder with `interval` between packets.
pub async fn run_replay(packets: Vec<RawPacket>, sender: EventSender, interval: Duration) {
    info!("Starting replay of {} packets", packets.len());
    if sender.send(Event::Connectivity(true)).await.is_err() {
        return;
    }

    let mut delivered = 0usize;
    for packet in &packets {
        if sender.is_closed() {
            break;
        }
        delivered += sender.deliver_packet(packet);
        sleep(interval).await;
    }

    info!("Replay finished, {} messages queued", delivered);
}
