use clap::Parser;
use serde::Serialize;
use std::error::Error;
use std::io::{self, Read};
use tracing::{debug, info};
use usbmidi_lib::{DecodedMessage, MessageKind, parse_replay};

/// Decode USB-MIDI packets given as hex and print one line per message.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Packets as hex (e.g. 09903c64). Read from stdin, one per line, when omitted
    packets: Vec<String>,

    /// Print JSON objects instead of display lines
    #[arg(long)]
    json: bool,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Serialize)]
struct MessageRecord {
    status: u8,
    kind: MessageKind,
    channel: Option<u8>,
    data1: u8,
    data2: u8,
    text: String,
}

impl From<&DecodedMessage> for MessageRecord {
    fn from(msg: &DecodedMessage) -> Self {
        let kind = msg.kind();
        Self {
            status: msg.status,
            kind,
            channel: kind.is_channel_message().then(|| msg.channel() + 1),
            data1: msg.data1,
            data2: msg.data2,
            text: msg.to_string(),
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    let log_level = if args.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_writer(io::stderr)
        .init();

    let text = if args.packets.is_empty() {
        let mut input = String::new();
        io::stdin().read_to_string(&mut input)?;
        input
    } else {
        args.packets.join("\n")
    };
    let packets = parse_replay(&text)?;
    debug!("Decoding {} packets", packets.len());

    let mut count = 0usize;
    for packet in &packets {
        for msg in packet.decode() {
            count += 1;
            if args.json {
                println!("{}", serde_json::to_string(&MessageRecord::from(&msg))?);
            } else {
                println!("{}  {}", hex::encode([msg.status, msg.data1, msg.data2]), msg);
            }
        }
    }

    info!("Decoded {} messages from {} packets", count, packets.len());
    Ok(())
}
