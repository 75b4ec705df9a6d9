mod tui;

use anyhow::{Context, Result};
use clap::Parser;
use clap_verbosity_flag::{InfoLevel, Verbosity};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{error, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};
use usbmidi_lib::constants::{EVENT_QUEUE_DEPTH, HISTORY_CAPACITY, WINDOW_SIZE};
use usbmidi_lib::{Coordinator, DeviceFilter, MonitorConfig, event_queue, load_replay, run_replay, run_usb_receiver};

/// Watch MIDI traffic from a USB-MIDI device (or a recorded capture).
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Replay hex packets from a file instead of reading a USB device
    #[arg(long, value_name = "FILE")]
    replay: Option<PathBuf>,

    /// Delay between replayed packets in milliseconds
    #[arg(long, default_value_t = 50)]
    replay_interval_ms: u64,

    /// Only use the device with this vendor ID (hex)
    #[arg(long, value_parser = parse_hex_u16)]
    vid: Option<u16>,

    /// Only use the device with this product ID (hex)
    #[arg(long, value_parser = parse_hex_u16)]
    pid: Option<u16>,

    /// Number of history lines visible at once
    #[arg(long, default_value_t = WINDOW_SIZE as u16, value_parser = clap::value_parser!(u16).range(1..=64))]
    window: u16,

    /// Pending events held before new ones are dropped
    #[arg(long, default_value_t = EVENT_QUEUE_DEPTH)]
    queue_depth: usize,

    /// Idle redraw interval in milliseconds
    #[arg(long, default_value_t = 100)]
    poll_ms: u64,

    /// Interval between USB device probes while disconnected, in milliseconds
    #[arg(long, default_value_t = 1000)]
    reconnect_ms: u64,

    /// Log file (the terminal is taken by the UI)
    #[arg(long, default_value = "usbmidi.log")]
    log_file: PathBuf,

    #[command(flatten)]
    verbose: Verbosity<InfoLevel>,
}

fn parse_hex_u16(s: &str) -> Result<u16, String> {
    let digits = s.trim_start_matches("0x").trim_start_matches("0X");
    u16::from_str_radix(digits, 16).map_err(|e| format!("invalid hex ID '{}': {}", s, e))
}

fn init_logging(cli: &Cli) -> Result<WorkerGuard> {
    let dir = cli
        .log_file
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| std::path::Path::new("."));
    let file_name = cli.log_file.file_name().context("Log file path has no file name")?;
    let appender = tracing_appender::rolling::never(dir, file_name);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let filter = EnvFilter::builder()
        .with_default_directive(cli.verbose.tracing_level_filter().into())
        .from_env_lossy();

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(writer).with_ansi(false))
        .init();
    Ok(guard)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let _guard = init_logging(&cli)?;

    if let Err(e) = run(cli).await {
        error!("Application failed: {:?}", e);
        return Err(e);
    }
    Ok(())
}

async fn run(cli: Cli) -> Result<()> {
    info!("USB MIDI monitor starting...");

    let config = MonitorConfig {
        window_size: usize::from(cli.window),
        queue_depth: cli.queue_depth.max(1),
        poll_timeout: Duration::from_millis(cli.poll_ms),
    };
    let (sender, receiver) = event_queue(config.queue_depth);
    let coordinator: Coordinator<HISTORY_CAPACITY> = Coordinator::new(config, receiver);

    let producer = match &cli.replay {
        Some(path) => {
            let packets = load_replay(path)
                .await
                .with_context(|| format!("Failed to load replay file {}", path.display()))?;
            let interval = Duration::from_millis(cli.replay_interval_ms);
            tokio::spawn(run_replay(packets, sender.clone(), interval))
        }
        None => {
            let filter = DeviceFilter {
                vendor_id: cli.vid,
                product_id: cli.pid,
            };
            let reconnect = Duration::from_millis(cli.reconnect_ms);
            tokio::spawn(run_usb_receiver(filter, sender.clone(), reconnect))
        }
    };

    let input = tui::spawn_input_thread(sender);
    let mut display = tui::TerminalDisplay::new().context("Failed to set up the terminal")?;
    info!("Display initialized, entering main loop");

    let result = coordinator.run(&mut display).await;
    drop(display);

    info!("Cleaning up...");
    producer.abort();
    if input.join().is_err() {
        error!("Input thread panicked");
    }

    let summary = result.context("Display failed")?;
    info!(
        "USB MIDI monitor stopped ({:?}): {} events, {} MIDI messages, {} dropped",
        summary.exit, summary.events, summary.midi_messages, summary.dropped_events
    );
    Ok(())
}
