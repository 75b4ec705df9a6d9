use usbmidi_lib::list_midi_devices;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    println!("Listing USB MIDI devices...\n");
    let devices = list_midi_devices()?;

    if devices.is_empty() {
        println!("No USB MIDI devices found.");
        return Ok(());
    }

    for (i, device) in devices.iter().enumerate() {
        println!("Device #{}: {}", i + 1, device.name());
        println!("  VID: {:#06x}, PID: {:#06x}", device.vendor_id, device.product_id);
        println!("  Bus: {:03}, Address: {:03}", device.bus, device.address);
        println!(
            "  Manufacturer: {}",
            device.manufacturer.as_deref().unwrap_or("<Not available>")
        );
        println!("  Serial: {}", device.serial.as_deref().unwrap_or("<Not available>"));
        println!("  MIDI streaming interface: {}", device.interface);
        println!("---");
    }

    Ok(())
}
