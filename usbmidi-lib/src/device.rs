use crate::constants::{RECEIVE_BUFFER_SIZE, USB_CLASS_AUDIO, USB_SUBCLASS_MIDI_STREAMING};
use crate::error::MidiError;
use crate::event::{Event, EventSender};
use crate::packet::RawPacket;
use nusb::transfer::{EndpointType, RequestBuffer};
use nusb::{DeviceInfo, Interface};
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info, warn};

/// Restrict the device search to a vendor and/or product
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeviceFilter {
    pub vendor_id: Option<u16>,
    pub product_id: Option<u16>,
}

impl DeviceFilter {
    pub fn matches(&self, info: &DeviceInfo) -> bool {
        self.vendor_id.is_none_or(|vid| vid == info.vendor_id())
            && self.product_id.is_none_or(|pid| pid == info.product_id())
    }
}

/// Summary of a device that exposes a MIDI streaming interface
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MidiDeviceInfo {
    pub vendor_id: u16,
    pub product_id: u16,
    pub bus: u8,
    pub address: u8,
    pub manufacturer: Option<String>,
    pub product: Option<String>,
    pub serial: Option<String>,
    pub interface: u8,
}

impl MidiDeviceInfo {
    fn from_info(info: &DeviceInfo, interface: u8) -> Self {
        Self {
            vendor_id: info.vendor_id(),
            product_id: info.product_id(),
            bus: info.bus_number(),
            address: info.device_address(),
            manufacturer: info.manufacturer_string().map(str::to_owned),
            product: info.product_string().map(str::to_owned),
            serial: info.serial_number().map(str::to_owned),
            interface,
        }
    }

    pub fn name(&self) -> String {
        self.product
            .clone()
            .unwrap_or_else(|| format!("{:04x}:{:04x}", self.vendor_id, self.product_id))
    }
}

fn midi_interface(info: &DeviceInfo) -> Option<u8> {
    info.interfaces()
        .find(|i| i.class() == USB_CLASS_AUDIO && i.subclass() == USB_SUBCLASS_MIDI_STREAMING)
        .map(|i| i.interface_number())
}

/// List every connected device with a MIDI streaming interface
pub fn list_midi_devices() -> Result<Vec<MidiDeviceInfo>, MidiError> {
    let devices = nusb::list_devices().map_err(MidiError::Usb)?;
    Ok(devices
        .filter_map(|info| midi_interface(&info).map(|iface| MidiDeviceInfo::from_info(&info, iface)))
        .collect())
}

/// A claimed MIDI streaming interface and its IN endpoint
pub struct UsbMidiDevice {
    interface: Interface,
    endpoint_in: u8,
    endpoint_type: EndpointType,
    info: MidiDeviceInfo,
}

impl UsbMidiDevice {
    /// Find, open and claim the first matching USB-MIDI device
    pub async fn open(filter: &DeviceFilter) -> Result<Self, MidiError> {
        debug!("Searching for USB MIDI device ({:?})...", filter);
        let (device_info, iface) = nusb::list_devices()
            .map_err(MidiError::Usb)?
            .filter(|d| filter.matches(d))
            .find_map(|d| midi_interface(&d).map(|iface| (d, iface)))
            .ok_or(MidiError::DeviceNotFound)?;
        let info = MidiDeviceInfo::from_info(&device_info, iface);

        info!(
            "Found {} on bus {} addr {} (interface {})",
            info.name(),
            info.bus,
            info.address,
            iface
        );

        let device = device_info.open().map_err(MidiError::Usb)?;
        let (endpoint_in, endpoint_type) = {
            let config = device
                .active_configuration()
                .map_err(|e| MidiError::Descriptor(e.to_string()))?;
            let mut found = None;
            'search: for group in config.interfaces() {
                for alt in group.alt_settings() {
                    if alt.interface_number() != iface {
                        continue;
                    }
                    for ep in alt.endpoints() {
                        // bit 7 set = IN
                        let is_in = ep.address() & 0x80 != 0;
                        if is_in && matches!(ep.transfer_type(), EndpointType::Bulk | EndpointType::Interrupt) {
                            found = Some((ep.address(), ep.transfer_type()));
                            break 'search;
                        }
                    }
                }
            }
            found.ok_or(MidiError::NoMidiInterface)?
        };

        let interface = device.detach_and_claim_interface(iface).map_err(MidiError::Usb)?;
        info!("Interface claimed, reading from endpoint {:#04x} ({:?})", endpoint_in, endpoint_type);

        Ok(Self {
            interface,
            endpoint_in,
            endpoint_type,
            info,
        })
    }

    pub fn info(&self) -> &MidiDeviceInfo {
        &self.info
    }

    /// Wait for the next transfer from the device and return its bytes
    pub async fn receive(&self) -> Result<RawPacket, MidiError> {
        let buffer = RequestBuffer::new(RECEIVE_BUFFER_SIZE);
        let completion = match self.endpoint_type {
            EndpointType::Interrupt => self.interface.interrupt_in(self.endpoint_in, buffer).await,
            _ => self.interface.bulk_in(self.endpoint_in, buffer).await,
        };
        let data = completion.into_result()?;
        debug!("Received {} bytes", data.len());
        Ok(RawPacket::from(data))
    }
}

/// Producer task for a live device.
///
/// Probes for a device every `reconnect` until one opens, then feeds every
/// received transfer through the decoder into `sender`. Connectivity events
/// are sent on each transition. Returns once the queue is closed.
pub async fn run_usb_receiver(filter: DeviceFilter, sender: EventSender, reconnect: Duration) {
    info!("Starting USB MIDI receiver");

    while !sender.is_closed() {
        match UsbMidiDevice::open(&filter).await {
            Ok(device) => {
                if sender.send(Event::Connectivity(true)).await.is_err() {
                    break;
                }
                receive_until_error(&device, &sender).await;
                warn!("Lost connection to {}", device.info().name());
                if sender.send(Event::Connectivity(false)).await.is_err() {
                    break;
                }
            }
            Err(MidiError::DeviceNotFound) => debug!("No USB MIDI device yet"),
            Err(e) => warn!("Failed to open USB MIDI device: {}", e),
        }
        sleep(reconnect).await;
    }

    info!("USB MIDI receiver terminated");
}

async fn receive_until_error(device: &UsbMidiDevice, sender: &EventSender) {
    while !sender.is_closed() {
        match device.receive().await {
            Ok(packet) => {
                sender.deliver_packet(&packet);
            }
            Err(e) => {
                warn!("USB receive failed: {}", e);
                return;
            }
        }
    }
}
