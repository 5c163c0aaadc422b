use std::{
	io::{self, Read, Write},
	time::Duration,
};

use serialport::{ClearBuffer, SerialPort, SerialPortInfo, SerialPortType};

use crate::error::{DiscoveryError, EnttecError};

/// USB vendor ID of FTDI, whose USB-serial bridge the widget is built around
pub const FTDI_VENDOR_ID: u16 = 0x0403;

/// USB product ID of the FT232R bridge
pub const FTDI_FT232R_PRODUCT_ID: u16 = 0x6001;

/// Line rate used by default. The widget enumerates as a virtual COM port, so this is nominal.
pub const DEFAULT_BAUD_RATE: u32 = 115_200;

/// Raw byte transport to the widget.
///
/// Reads are expected to honour a timeout and report it as [`io::ErrorKind::TimedOut`]
/// (or `WouldBlock`), which is how the driver notices that a reply has ended.
pub trait SerialLink: Read + Write + Send {
	/// Drops any bytes the OS has received but nobody has read yet
	fn clear_input(&mut self) -> io::Result<()>;

	/// Drops any bytes written but not yet transmitted
	fn clear_output(&mut self) -> io::Result<()>;
}

impl SerialLink for Box<dyn SerialPort> {
	fn clear_input(&mut self) -> io::Result<()> {
		return self.clear(ClearBuffer::Input).map_err(io::Error::from);
	}

	fn clear_output(&mut self) -> io::Result<()> {
		return self.clear(ClearBuffer::Output).map_err(io::Error::from);
	}
}

/// Opens the serial port at `path` for use with [`crate::EnttecPro`]
pub fn open_port(path: &str, baud_rate: u32, read_timeout: Duration) -> Result<Box<dyn SerialPort>, EnttecError> {
	let port = serialport::new(path, baud_rate).timeout(read_timeout).open()?;
	return Ok(port);
}

/// A serial port that looks like it belongs to a widget
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceCandidate {
	pub path: String,
	pub serial_number: Option<String>,
	pub manufacturer: Option<String>,
}

/// Picks widget candidates out of a port listing.
///
/// Ports whose USB manufacturer is ENTTEC win. If there are none, FTDI FT232R bridges
/// are returned instead, since some platforms do not report the manufacturer string.
pub fn select_candidates(ports: &[SerialPortInfo]) -> Vec<DeviceCandidate> {
	let usb_ports = ports.iter().filter_map(|port| match port.port_type {
		SerialPortType::UsbPort(ref usb) => Some((port, usb)),
		_ => None,
	});

	let (enttec, ftdi): (Vec<_>, Vec<_>) = usb_ports
		.filter(|(_, usb)| {
			is_enttec_manufacturer(usb.manufacturer.as_deref())
				|| (usb.vid == FTDI_VENDOR_ID && usb.pid == FTDI_FT232R_PRODUCT_ID)
		})
		.partition(|(_, usb)| is_enttec_manufacturer(usb.manufacturer.as_deref()));

	let chosen = if enttec.is_empty() { ftdi } else { enttec };
	return chosen
		.into_iter()
		.map(|(port, usb)| DeviceCandidate {
			path: port.port_name.clone(),
			serial_number: usb.serial_number.clone(),
			manufacturer: usb.manufacturer.clone(),
		})
		.collect();
}

/// Chooses one widget from a candidate list, warning when the choice is ambiguous
pub fn choose_candidate(mut candidates: Vec<DeviceCandidate>) -> Result<DeviceCandidate, DiscoveryError> {
	if candidates.is_empty() {
		return Err(DiscoveryError::DeviceNotFound);
	}
	if candidates.len() > 1 {
		log::warn!(
			"It appears that {} ENTTEC devices are connected. Using the first one ({})",
			candidates.len(),
			candidates[0].path,
		);
	}

	let candidate = candidates.swap_remove(0);
	log::info!(
		"Using ENTTEC device at {} with serial number {}",
		candidate.path,
		candidate.serial_number.as_deref().unwrap_or("<unknown>"),
	);
	return Ok(candidate);
}

/// Enumerates the system's serial ports and picks the widget
pub fn discover() -> Result<DeviceCandidate, DiscoveryError> {
	let ports = serialport::available_ports()?;
	return choose_candidate(select_candidates(&ports));
}

fn is_enttec_manufacturer(manufacturer: Option<&str>) -> bool {
	return manufacturer.map_or(false, |name| name.trim().eq_ignore_ascii_case("ENTTEC"));
}

#[cfg(test)]
mod tests {
	use super::*;
	use serialport::UsbPortInfo;

	fn usb_port(path: &str, vid: u16, pid: u16, manufacturer: Option<&str>) -> SerialPortInfo {
		return SerialPortInfo {
			port_name: path.into(),
			port_type: SerialPortType::UsbPort(UsbPortInfo {
				vid,
				pid,
				serial_number: Some(format!("SN-{path}")),
				manufacturer: manufacturer.map(String::from),
				product: None,
			}),
		};
	}

	#[test]
	fn prefers_enttec_manufacturer() {
		let ports = vec![
			usb_port("/dev/ttyUSB0", FTDI_VENDOR_ID, FTDI_FT232R_PRODUCT_ID, Some("FTDI")),
			usb_port("/dev/ttyUSB1", FTDI_VENDOR_ID, FTDI_FT232R_PRODUCT_ID, Some("Enttec")),
			SerialPortInfo { port_name: "/dev/ttyS0".into(), port_type: SerialPortType::Unknown },
		];
		let candidates = select_candidates(&ports);
		assert_eq!(candidates.len(), 1);
		assert_eq!(candidates[0].path, "/dev/ttyUSB1");
	}

	#[test]
	fn falls_back_to_ftdi_bridge() {
		let ports = vec![
			usb_port("/dev/ttyACM0", 0x2341, 0x0043, Some("Arduino")),
			usb_port("/dev/ttyUSB0", FTDI_VENDOR_ID, FTDI_FT232R_PRODUCT_ID, None),
		];
		let candidates = select_candidates(&ports);
		assert_eq!(candidates.len(), 1);
		assert_eq!(candidates[0].path, "/dev/ttyUSB0");
	}

	#[test]
	fn no_candidates_is_not_found() {
		let ports = vec![usb_port("/dev/ttyACM0", 0x2341, 0x0043, Some("Arduino"))];
		assert!(matches!(
			choose_candidate(select_candidates(&ports)),
			Err(DiscoveryError::DeviceNotFound),
		));
	}

	#[test_log::test]
	fn ambiguous_devices_use_the_first() {
		let ports = vec![
			usb_port("/dev/ttyUSB0", FTDI_VENDOR_ID, FTDI_FT232R_PRODUCT_ID, Some("ENTTEC")),
			usb_port("/dev/ttyUSB1", FTDI_VENDOR_ID, FTDI_FT232R_PRODUCT_ID, Some("ENTTEC")),
		];
		let chosen = choose_candidate(select_candidates(&ports)).unwrap();
		assert_eq!(chosen.path, "/dev/ttyUSB0");
		assert_eq!(chosen.serial_number.as_deref(), Some("SN-/dev/ttyUSB0"));
	}
}
