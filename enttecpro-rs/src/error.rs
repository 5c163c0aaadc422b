use std::io;

use thiserror::Error;

/// Problems with the shape of a message on the wire
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FramingError {
	#[error("Message declared a {declared} byte payload but carried {actual} bytes")]
	LengthMismatch { declared: usize, actual: usize },

	#[error("Message declared a {declared} byte payload but the line went idle after {received} bytes")]
	Truncated { declared: usize, received: usize },

	#[error("Payload of {0} bytes exceeds the widget's 600 byte limit")]
	PayloadTooLong(usize),
}

/// Errors returned while talking to the widget
#[derive(Error, Debug)]
pub enum EnttecError {
	#[error("Serial I/O failed: {0}")]
	Io(#[from] io::Error),

	#[error("Serial port error: {0}")]
	Serial(#[from] serialport::Error),

	#[error("Protocol framing error: {0}")]
	Framing(#[from] FramingError),

	#[error("Expected a reply with label {expected} but the widget answered with label {received}")]
	UnexpectedLabel { expected: u8, received: u8 },

	#[error("The widget did not reply before the read timeout")]
	Timeout,

	#[error("Invalid reply from widget: {0}")]
	InvalidResponse(String),

	#[error("A DMX packet must be 513 bytes starting with a zero start code (got {length} bytes, start code {start_code})")]
	InvalidDmxPacket { length: usize, start_code: u8 },
}

/// Errors returned while locating the widget among the system's serial ports
#[derive(Error, Debug)]
pub enum DiscoveryError {
	#[error("There is no serial port with manufacturer ENTTEC or an FTDI bridge")]
	DeviceNotFound,

	#[error("Could not enumerate serial ports: {0}")]
	Enumeration(#[from] serialport::Error),
}
