use crate::error::FramingError;

/// Marks the beginning of every message on the wire
pub const START_OF_MESSAGE: u8 = 0x7E;

/// Marks the end of every message on the wire
pub const END_OF_MESSAGE: u8 = 0xE7;

/// Largest payload the widget accepts in a single message
pub const MAX_PAYLOAD_LENGTH: usize = 600;

/// Bytes surrounding the payload: start, label, length (2), end
pub const FRAMING_OVERHEAD: usize = 5;

/// Message labels used by this driver.
///
/// The widget defines more labels than these, but anything else is passed through
/// as [`Label::Other`] so it can still be reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Label {
	/// Request or reply carrying the widget's timing parameters
	GetWidgetParameters,
	/// Output-only DMX packet
	SendDmxPacket,
	Other(u8),
}

impl Label {
	pub fn as_byte(self) -> u8 {
		return match self {
			Label::GetWidgetParameters => 3,
			Label::SendDmxPacket => 6,
			Label::Other(label) => label,
		};
	}
}

impl From<u8> for Label {
	fn from(value: u8) -> Self {
		return match value {
			3 => Label::GetWidgetParameters,
			6 => Label::SendDmxPacket,
			other => Label::Other(other),
		};
	}
}

/// A single framed message exchanged with the widget
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SerialMessage {
	pub label: Label,
	pub payload: Vec<u8>,
}

impl SerialMessage {
	pub fn new(label: Label, payload: Vec<u8>) -> Self {
		return SerialMessage { label, payload };
	}

	/// Serializes the message as `0x7E, label, lenLo, lenHi, payload..., 0xE7`.
	pub fn encode(&self) -> Result<Vec<u8>, FramingError> {
		let length = self.payload.len();
		if length > MAX_PAYLOAD_LENGTH {
			return Err(FramingError::PayloadTooLong(length));
		}

		let mut bytes = Vec::with_capacity(length + FRAMING_OVERHEAD);
		bytes.push(START_OF_MESSAGE);
		bytes.push(self.label.as_byte());
		bytes.extend_from_slice(&(length as u16).to_le_bytes());
		bytes.extend_from_slice(&self.payload);
		bytes.push(END_OF_MESSAGE);
		return Ok(bytes);
	}
}
