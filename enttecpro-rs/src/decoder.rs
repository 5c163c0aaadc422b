use crate::{
	error::FramingError,
	message::{Label, SerialMessage, END_OF_MESSAGE, MAX_PAYLOAD_LENGTH, START_OF_MESSAGE},
};

/// Start delimiter, label and the two length bytes
const HEADER_LENGTH: usize = 4;

/// Incremental decoder for widget messages.
///
/// Bytes are fed in with [`MessageDecoder::push`] in whatever chunks the transport
/// produces, and complete messages are pulled out with [`MessageDecoder::decode`].
/// The decoder never blocks, so the same instance works behind a blocking serial
/// port, an async stream or a test buffer.
///
/// ```rust
/// # use enttecpro::{MessageDecoder, Label};
/// let mut decoder = MessageDecoder::new();
/// decoder.push(&[0x00, 0x7E, 3, 5, 0, 1, 0]);
/// assert!(decoder.decode().unwrap().is_none());
///
/// decoder.push(&[10, 5, 25, 0xE7]);
/// let message = decoder.decode().unwrap().unwrap();
/// assert_eq!(message.label, Label::GetWidgetParameters);
/// assert_eq!(message.payload, vec![1, 0, 10, 5, 25]);
/// ```
#[derive(Debug, Default)]
pub struct MessageDecoder {
	buffer: Vec<u8>,
}

impl MessageDecoder {
	pub fn new() -> Self {
		return MessageDecoder { buffer: Vec::new() };
	}

	/// Appends raw bytes received from the line
	pub fn push(&mut self, bytes: &[u8]) {
		self.buffer.extend_from_slice(bytes);
	}

	/// Discards everything buffered so far
	pub fn clear(&mut self) {
		self.buffer.clear();
	}

	/// Indicates whether a message has started but not yet completed
	pub fn has_partial(&self) -> bool {
		return self.buffer.contains(&START_OF_MESSAGE);
	}

	/// Attempts to assemble the next message from the buffered bytes.
	///
	/// Returns `Ok(None)` when more bytes are needed. On a framing error the offending
	/// start delimiter is dropped so the next call resynchronises on the following one.
	pub fn decode(&mut self) -> Result<Option<SerialMessage>, FramingError> {
		self.skip_to_start();
		if self.buffer.len() < HEADER_LENGTH {
			return Ok(None);
		}

		let declared = self.declared_length();
		if declared > MAX_PAYLOAD_LENGTH {
			self.resync();
			return Err(FramingError::PayloadTooLong(declared));
		}

		let end = HEADER_LENGTH + declared;
		if self.buffer.len() <= end {
			return Ok(None);
		}

		if self.buffer[end] != END_OF_MESSAGE {
			// The payload runs past its declared length. Report up to the next terminator if we have one.
			let actual = self.buffer[end..]
				.iter()
				.position(|byte| *byte == END_OF_MESSAGE)
				.map_or(self.buffer.len() - HEADER_LENGTH, |offset| declared + offset);
			self.resync();
			return Err(FramingError::LengthMismatch { declared, actual });
		}

		let label = Label::from(self.buffer[1]);
		let payload = self.buffer[HEADER_LENGTH..end].to_vec();
		self.buffer.drain(..=end);
		return Ok(Some(SerialMessage::new(label, payload)));
	}

	/// Called when the line has gone quiet.
	///
	/// A started message that is still incomplete at this point can never be
	/// completed. If it was already terminated early, its payload was shorter than
	/// declared. The partial message is discarded either way.
	pub fn finish_idle(&mut self) -> Result<(), FramingError> {
		self.skip_to_start();
		if self.buffer.is_empty() {
			return Ok(());
		}

		let result = if self.buffer.len() < HEADER_LENGTH {
			Err(FramingError::Truncated { declared: 0, received: 0 })
		} else {
			let declared = self.declared_length();
			let received = &self.buffer[HEADER_LENGTH..];
			match received.iter().position(|byte| *byte == END_OF_MESSAGE) {
				Some(actual) => Err(FramingError::LengthMismatch { declared, actual }),
				None => Err(FramingError::Truncated { declared, received: received.len() }),
			}
		};
		self.buffer.clear();
		return result;
	}

	fn declared_length(&self) -> usize {
		return u16::from_le_bytes([self.buffer[2], self.buffer[3]]) as usize;
	}

	fn skip_to_start(&mut self) {
		match self.buffer.iter().position(|byte| *byte == START_OF_MESSAGE) {
			Some(0) => {}
			Some(index) => {
				self.buffer.drain(..index);
			}
			None => self.buffer.clear(),
		}
	}

	fn resync(&mut self) {
		self.buffer.drain(..1);
	}
}
