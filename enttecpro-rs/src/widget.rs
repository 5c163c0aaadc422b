use std::io::{self, ErrorKind, Read, Write};

use crate::{
	decoder::MessageDecoder,
	error::{EnttecError, FramingError},
	message::{Label, SerialMessage, END_OF_MESSAGE},
	parameters::WidgetParameters,
};

/// Start code plus 512 channels
pub const DMX_PACKET_LENGTH: usize = 513;

const READ_CHUNK: usize = 64;

/// Driver for an Enttec DMX USB Pro widget on top of any [`SerialLink`](crate::SerialLink).
///
/// The driver is synchronous and meant to be owned by a single thread, so messages
/// never interleave on the line.
pub struct EnttecPro<L> {
	link: L,
	decoder: MessageDecoder,
}

impl<L: crate::SerialLink> EnttecPro<L> {
	pub fn new(link: L) -> Self {
		return EnttecPro {
			link,
			decoder: MessageDecoder::new(),
		};
	}

	/// Gives the underlying link back
	pub fn into_inner(self) -> L {
		return self.link;
	}

	/// Frames and writes a message.
	///
	/// If the write fails partway, the unsent remainder is discarded so the next message
	/// starts on a clean line.
	pub fn send_message(&mut self, message: &SerialMessage) -> Result<(), EnttecError> {
		let bytes = message.encode()?;
		let written = self.link.write_all(&bytes).and_then(|()| self.link.flush());
		if let Err(err) = written {
			self.discard_output();
			return Err(err.into());
		}
		return Ok(());
	}

	/// Blocks until one complete message has been received.
	///
	/// A read timeout with nothing buffered is reported as [`EnttecError::Timeout`]; a
	/// timeout in the middle of a message is a framing error.
	pub fn read_message(&mut self) -> Result<SerialMessage, EnttecError> {
		let mut chunk = [0u8; READ_CHUNK];
		loop {
			if let Some(message) = self.decoder.decode()? {
				return Ok(message);
			}

			match self.link.read(&mut chunk) {
				Ok(0) => return self.idle(),
				Ok(count) => self.decoder.push(&chunk[..count]),
				Err(err) if err.kind() == ErrorKind::Interrupted => continue,
				Err(err) if is_timeout(&err) => return self.idle(),
				Err(err) => return Err(err.into()),
			}
		}
	}

	/// Queries the widget's timing parameters.
	///
	/// Pending input is flushed first so a stale reply cannot be mistaken for the answer.
	/// The exchange is attempted once; failures are returned to the caller.
	pub fn get_widget_parameters(&mut self) -> Result<WidgetParameters, EnttecError> {
		self.link.clear_input()?;
		self.decoder.clear();

		let request = SerialMessage::new(Label::GetWidgetParameters, vec![0, 0]);
		self.send_message(&request)?;

		let reply = self.read_message()?;
		if reply.label != request.label {
			return Err(EnttecError::UnexpectedLabel {
				expected: request.label.as_byte(),
				received: reply.label.as_byte(),
			});
		}

		// Break, mark-after-break and rate never reach 0xE7. A terminator among them means a
		// short reply was completed by whatever bytes followed it.
		if let Some(offset) = reply.payload.get(2..5).and_then(|timing| timing.iter().position(|byte| *byte == END_OF_MESSAGE)) {
			return Err(FramingError::LengthMismatch {
				declared: reply.payload.len(),
				actual: offset + 2,
			}.into());
		}

		let parameters = WidgetParameters::from_payload(&reply.payload)?;
		log::debug!("Widget parameters: {:?}", parameters);
		return Ok(parameters);
	}

	/// Sends one DMX packet (start code followed by 512 channels). The widget does not acknowledge it.
	pub fn send_dmx(&mut self, packet: &[u8]) -> Result<(), EnttecError> {
		if packet.len() != DMX_PACKET_LENGTH || packet[0] != 0 {
			return Err(EnttecError::InvalidDmxPacket {
				length: packet.len(),
				start_code: packet.first().copied().unwrap_or(0),
			});
		}
		return self.send_message(&SerialMessage::new(Label::SendDmxPacket, packet.to_vec()));
	}

	fn discard_output(&mut self) {
		if let Err(err) = self.link.clear_output() {
			log::error!("Could not discard a partly written message, the next frame may arrive corrupted: {}", err);
		}
	}

	fn idle(&mut self) -> Result<SerialMessage, EnttecError> {
		if self.decoder.has_partial() {
			self.decoder.finish_idle()?;
		}
		return Err(EnttecError::Timeout);
	}
}

fn is_timeout(err: &io::Error) -> bool {
	return matches!(err.kind(), ErrorKind::TimedOut | ErrorKind::WouldBlock);
}
