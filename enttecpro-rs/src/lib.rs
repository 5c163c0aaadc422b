//! Driver for the Enttec DMX USB Pro widget.
//!
//! The widget talks a small framed protocol over a USB virtual COM port:
//!
//! ```text
//! 0x7E, label, lenLo, lenHi, payload[len], 0xE7
//! ```
//!
//! This crate implements that framing ([`SerialMessage`], [`MessageDecoder`]), the
//! widget parameter query used to learn the output rate ([`WidgetParameters`]), DMX
//! packet output, and locating the widget among the system's serial ports.
//!
//! ```rust,no_run
//! use std::time::Duration;
//! use enttecpro::{EnttecPro, link};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let device = link::discover()?;
//! let port = link::open_port(&device.path, link::DEFAULT_BAUD_RATE, Duration::from_secs(1))?;
//! let mut widget = EnttecPro::new(port);
//!
//! let parameters = widget.get_widget_parameters()?;
//! println!("Widget runs at {} Hz", parameters.output_rate_hz);
//!
//! let mut packet = [0u8; 513];
//! packet[1] = 255;
//! widget.send_dmx(&packet)?;
//! # Ok(())
//! # }
//! ```

mod decoder;
mod error;
pub mod link;
mod message;
mod parameters;
mod widget;

#[cfg(test)]
mod tests;

pub use decoder::MessageDecoder;
pub use error::{DiscoveryError, EnttecError, FramingError};
pub use link::{DeviceCandidate, SerialLink};
pub use message::{Label, SerialMessage, END_OF_MESSAGE, MAX_PAYLOAD_LENGTH, START_OF_MESSAGE};
pub use parameters::{WidgetParameters, TIME_UNIT_MICROS};
pub use widget::{EnttecPro, DMX_PACKET_LENGTH};
