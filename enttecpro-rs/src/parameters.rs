use std::time::Duration;

use crate::error::EnttecError;

/// Duration of one break/mark-after-break unit reported by the widget, in microseconds
pub const TIME_UNIT_MICROS: f64 = 10.67;

/// Timing configuration reported by the widget in reply to a parameter request
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WidgetParameters {
	pub firmware_version: u16,
	/// DMX output break time, in 10.67µs units
	pub break_time: u8,
	/// DMX output mark-after-break time, in 10.67µs units
	pub mark_after_break_time: u8,
	/// DMX output rate in packets per second. Zero means "as fast as possible" on the
	/// widget side and leaves the host without a usable rate.
	pub output_rate_hz: u8,
}

impl WidgetParameters {
	/// Parses a `[fwLo, fwHi, break, markAfterBreak, rate, ...]` reply payload.
	///
	/// Trailing user configuration bytes are ignored.
	pub fn from_payload(payload: &[u8]) -> Result<Self, EnttecError> {
		if payload.len() < 5 {
			return Err(EnttecError::InvalidResponse(format!(
				"widget parameters need 5 bytes, got {}",
				payload.len(),
			)));
		}

		return Ok(WidgetParameters {
			firmware_version: u16::from_le_bytes([payload[0], payload[1]]),
			break_time: payload[2],
			mark_after_break_time: payload[3],
			output_rate_hz: payload[4],
		});
	}

	pub fn break_time_micros(&self) -> f64 {
		return f64::from(self.break_time) * TIME_UNIT_MICROS;
	}

	pub fn mark_after_break_time_micros(&self) -> f64 {
		return f64::from(self.mark_after_break_time) * TIME_UNIT_MICROS;
	}

	/// Effective output rate once capped by the host, or `None` if the widget reports no rate.
	pub fn effective_rate_hz(&self, limit_hz: u8) -> Option<u8> {
		return match self.output_rate_hz.min(limit_hz) {
			0 => None,
			rate => Some(rate),
		};
	}

	/// Time between two DMX packets when sending at [`WidgetParameters::effective_rate_hz`]
	pub fn tick_period(&self, limit_hz: u8) -> Option<Duration> {
		return self
			.effective_rate_hz(limit_hz)
			.map(|rate| Duration::from_nanos(1_000_000_000 / u64::from(rate)));
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parses_reference_reply() {
		let parameters = WidgetParameters::from_payload(&[1, 0, 10, 5, 25]).unwrap();
		assert_eq!(parameters.firmware_version, 1);
		assert_eq!(parameters.output_rate_hz, 25);
		assert!((parameters.break_time_micros() - 106.7).abs() < 1e-9);
		assert!((parameters.mark_after_break_time_micros() - 53.35).abs() < 1e-9);
		assert_eq!(parameters.tick_period(25), Some(Duration::from_millis(40)));
	}

	#[test]
	fn firmware_version_is_little_endian() {
		let parameters = WidgetParameters::from_payload(&[0x44, 0x01, 9, 1, 40, 0xAA, 0xBB]).unwrap();
		assert_eq!(parameters.firmware_version, 0x0144);
	}

	#[test]
	fn rate_is_capped_by_host_limit() {
		let parameters = WidgetParameters::from_payload(&[1, 0, 9, 1, 40]).unwrap();
		assert_eq!(parameters.effective_rate_hz(25), Some(25));
		assert_eq!(parameters.effective_rate_hz(50), Some(40));
	}

	#[test]
	fn zero_rate_has_no_period() {
		let parameters = WidgetParameters::from_payload(&[1, 0, 9, 1, 0]).unwrap();
		assert_eq!(parameters.effective_rate_hz(25), None);
		assert_eq!(parameters.tick_period(25), None);
	}

	#[test]
	fn short_payload_is_rejected() {
		assert!(matches!(
			WidgetParameters::from_payload(&[1, 0, 10]),
			Err(EnttecError::InvalidResponse(_)),
		));
	}
}
