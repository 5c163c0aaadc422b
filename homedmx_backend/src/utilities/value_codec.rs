//! Scaling of property values onto DMX channels

/// Largest value representable by a coarse/fine channel pair
pub const DMX_16_BIT_MAX: f64 = 65535.0;

/// Scales `value` from `[min, max]` onto a 16-bit range and splits it into
/// `(coarse, fine)` channel bytes.
///
/// The scaled value is truncated, not rounded. Values outside `[min, max]` are clamped
/// first so the result is always a valid pair of bytes. A degenerate range or a
/// non-finite value yields `(0, 0)`.
///
/// ```rust
/// # use homedmx_lib::utilities::value_codec::to_dmx_value;
/// assert_eq!(to_dmx_value(100.0, 0.0, 100.0), (255, 255));
/// assert_eq!(to_dmx_value(0.0, -270.0, 270.0), (127, 255));
/// assert_eq!(to_dmx_value(500.0, -270.0, 270.0), (255, 255));
/// ```
pub fn to_dmx_value(value: f64, min: f64, max: f64) -> (u8, u8) {
	if !value.is_finite() || !(max > min) {
		return (0, 0);
	}

	let scaled = (value.clamp(min, max) - min) / (max - min);
	let upscaled = (scaled * DMX_16_BIT_MAX).trunc() as u16;
	return ((upscaled / 256) as u8, (upscaled % 256) as u8);
}

/// Coarse byte only, for 8-bit channels
pub fn to_dmx_coarse(value: f64, min: f64, max: f64) -> u8 {
	return to_dmx_value(value, min, max).0;
}
