/// Converts HSV to 8-bit RGB.
///
/// `hue` is in degrees (0-360), `saturation` and `value` are percentages (0-100).
/// Each output channel is rounded to the nearest integer.
pub fn hsv_to_rgb(hue: f64, saturation: f64, value: f64) -> (u8, u8, u8) {
	let sector = hue.rem_euclid(360.0) / 60.0;
	let saturation = (saturation / 100.0).clamp(0.0, 1.0);
	let value = (value / 100.0).clamp(0.0, 1.0);

	let index = sector.floor();
	let fraction = sector - index;
	let p = 255.0 * value * (1.0 - saturation);
	let q = 255.0 * value * (1.0 - saturation * fraction);
	let t = 255.0 * value * (1.0 - saturation * (1.0 - fraction));
	let v = 255.0 * value;

	let (r, g, b) = match index as u8 {
		0 => (v, t, p),
		1 => (q, v, p),
		2 => (p, v, t),
		3 => (p, q, v),
		4 => (t, p, v),
		_ => (v, p, q),
	};
	return (to_byte(r), to_byte(g), to_byte(b));
}

fn to_byte(channel: f64) -> u8 {
	return channel.round().clamp(0.0, 255.0) as u8;
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn primaries() {
		assert_eq!(hsv_to_rgb(0.0, 100.0, 100.0), (255, 0, 0));
		assert_eq!(hsv_to_rgb(120.0, 100.0, 100.0), (0, 255, 0));
		assert_eq!(hsv_to_rgb(240.0, 100.0, 100.0), (0, 0, 255));
	}

	#[test]
	fn full_circle_wraps() {
		assert_eq!(hsv_to_rgb(360.0, 100.0, 100.0), (255, 0, 0));
	}

	#[test]
	fn no_saturation_is_white() {
		assert_eq!(hsv_to_rgb(200.0, 0.0, 100.0), (255, 255, 255));
	}

	#[test]
	fn intermediate_hue_rounds() {
		// Halfway between red and yellow
		assert_eq!(hsv_to_rgb(30.0, 100.0, 100.0), (255, 128, 0));
		assert_eq!(hsv_to_rgb(300.0, 50.0, 100.0), (255, 128, 255));
	}
}
