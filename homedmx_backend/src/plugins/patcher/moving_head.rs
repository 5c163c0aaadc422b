//! Moving head in its 17-channel DMX mode, with a built-in sweep effect

use std::f64::consts::FRAC_PI_2;

use super::{
	fixture::FixtureProfile,
	fixture_types::FixtureKind,
	properties::{bool_property, number_property, PropertyBinding},
};
use crate::{
	mixer_utils::state::EffectTime,
	utilities::{
		color::hsv_to_rgb,
		value_codec::{to_dmx_coarse, to_dmx_value},
	},
};

pub const FOOTPRINT: u16 = 17;

pub const PAN_MIN: f64 = -270.0;
pub const PAN_MAX: f64 = 270.0;
pub const TILT_MIN: f64 = -95.0;
pub const TILT_MAX: f64 = 95.0;

/// Swing of the effect, in degrees either side of the static pan/tilt position
pub const EFFECT_AMPLITUDE: f64 = 40.0;

/// Wall-clock seconds are divided by this to get the sweep angle in radians
pub const EFFECT_PERIOD_DIVISOR: f64 = 3.0;

/// Color wheel positions stepped through while the effect runs, one per half second
pub const EFFECT_PALETTE: [u8; 16] = [
	8, 24, 40, 56, 72, 88, 104, 120,
	136, 152, 168, 184, 200, 216, 232, 248,
];

/// Palette steps between consecutive fixtures
const PALETTE_STRIDE: i64 = 5;

const PAN: usize = 0;
const PAN_FINE: usize = 1;
const TILT: usize = 2;
const TILT_FINE: usize = 3;
const DIMMER: usize = 6;
const ZOOM: usize = 7;
const RED: usize = 8;
const GREEN: usize = 9;
const BLUE: usize = 10;
const COLOR_MACRO: usize = 12;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MovingHeadState {
	pub on: bool,
	pub brightness: f64,
	pub hue: f64,
	pub saturation: f64,
	pub pan: f64,
	pub tilt: f64,
	pub zoom: f64,
	pub effect: bool,
}

/// Moving head profile. `effect_offset` staggers the effect between fixtures.
#[derive(Debug, Clone, Copy, Default)]
pub struct MovingHead {
	pub effect_offset: u32,
}

impl MovingHead {
	pub fn new(effect_offset: u32) -> Self {
		return MovingHead { effect_offset };
	}

	fn sweep(&self, time: EffectTime) -> f64 {
		let angle = time.seconds() / EFFECT_PERIOD_DIVISOR + f64::from(self.effect_offset) * FRAC_PI_2;
		return EFFECT_AMPLITUDE * angle.sin();
	}

	fn color_macro(&self, time: EffectTime) -> u8 {
		let step = (time.seconds() * 2.0).floor() as i64 + i64::from(self.effect_offset) * PALETTE_STRIDE;
		return EFFECT_PALETTE[step.rem_euclid(EFFECT_PALETTE.len() as i64) as usize];
	}
}

impl FixtureProfile for MovingHead {
	type State = MovingHeadState;

	const KIND: FixtureKind = FixtureKind::MovingHead;

	const PROPERTIES: &'static [PropertyBinding<MovingHeadState>] = &[
		bool_property!(MovingHeadState, "on", on, false),
		number_property!(MovingHeadState, "brightness", brightness, 0.0, 100.0, 100.0),
		number_property!(MovingHeadState, "hue", hue, 0.0, 360.0, 0.0),
		number_property!(MovingHeadState, "saturation", saturation, 0.0, 100.0, 0.0),
		number_property!(MovingHeadState, "pan", pan, PAN_MIN, PAN_MAX, 0.0),
		number_property!(MovingHeadState, "tilt", tilt, TILT_MIN, TILT_MAX, 0.0),
		number_property!(MovingHeadState, "zoom", zoom, 0.0, 100.0, 50.0),
		bool_property!(MovingHeadState, "effect", effect, false),
	];

	fn render(&self, state: &MovingHeadState, time: EffectTime, channels: &mut [u8]) {
		let animate = state.effect && state.on;

		let (mut pan, mut tilt) = (state.pan, state.tilt);
		if animate {
			let sweep = self.sweep(time);
			pan += sweep;
			tilt += sweep;
		}

		(channels[PAN], channels[PAN_FINE]) = to_dmx_value(pan, PAN_MIN, PAN_MAX);
		(channels[TILT], channels[TILT_FINE]) = to_dmx_value(tilt, TILT_MIN, TILT_MAX);
		channels[DIMMER] = if state.on { to_dmx_coarse(state.brightness, 0.0, 100.0) } else { 0 };
		channels[ZOOM] = to_dmx_coarse(state.zoom, 0.0, 100.0);
		(channels[RED], channels[GREEN], channels[BLUE]) = hsv_to_rgb(state.hue, state.saturation, 100.0);
		channels[COLOR_MACRO] = if animate { self.color_macro(time) } else { 0 };
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::plugins::patcher::properties::initial_state;

	fn render(profile: MovingHead, state: &MovingHeadState, seconds: f64) -> [u8; 17] {
		let mut channels = [0u8; 17];
		profile.render(state, EffectTime::from_seconds(seconds), &mut channels);
		return channels;
	}

	fn powered(effect: bool) -> MovingHeadState {
		return MovingHeadState {
			on: true,
			effect,
			..initial_state(MovingHead::PROPERTIES)
		};
	}

	#[test]
	fn defaults() {
		let state = initial_state(MovingHead::PROPERTIES);
		assert_eq!(state.zoom, 50.0);
		assert_eq!(state.brightness, 100.0);
		assert!(!state.on && !state.effect);

		let channels = render(MovingHead::new(0), &state, 0.0);
		assert_eq!(channels, [127, 255, 127, 255, 0, 0, 0, 127, 255, 255, 255, 0, 0, 0, 0, 0, 0]);
	}

	#[test]
	fn static_position_ignores_time() {
		let state = MovingHeadState { pan: 135.0, tilt: -47.5, ..powered(false) };
		let first = render(MovingHead::new(3), &state, 0.0);
		for seconds in [0.7, 13.0, 1_700_000_000.25] {
			assert_eq!(render(MovingHead::new(3), &state, seconds), first);
		}

		assert_eq!((first[PAN], first[PAN_FINE]), to_dmx_value(135.0, -270.0, 270.0));
		assert_eq!((first[TILT], first[TILT_FINE]), to_dmx_value(-47.5, -95.0, 95.0));
		assert_eq!(first[COLOR_MACRO], 0);
		assert_eq!(first[DIMMER], 255);
	}

	#[test]
	fn effect_needs_power() {
		let state = MovingHeadState { on: false, ..powered(true) };
		let first = render(MovingHead::new(0), &state, 1.0);
		assert_eq!(render(MovingHead::new(0), &state, 5.5), first);
		assert_eq!(first[COLOR_MACRO], 0);
		assert_eq!(first[DIMMER], 0);
	}

	#[test]
	fn effect_sweeps_pan_and_tilt() {
		let state = powered(true);
		let head = MovingHead::new(0);

		// sin(0) = 0, so the sweep starts at the static position
		let start = render(head, &state, 0.0);
		assert_eq!((start[PAN], start[PAN_FINE]), to_dmx_value(0.0, PAN_MIN, PAN_MAX));

		// A quarter turn later the sweep is at its full amplitude
		let seconds = 3.0 * FRAC_PI_2;
		let peak = render(head, &state, seconds);
		let sweep = EFFECT_AMPLITUDE * (seconds / EFFECT_PERIOD_DIVISOR).sin();
		assert_eq!((peak[PAN], peak[PAN_FINE]), to_dmx_value(sweep, PAN_MIN, PAN_MAX));
		assert_eq!((peak[TILT], peak[TILT_FINE]), to_dmx_value(sweep, TILT_MIN, TILT_MAX));
		assert_ne!(peak[PAN], start[PAN]);
	}

	#[test]
	fn offsets_shift_the_phase() {
		let state = powered(true);
		// Offset 1 is a quarter turn ahead of offset 0
		let ahead = render(MovingHead::new(1), &state, 0.0);
		let behind = render(MovingHead::new(0), &state, 3.0 * FRAC_PI_2);
		assert_eq!(&ahead[PAN..=TILT_FINE], &behind[PAN..=TILT_FINE]);
	}

	#[test]
	fn color_macro_cycles_palette() {
		let state = powered(true);
		let head = MovingHead::new(0);
		assert_eq!(render(head, &state, 0.0)[COLOR_MACRO], 8);
		assert_eq!(render(head, &state, 0.49)[COLOR_MACRO], 8);
		assert_eq!(render(head, &state, 0.5)[COLOR_MACRO], 24);
		assert_eq!(render(head, &state, 7.5)[COLOR_MACRO], 248);
		assert_eq!(render(head, &state, 8.0)[COLOR_MACRO], 8);

		// Offset 1 starts five palette steps further on
		assert_eq!(render(MovingHead::new(1), &state, 0.0)[COLOR_MACRO], 88);
	}

	#[test]
	fn sweep_is_clamped_at_the_end_stops() {
		let state = MovingHeadState { pan: 270.0, tilt: 95.0, ..powered(true) };
		let peak = render(MovingHead::new(1), &state, 0.0);
		assert_eq!(&peak[PAN..=TILT_FINE], &[255, 255, 255, 255]);
	}
}
