//! RGB LED bar in its 6-channel DMX mode

use super::{
	fixture::FixtureProfile,
	fixture_types::FixtureKind,
	properties::{bool_property, number_property, PropertyBinding},
};
use crate::{
	mixer_utils::state::EffectTime,
	utilities::{color::hsv_to_rgb, value_codec::to_dmx_coarse},
};

pub const FOOTPRINT: u16 = 6;

/// Value of the mode channel that puts the bar under DMX control
pub const DMX_CONTROL_MODE: u8 = 30;

const MODE: usize = 0;
const INTENSITY: usize = 1;
const RED: usize = 3;
const GREEN: usize = 4;
const BLUE: usize = 5;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LedBarState {
	pub on: bool,
	pub brightness: f64,
	pub hue: f64,
	pub saturation: f64,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LedBar;

impl FixtureProfile for LedBar {
	type State = LedBarState;

	const KIND: FixtureKind = FixtureKind::LedBar;

	const PROPERTIES: &'static [PropertyBinding<LedBarState>] = &[
		bool_property!(LedBarState, "on", on, false),
		number_property!(LedBarState, "brightness", brightness, 0.0, 100.0, 100.0),
		number_property!(LedBarState, "hue", hue, 0.0, 360.0, 0.0),
		number_property!(LedBarState, "saturation", saturation, 0.0, 100.0, 0.0),
	];

	fn render(&self, state: &LedBarState, _time: EffectTime, channels: &mut [u8]) {
		channels[MODE] = DMX_CONTROL_MODE;
		channels[INTENSITY] = if state.on { to_dmx_coarse(state.brightness, 0.0, 100.0) } else { 0 };

		// Color follows hue/saturation even while the bar is off
		let (red, green, blue) = hsv_to_rgb(state.hue, state.saturation, 100.0);
		channels[RED] = red;
		channels[GREEN] = green;
		channels[BLUE] = blue;
	}
}
