use serde::{Deserialize, Serialize};

/// Fixture types known to the patcher, as named in the configuration file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FixtureKind {
	/// RGB LED bar with a master intensity channel
	LedBar,
	/// Moving head with pan/tilt, zoom, RGB and a built-in movement effect
	MovingHead,
}

impl FixtureKind {
	/// Number of consecutive DMX channels the fixture occupies
	pub fn footprint(&self) -> u16 {
		return match self {
			FixtureKind::LedBar => super::led_bar::FOOTPRINT,
			FixtureKind::MovingHead => super::moving_head::FOOTPRINT,
		};
	}
}
