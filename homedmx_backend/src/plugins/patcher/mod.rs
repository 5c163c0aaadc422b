mod effect_phase;
pub mod fixture;
mod fixture_types;
mod interface;
pub mod led_bar;
pub mod moving_head;
pub mod properties;

pub use effect_phase::EffectPhaseAllocator;
pub use fixture::{ChangeHook, Fixture, FixtureChange, FixtureHandle, FixtureProfile, PatchedFixture};
pub use fixture_types::FixtureKind;
pub use interface::{FixtureFactory, PatcherContext, PatcherInterface};
pub use properties::{FixtureError, PropertyKind, PropertyValue};

use log::info;
use thiserror::Error;

use crate::utilities::config::BridgeConfig;

pub fn initialize(config: &BridgeConfig) -> Result<PatcherInterface, PatchError> {
	let patcher_interface = PatcherInterface::from_config(&config.fixtures)?;

	for fixture in patcher_interface.fixtures() {
		info!(
			"Patched {:?} \"{}\" at channels {}-{}",
			fixture.kind(),
			fixture.name(),
			fixture.start_channel(),
			fixture.start_channel() + fixture.footprint() - 1,
		);
	}
	if patcher_interface.fixtures().is_empty() {
		info!("No fixtures patched, the universe will stay dark");
	}

	return Ok(patcher_interface);
}

/// An error that could occur while building the fixture patch
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PatchError {
	#[error("Fixture \"{name}\" at channel {start} needs {footprint} channels, which does not fit in channels 1-512")]
	ChannelOutOfRange { name: String, start: u16, footprint: u16 },

	#[error("More than one fixture is named \"{0}\"")]
	DuplicateName(String),
}
