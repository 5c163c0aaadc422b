use std::sync::Arc;

use rustc_hash::FxHashMap;

use super::{
	effect_phase::EffectPhaseAllocator,
	fixture::{ChangeHook, Fixture, FixtureHandle, PatchedFixture},
	fixture_types::FixtureKind,
	led_bar::LedBar,
	moving_head::MovingHead,
	PatchError,
};
use crate::{
	mixer_utils::{
		default_blender::compose_universe,
		state::{DmxFrame, EffectTime},
	},
	utilities::config::FixtureConfig,
};

/// Builds fixtures from their type, name and start channel
#[derive(Debug, Default)]
pub struct FixtureFactory {
	effect_phases: EffectPhaseAllocator,
}

impl FixtureFactory {
	pub fn new() -> Self {
		return FixtureFactory {
			effect_phases: EffectPhaseAllocator::new(),
		};
	}

	pub fn create(&self, kind: FixtureKind, name: &str, channel: u16) -> Result<FixtureHandle, PatchError> {
		let fixture: Box<dyn Fixture> = match kind {
			FixtureKind::LedBar => Box::new(PatchedFixture::new(name, channel, LedBar)?),
			FixtureKind::MovingHead => {
				let profile = MovingHead::new(self.effect_phases.next());
				Box::new(PatchedFixture::new(name, channel, profile)?)
			},
		};
		return Ok(FixtureHandle::new(fixture));
	}
}

/// The fixture patch: every fixture in output order, plus a lookup by name
#[derive(Debug, Default)]
pub struct PatcherContext {
	factory: FixtureFactory,
	fixtures: Vec<FixtureHandle>,
	by_name: FxHashMap<String, usize>,
}

impl PatcherContext {
	pub fn new() -> Self {
		return PatcherContext::default();
	}

	/// Creates a fixture and appends it to the patch
	pub fn patch(&mut self, kind: FixtureKind, name: &str, channel: u16) -> Result<&FixtureHandle, PatchError> {
		if self.by_name.contains_key(name) {
			return Err(PatchError::DuplicateName(name.to_owned()));
		}

		let fixture = self.factory.create(kind, name, channel)?;
		self.by_name.insert(name.to_owned(), self.fixtures.len());
		self.fixtures.push(fixture);
		return Ok(&self.fixtures[self.fixtures.len() - 1]);
	}
}

/// Cheaply cloneable access to the fixture patch.
///
/// The patch itself is fixed once built; fixture state changes go through each
/// [`FixtureHandle`].
#[derive(Debug, Clone)]
pub struct PatcherInterface(Arc<PatcherContext>);

impl PatcherInterface {
	pub fn new(patcher_ctx: PatcherContext) -> Self {
		return PatcherInterface(Arc::new(patcher_ctx));
	}

	pub fn from_config(fixtures: &[FixtureConfig]) -> Result<Self, PatchError> {
		let mut patcher_ctx = PatcherContext::new();
		for fixture in fixtures {
			patcher_ctx.patch(fixture.kind, &fixture.name, fixture.channel)?;
		}
		return Ok(PatcherInterface::new(patcher_ctx));
	}

	pub fn fixtures(&self) -> &[FixtureHandle] {
		return &self.0.fixtures;
	}

	pub fn fixture(&self, name: &str) -> Option<&FixtureHandle> {
		return self.0.by_name.get(name).map(|index| &self.0.fixtures[*index]);
	}

	/// Composes the universe from the current state of every fixture
	pub fn compose(&self, time: EffectTime) -> DmxFrame {
		return compose_universe(&self.0.fixtures, time);
	}

	/// Registers the same change hook on every fixture
	pub fn on_change(&self, hook: ChangeHook) {
		for fixture in self.0.fixtures.iter() {
			fixture.on_change(Arc::clone(&hook));
		}
	}
}
