use std::sync::{Arc, PoisonError, RwLock};

use log::debug;
use uuid::Uuid;

use super::{
	fixture_types::FixtureKind,
	properties::{find_binding, initial_state, FixtureError, PropertyBinding, PropertyValue},
	PatchError,
};
use crate::mixer_utils::state::{DmxFrame, EffectTime, DMX_CHANNELS};

/// Describes one type of fixture: its state, its property table and how that
/// state maps onto the fixture's channels.
pub trait FixtureProfile: Send + Sync + 'static {
	type State: Default + Send + Sync + 'static;

	const KIND: FixtureKind;

	/// Property table, in the order properties are listed to the exposure layer
	const PROPERTIES: &'static [PropertyBinding<Self::State>];

	/// Writes the fixture's channel values. `channels` is exactly one footprint long
	/// and zeroed beforehand.
	fn render(&self, state: &Self::State, time: EffectTime, channels: &mut [u8]);
}

/// A fixture placed in the universe
pub trait Fixture: Send + Sync {
	fn name(&self) -> &str;
	fn kind(&self) -> FixtureKind;
	fn start_channel(&self) -> u16;

	fn footprint(&self) -> u16 {
		return self.kind().footprint();
	}

	/// Current value of every property, in table order
	fn properties(&self) -> Vec<(&'static str, PropertyValue)>;

	fn get(&self, property: &str) -> Option<PropertyValue>;

	/// Validates and stores a property value, returning the canonical property name
	/// and the value actually stored
	fn apply(&mut self, property: &str, value: PropertyValue) -> Result<(&'static str, PropertyValue), FixtureError>;

	/// Renders the fixture into an otherwise blank frame
	fn snapshot(&self, time: EffectTime) -> DmxFrame;
}

/// Generic [`Fixture`] implementation backed by a [`FixtureProfile`]
pub struct PatchedFixture<P: FixtureProfile> {
	name: String,
	start_channel: u16,
	profile: P,
	state: P::State,
}

impl<P: FixtureProfile> PatchedFixture<P> {
	/// Places a fixture, rejecting placements that would run past channel 512
	pub fn new(name: impl Into<String>, start_channel: u16, profile: P) -> Result<Self, PatchError> {
		let name = name.into();
		let footprint = P::KIND.footprint();
		let last_channel = usize::from(start_channel) + usize::from(footprint) - 1;
		if start_channel == 0 || last_channel > DMX_CHANNELS {
			return Err(PatchError::ChannelOutOfRange { name, start: start_channel, footprint });
		}

		return Ok(PatchedFixture {
			name,
			start_channel,
			profile,
			state: initial_state(P::PROPERTIES),
		});
	}
}

impl<P: FixtureProfile> Fixture for PatchedFixture<P> {
	fn name(&self) -> &str {
		return &self.name;
	}

	fn kind(&self) -> FixtureKind {
		return P::KIND;
	}

	fn start_channel(&self) -> u16 {
		return self.start_channel;
	}

	fn properties(&self) -> Vec<(&'static str, PropertyValue)> {
		return P::PROPERTIES.iter()
			.map(|binding| (binding.name, (binding.get)(&self.state)))
			.collect();
	}

	fn get(&self, property: &str) -> Option<PropertyValue> {
		return find_binding(P::PROPERTIES, property).map(|binding| (binding.get)(&self.state));
	}

	fn apply(&mut self, property: &str, value: PropertyValue) -> Result<(&'static str, PropertyValue), FixtureError> {
		let binding = find_binding(P::PROPERTIES, property).ok_or_else(|| FixtureError::UnknownProperty {
			fixture: self.name.clone(),
			property: property.to_owned(),
		})?;
		let stored = binding.apply(&mut self.state, value)?;
		return Ok((binding.name, stored));
	}

	fn snapshot(&self, time: EffectTime) -> DmxFrame {
		let mut channels = vec![0u8; usize::from(self.footprint())];
		self.profile.render(&self.state, time, &mut channels);

		let mut frame = DmxFrame::new();
		frame.write_channels(self.start_channel, &channels);
		return frame;
	}
}

/// Notification delivered to the change hook after a successful mutation
#[derive(Debug, Clone, PartialEq)]
pub struct FixtureChange {
	pub id: Uuid,
	pub fixture: String,
	pub property: &'static str,
	pub value: PropertyValue,
}

pub type ChangeHook = Arc<dyn Fn(&FixtureChange) + Send + Sync>;

struct FixtureEntry {
	id: Uuid,
	kind: FixtureKind,
	name: String,
	start_channel: u16,
	fixture: RwLock<Box<dyn Fixture>>,
	hook: RwLock<Option<ChangeHook>>,
}

/// Shared handle to a patched fixture.
///
/// Property reads and writes go through the fixture's own lock, so the output thread
/// always renders a consistent view of a single fixture.
#[derive(Clone)]
pub struct FixtureHandle(Arc<FixtureEntry>);

impl FixtureHandle {
	pub fn new(fixture: Box<dyn Fixture>) -> Self {
		return FixtureHandle(Arc::new(FixtureEntry {
			id: Uuid::new_v4(),
			kind: fixture.kind(),
			name: fixture.name().to_owned(),
			start_channel: fixture.start_channel(),
			fixture: RwLock::new(fixture),
			hook: RwLock::new(None),
		}));
	}

	pub fn id(&self) -> Uuid {
		return self.0.id;
	}

	pub fn name(&self) -> &str {
		return &self.0.name;
	}

	pub fn kind(&self) -> FixtureKind {
		return self.0.kind;
	}

	pub fn start_channel(&self) -> u16 {
		return self.0.start_channel;
	}

	pub fn footprint(&self) -> u16 {
		return self.0.kind.footprint();
	}

	pub fn properties(&self) -> Vec<(&'static str, PropertyValue)> {
		return self.0.fixture.read().unwrap_or_else(PoisonError::into_inner).properties();
	}

	pub fn get(&self, property: &str) -> Result<PropertyValue, FixtureError> {
		return self.0.fixture.read().unwrap_or_else(PoisonError::into_inner)
			.get(property)
			.ok_or_else(|| FixtureError::UnknownProperty {
				fixture: self.0.name.clone(),
				property: property.to_owned(),
			});
	}

	/// Sets a property and notifies the change hook exactly once.
	///
	/// The hook runs on the caller's thread after the fixture lock has been released.
	/// Rejected values leave the fixture untouched and fire nothing.
	pub fn apply(&self, property: &str, value: PropertyValue) -> Result<PropertyValue, FixtureError> {
		let (property, stored) = self.0.fixture.write().unwrap_or_else(PoisonError::into_inner).apply(property, value)?;
		debug!("{}: {} = {:?}", self.0.name, property, stored);

		let hook = self.0.hook.read().unwrap_or_else(PoisonError::into_inner).clone();
		if let Some(hook) = hook {
			hook(&FixtureChange {
				id: self.0.id,
				fixture: self.0.name.clone(),
				property,
				value: stored,
			});
		}
		return Ok(stored);
	}

	/// Registers the change hook, replacing any previous one
	pub fn on_change(&self, hook: ChangeHook) {
		*self.0.hook.write().unwrap_or_else(PoisonError::into_inner) = Some(hook);
	}

	pub fn snapshot(&self, time: EffectTime) -> DmxFrame {
		return self.0.fixture.read().unwrap_or_else(PoisonError::into_inner).snapshot(time);
	}
}

impl std::fmt::Debug for FixtureHandle {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		return f.debug_struct("FixtureHandle")
			.field("id", &self.0.id)
			.field("name", &self.0.name)
			.field("kind", &self.0.kind)
			.field("start_channel", &self.0.start_channel)
			.finish();
	}
}
