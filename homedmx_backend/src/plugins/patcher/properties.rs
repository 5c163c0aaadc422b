use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Value of a semantic property, as exchanged with the exposure layer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
	Bool(bool),
	Number(f64),
}

impl PropertyValue {
	pub fn as_bool(&self) -> Option<bool> {
		return match self {
			PropertyValue::Bool(value) => Some(*value),
			PropertyValue::Number(_) => None,
		};
	}

	pub fn as_number(&self) -> Option<f64> {
		return match self {
			PropertyValue::Number(value) => Some(*value),
			PropertyValue::Bool(_) => None,
		};
	}
}

impl From<bool> for PropertyValue {
	fn from(value: bool) -> Self {
		return PropertyValue::Bool(value);
	}
}

impl From<f64> for PropertyValue {
	fn from(value: f64) -> Self {
		return PropertyValue::Number(value);
	}
}

/// Type and range of a property
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum PropertyKind {
	Bool,
	Number { min: f64, max: f64 },
}

impl PropertyKind {
	fn expected(&self) -> &'static str {
		return match self {
			PropertyKind::Bool => "a boolean",
			PropertyKind::Number { .. } => "a finite number",
		};
	}
}

/// Binds a property name to a field of a fixture's state.
///
/// Each fixture type keeps a static table of these, so resolving a property is a
/// table lookup. The validator normalizes incoming values (clamping numbers into
/// range) or rejects them. A fresh fixture starts from `S::default()` with every
/// binding's `default` written over it.
pub struct PropertyBinding<S: 'static> {
	pub name: &'static str,
	pub kind: PropertyKind,
	pub default: PropertyValue,
	pub get: fn(&S) -> PropertyValue,
	pub set: fn(&mut S, PropertyValue),
	pub validate: fn(PropertyValue) -> Option<PropertyValue>,
}

impl<S> PropertyBinding<S> {
	/// Validates `value` and stores it, returning what was actually stored
	pub fn apply(&self, state: &mut S, value: PropertyValue) -> Result<PropertyValue, FixtureError> {
		let value = (self.validate)(value).ok_or(FixtureError::InvalidValue {
			property: self.name,
			expected: self.kind.expected(),
		})?;
		(self.set)(state, value);
		return Ok(value);
	}
}

/// Builds the initial state for a property table
pub fn initial_state<S: Default>(bindings: &[PropertyBinding<S>]) -> S {
	let mut state = S::default();
	for binding in bindings {
		(binding.set)(&mut state, binding.default);
	}
	return state;
}

/// Looks up a binding by property name
pub fn find_binding<'a, S>(bindings: &'a [PropertyBinding<S>], name: &str) -> Option<&'a PropertyBinding<S>> {
	return bindings.iter().find(|binding| binding.name == name);
}

/// Accepts booleans, and 0/1 as smart-home bridges often send them
pub fn coerce_bool(value: PropertyValue) -> Option<PropertyValue> {
	return match value {
		PropertyValue::Bool(_) => Some(value),
		PropertyValue::Number(number) if number == 0.0 => Some(PropertyValue::Bool(false)),
		PropertyValue::Number(number) if number == 1.0 => Some(PropertyValue::Bool(true)),
		PropertyValue::Number(_) => None,
	};
}

/// Accepts finite numbers, clamped into `[min, max]`
pub fn clamp_number(value: PropertyValue, min: f64, max: f64) -> Option<PropertyValue> {
	return match value {
		PropertyValue::Number(number) if number.is_finite() => Some(PropertyValue::Number(number.clamp(min, max))),
		_ => None,
	};
}

/// Builds a [`PropertyBinding`] for a boolean state field: `(State, "name", field, default)`
macro_rules! bool_property {
	($state:ty, $name:literal, $field:ident, $default:expr) => {
		$crate::plugins::patcher::properties::PropertyBinding::<$state> {
			name: $name,
			kind: $crate::plugins::patcher::properties::PropertyKind::Bool,
			default: $crate::plugins::patcher::properties::PropertyValue::Bool($default),
			get: |state: &$state| $crate::plugins::patcher::properties::PropertyValue::Bool(state.$field),
			set: |state: &mut $state, value: $crate::plugins::patcher::properties::PropertyValue| {
				if let Some(value) = value.as_bool() {
					state.$field = value;
				}
			},
			validate: $crate::plugins::patcher::properties::coerce_bool,
		}
	};
}

/// Builds a [`PropertyBinding`] for a numeric state field: `(State, "name", field, min, max, default)`
macro_rules! number_property {
	($state:ty, $name:literal, $field:ident, $min:expr, $max:expr, $default:expr) => {
		$crate::plugins::patcher::properties::PropertyBinding::<$state> {
			name: $name,
			kind: $crate::plugins::patcher::properties::PropertyKind::Number { min: $min, max: $max },
			default: $crate::plugins::patcher::properties::PropertyValue::Number($default),
			get: |state: &$state| $crate::plugins::patcher::properties::PropertyValue::Number(state.$field),
			set: |state: &mut $state, value: $crate::plugins::patcher::properties::PropertyValue| {
				if let Some(value) = value.as_number() {
					state.$field = value;
				}
			},
			validate: |value| $crate::plugins::patcher::properties::clamp_number(value, $min, $max),
		}
	};
}

pub(crate) use bool_property;
pub(crate) use number_property;

/// Errors returned when reading or writing fixture properties
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FixtureError {
	#[error("Fixture {fixture} has no property named {property}")]
	UnknownProperty { fixture: String, property: String },

	#[error("Property {property} expects {expected}")]
	InvalidValue { property: &'static str, expected: &'static str },
}
