use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::plugins::patcher::{FixtureKind, PatcherInterface, PropertyValue};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
/// Describes a command to be sent via a JSON or equivalent API
pub enum JSONCommand {
	ListFixtures,
	GetProperty {
		fixture: String,
		property: String,
	},
	SetProperty {
		fixture: String,
		property: String,
		value: PropertyValue,
	},
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
/// Describes a reply sent to a client via a JSON or equivalent API
pub enum JSONResponse {
	Fixtures {
		fixtures: Vec<FixtureSummary>,
	},
	Property {
		fixture: String,
		property: String,
		value: PropertyValue,
	},
	Ok,
	Error {
		message: String,
	},
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixtureSummary {
	pub id: Uuid,
	pub name: String,
	pub fixture_type: FixtureKind,
	pub channel: u16,
	pub properties: BTreeMap<String, PropertyValue>,
}

/// Runs one command against the patch
pub fn handle_command(patcher: &PatcherInterface, command: JSONCommand) -> JSONResponse {
	return match command {
		JSONCommand::ListFixtures => JSONResponse::Fixtures {
			fixtures: patcher.fixtures().iter().map(|fixture| FixtureSummary {
				id: fixture.id(),
				name: fixture.name().to_owned(),
				fixture_type: fixture.kind(),
				channel: fixture.start_channel(),
				properties: fixture.properties()
					.into_iter()
					.map(|(name, value)| (name.to_owned(), value))
					.collect(),
			}).collect(),
		},
		JSONCommand::GetProperty { fixture, property } => {
			let Some(handle) = patcher.fixture(&fixture) else {
				return unknown_fixture(&fixture);
			};
			match handle.get(&property) {
				Ok(value) => JSONResponse::Property { fixture, property, value },
				Err(err) => JSONResponse::Error { message: err.to_string() },
			}
		},
		JSONCommand::SetProperty { fixture, property, value } => {
			let Some(handle) = patcher.fixture(&fixture) else {
				return unknown_fixture(&fixture);
			};
			match handle.apply(&property, value) {
				Ok(_) => JSONResponse::Ok,
				Err(err) => JSONResponse::Error { message: err.to_string() },
			}
		},
	};
}

fn unknown_fixture(name: &str) -> JSONResponse {
	return JSONResponse::Error {
		message: format!("There is no fixture named \"{}\"", name),
	};
}
