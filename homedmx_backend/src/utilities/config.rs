use std::{fs, path::Path, time::Duration};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::plugins::patcher::FixtureKind;

/// Upper bound on the DMX output rate, regardless of what the widget reports
pub const DEFAULT_RATE_LIMIT_HZ: u8 = 25;

pub const DEFAULT_BAUD_RATE: u32 = 115_200;

pub const DEFAULT_READ_TIMEOUT_MS: u64 = 1000;

/// Startup configuration, loaded once from a JSON file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BridgeConfig {
	/// Serial port of the widget. Discovered automatically when absent.
	#[serde(default)]
	pub port: Option<String>,

	#[serde(default = "default_baud_rate")]
	pub baud_rate: u32,

	#[serde(default = "default_read_timeout_ms")]
	pub read_timeout_ms: u64,

	#[serde(default = "default_rate_limit_hz")]
	pub rate_limit_hz: u8,

	/// The patch, in output order
	pub fixtures: Vec<FixtureConfig>,
}

/// One entry of the fixture patch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FixtureConfig {
	#[serde(rename = "type")]
	pub kind: FixtureKind,
	pub name: String,
	/// First DMX channel occupied by the fixture (1-512)
	pub channel: u16,
}

impl BridgeConfig {
	pub fn from_json(json: &str) -> Result<Self, ConfigError> {
		return Ok(serde_json::from_str(json)?);
	}

	pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
		let json = fs::read_to_string(path)?;
		return BridgeConfig::from_json(&json);
	}

	pub fn read_timeout(&self) -> Duration {
		return Duration::from_millis(self.read_timeout_ms);
	}
}

fn default_baud_rate() -> u32 {
	DEFAULT_BAUD_RATE
}

fn default_read_timeout_ms() -> u64 {
	DEFAULT_READ_TIMEOUT_MS
}

fn default_rate_limit_hz() -> u8 {
	DEFAULT_RATE_LIMIT_HZ
}

#[derive(Error, Debug)]
pub enum ConfigError {
	#[error("Could not read configuration file: {0}")]
	Io(#[from] std::io::Error),

	#[error("Could not parse configuration: {0}")]
	Parse(#[from] serde_json::Error),
}
