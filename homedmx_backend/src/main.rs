use std::time::Duration;

use anyhow::Context;
use env_logger::Env;
use log::error;

use homedmx_lib::{async_main, utilities::config::BridgeConfig};

const DEFAULT_CONFIG_PATH: &str = "homedmx.json";

fn main() {
	env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

	if let Err(err) = run() {
		error!("{:#}", err);
		std::process::exit(1);
	}
}

fn run() -> anyhow::Result<()> {
	let config_path = std::env::args().nth(1).unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_owned());
	let config = BridgeConfig::load(&config_path).with_context(|| format!("Could not load {}", config_path))?;

	let runtime = tokio::runtime::Runtime::new().context("Couldn't start tokio runtime")?;
	let result = runtime.block_on(async_main(config));

	// Reading stdin occupies a blocking thread that never returns on its own
	runtime.shutdown_timeout(Duration::from_millis(250));
	return result;
}
