use std::sync::Arc;

use anyhow::Context;
use log::info;

use crate::{
	plugins::{self, patcher::FixtureChange},
	utilities::config::BridgeConfig,
};

/// Brings the bridge up, runs it until Ctrl-C, then shuts the output down cleanly
pub async fn async_main(config: BridgeConfig) -> anyhow::Result<()> {
	let patcher_interface = plugins::patcher::initialize(&config).context("Could not build the fixture patch")?;

	patcher_interface.on_change(Arc::new(|change: &FixtureChange| {
		info!("{} {} -> {:?}", change.fixture, change.property, change.value);
	}));

	#[cfg(feature = "output-enttecpro")]
	let controller = plugins::output_dmx_enttecpro::initialize(&config, patcher_interface.clone())
		.await
		.context("Could not start DMX output")?;

	#[cfg(feature = "stdio-api")]
	let api = plugins::stdio_api::initialize(patcher_interface.clone());

	tokio::signal::ctrl_c().await.context("Could not listen for Ctrl-C")?;
	info!("Shutting down");

	#[cfg(feature = "stdio-api")]
	api.abort();

	#[cfg(feature = "output-enttecpro")]
	controller.shutdown().await.context("DMX output thread failed")?;

	return Ok(());
}
