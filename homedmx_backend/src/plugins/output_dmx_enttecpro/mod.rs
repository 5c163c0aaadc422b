pub mod circuit_breaker;
pub mod controller;

use enttecpro::{link, DiscoveryError, EnttecError, EnttecPro, SerialLink};
use log::info;
use thiserror::Error;
use tokio::task::JoinError;

use self::controller::EnttecProController;
use super::patcher::PatcherInterface;
use crate::utilities::config::BridgeConfig;

/// Finds and opens the widget, then hands it to [`start_with_link`].
pub async fn initialize(config: &BridgeConfig, patcher: PatcherInterface) -> Result<EnttecProController, OutputInitializationError> {
	if config.rate_limit_hz == 0 {
		return Err(OutputInitializationError::InvalidRateLimit);
	}

	let path = match config.port {
		Some(ref path) => path.clone(),
		None => {
			let device = tokio::task::spawn_blocking(link::discover).await??;
			device.path
		},
	};

	let baud_rate = config.baud_rate;
	let read_timeout = config.read_timeout();
	let open_path = path.clone();
	let port = tokio::task::spawn_blocking(move || link::open_port(&open_path, baud_rate, read_timeout)).await??;
	info!("Opened widget on {}", path);

	return start_with_link(port, config.rate_limit_hz, patcher).await;
}

/// Learns the output rate of the widget behind `link` and starts sending the patch.
///
/// Negotiation runs on the blocking pool and has to succeed before any frame is sent.
/// On failure the link is dropped with nothing written but the parameter request.
pub async fn start_with_link<L: SerialLink + 'static>(link: L, rate_limit_hz: u8, patcher: PatcherInterface) -> Result<EnttecProController, OutputInitializationError> {
	if rate_limit_hz == 0 {
		return Err(OutputInitializationError::InvalidRateLimit);
	}

	let (widget, parameters) = tokio::task::spawn_blocking(move || {
		let mut widget = EnttecPro::new(link);
		let parameters = widget.get_widget_parameters()?;
		return Ok::<_, EnttecError>((widget, parameters));
	}).await??;

	info!(
		"Widget runs firmware {:#06x}, break {:.2}us, mark after break {:.2}us, {} Hz",
		parameters.firmware_version,
		parameters.break_time_micros(),
		parameters.mark_after_break_time_micros(),
		parameters.output_rate_hz,
	);

	let period = parameters
		.tick_period(rate_limit_hz)
		.ok_or(OutputInitializationError::OutputRateUnset)?;
	if let Some(rate) = parameters.effective_rate_hz(rate_limit_hz) {
		info!("Sending DMX at {} Hz", rate);
	}

	return Ok(EnttecProController::start(widget, patcher, period));
}

/// An error that could occur while bringing up DMX output
#[derive(Error, Debug)]
pub enum OutputInitializationError {
	#[error("Could not find the widget: {0}")]
	Discovery(#[from] DiscoveryError),

	#[error("Could not talk to the widget: {0}")]
	Enttec(#[from] EnttecError),

	#[error("The widget reports an output rate of 0 Hz, set a rate in its configuration")]
	OutputRateUnset,

	#[error("rate_limit_hz must be at least 1")]
	InvalidRateLimit,

	#[error("Widget setup task failed: {0}")]
	Join(#[from] JoinError),
}
