use enttecpro::{EnttecError, EnttecPro, SerialLink};
use log::{info, trace, warn};
use std::{
	sync::{
		atomic::{AtomicBool, Ordering},
		Arc,
	},
	time::{Duration, Instant},
};
use thread_priority::{set_current_thread_priority, ThreadPriority};
use tokio::task::{JoinError, JoinHandle};

use super::circuit_breaker::CircuitBreaker;
use crate::{
	mixer_utils::state::{DmxFrame, EffectTime},
	plugins::patcher::PatcherInterface,
};

/// Longest the output thread sleeps before checking for shutdown
const SHUTDOWN_POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Something that can put a universe on the wire
pub trait DmxOutput: Send + 'static {
	fn send_frame(&mut self, frame: &DmxFrame) -> Result<(), EnttecError>;
}

impl<L: SerialLink + 'static> DmxOutput for EnttecPro<L> {
	fn send_frame(&mut self, frame: &DmxFrame) -> Result<(), EnttecError> {
		return self.send_dmx(frame.as_bytes());
	}
}

/// Owns the output thread, which composes and sends one frame per tick
pub struct EnttecProController {
	shutdown_trigger: Arc<AtomicBool>,
	thread_handle: Option<JoinHandle<()>>,
	period: Duration,
}

impl EnttecProController {
	/// Moves `output` onto a dedicated blocking thread and starts ticking every `period`.
	///
	/// Must be called from within a tokio runtime.
	pub fn start<O: DmxOutput>(output: O, patcher: PatcherInterface, period: Duration) -> Self {
		let shutdown_trigger = Arc::new(AtomicBool::new(false));
		let thread_shutdown_trigger = Arc::clone(&shutdown_trigger);
		let thread_handle = tokio::task::spawn_blocking(move || thread_loop(thread_shutdown_trigger, output, patcher, period));
		info!("DMX output started, one frame every {:?}", period);
		return EnttecProController {
			shutdown_trigger,
			thread_handle: Some(thread_handle),
			period,
		};
	}

	/// Time between two frames
	pub fn period(&self) -> Duration {
		return self.period;
	}

	/// Stops the output thread and waits for it to exit without blocking the runtime
	pub async fn shutdown(mut self) -> Result<(), JoinError> {
		self.shutdown_trigger.store(true, Ordering::Relaxed);
		if let Some(thread_handle) = self.thread_handle.take() {
			thread_handle.await?;
		}
		info!("DMX output stopped");
		return Ok(());
	}
}

impl Drop for EnttecProController {
	fn drop(&mut self) {
		if !self.shutdown_trigger.load(Ordering::Relaxed) {
			warn!("EnttecProController was dropped without being shut down");
			self.shutdown_trigger.store(true, Ordering::Relaxed);
		}
	}
}

/// Deadline of the tick after `deadline`. Ticks that have already been missed by `now`
/// are skipped instead of being sent back to back.
pub fn next_deadline(deadline: Instant, period: Duration, now: Instant) -> Instant {
	let next = deadline + period;
	if next > now || period.is_zero() {
		return next;
	}
	let missed = (now - next).as_nanos() / period.as_nanos() + 1;
	return next + period * u32::try_from(missed).unwrap_or(u32::MAX);
}

fn thread_loop<O: DmxOutput>(shutdown_trigger: Arc<AtomicBool>, mut output: O, patcher: PatcherInterface, period: Duration) {
	set_current_thread_priority(ThreadPriority::Max).ok();
	let mut breaker = CircuitBreaker::default();
	let mut deadline = Instant::now();

	loop {
		if shutdown_trigger.load(Ordering::Relaxed) {
			break;
		}

		// Keep sleeps short so a shutdown request is noticed quickly
		let now = Instant::now();
		if now < deadline {
			std::thread::sleep((deadline - now).min(SHUTDOWN_POLL_INTERVAL));
			continue;
		}
		deadline = next_deadline(deadline, period, now);

		if !breaker.allow(now) {
			continue;
		}

		let frame = patcher.compose(EffectTime::now());
		match output.send_frame(&frame) {
			Ok(()) => {
				trace!("Sent {:?}", frame);
				breaker.record_success();
			},
			Err(err) => {
				warn!("Failed to send DMX frame: {}", err);
				breaker.record_failure(Instant::now());
			},
		}
	}
}
