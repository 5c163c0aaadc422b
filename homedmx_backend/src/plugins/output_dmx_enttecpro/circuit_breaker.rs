use std::time::{Duration, Instant};

use log::{info, warn};

/// Consecutive failed sends that open the circuit
pub const FAILURE_THRESHOLD: u32 = 10;

/// How long an open circuit suspends sending before a trial send
pub const COOL_DOWN: Duration = Duration::from_secs(2);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CircuitState {
	Closed { failures: u32 },
	Open { until: Instant },
	HalfOpen,
}

/// Suspends output after repeated send failures so a dead link isn't hammered every tick
#[derive(Debug, Clone)]
pub struct CircuitBreaker {
	state: CircuitState,
	threshold: u32,
	cool_down: Duration,
}

impl CircuitBreaker {
	pub fn new(threshold: u32, cool_down: Duration) -> Self {
		return CircuitBreaker {
			state: CircuitState::Closed { failures: 0 },
			threshold: threshold.max(1),
			cool_down,
		};
	}

	pub fn state(&self) -> CircuitState {
		return self.state;
	}

	/// Whether a send may be attempted at `now`. Moves an expired open circuit to half-open.
	pub fn allow(&mut self, now: Instant) -> bool {
		return match self.state {
			CircuitState::Closed { .. } | CircuitState::HalfOpen => true,
			CircuitState::Open { until } if now >= until => {
				warn!("DMX output cool-down elapsed, trying one frame");
				self.state = CircuitState::HalfOpen;
				true
			},
			CircuitState::Open { .. } => false,
		};
	}

	pub fn record_success(&mut self) {
		if self.state == CircuitState::HalfOpen {
			info!("DMX output recovered");
		}
		self.state = CircuitState::Closed { failures: 0 };
	}

	pub fn record_failure(&mut self, now: Instant) {
		self.state = match self.state {
			CircuitState::Closed { failures } if failures + 1 < self.threshold => {
				CircuitState::Closed { failures: failures + 1 }
			},
			CircuitState::Closed { .. } => {
				warn!(
					"{} consecutive DMX sends failed, pausing output for {:?}",
					self.threshold,
					self.cool_down,
				);
				CircuitState::Open { until: now + self.cool_down }
			},
			CircuitState::HalfOpen | CircuitState::Open { .. } => {
				warn!("Trial DMX send failed, pausing output for {:?}", self.cool_down);
				CircuitState::Open { until: now + self.cool_down }
			},
		};
	}
}

impl Default for CircuitBreaker {
	fn default() -> Self {
		return CircuitBreaker::new(FAILURE_THRESHOLD, COOL_DOWN);
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn fail(breaker: &mut CircuitBreaker, times: u32, now: Instant) {
		for _ in 0..times {
			assert!(breaker.allow(now));
			breaker.record_failure(now);
		}
	}

	#[test]
	fn opens_after_threshold() {
		let start = Instant::now();
		let mut breaker = CircuitBreaker::default();

		fail(&mut breaker, 9, start);
		assert_eq!(breaker.state(), CircuitState::Closed { failures: 9 });

		fail(&mut breaker, 1, start);
		assert_eq!(breaker.state(), CircuitState::Open { until: start + COOL_DOWN });
		assert!(!breaker.allow(start + Duration::from_millis(1999)));
	}

	#[test]
	fn success_resets_the_count() {
		let start = Instant::now();
		let mut breaker = CircuitBreaker::default();
		fail(&mut breaker, 9, start);
		breaker.record_success();
		fail(&mut breaker, 9, start);
		assert_eq!(breaker.state(), CircuitState::Closed { failures: 9 });
	}

	#[test_log::test]
	fn half_open_after_cool_down() {
		let start = Instant::now();
		let mut breaker = CircuitBreaker::default();
		fail(&mut breaker, 10, start);

		let later = start + COOL_DOWN;
		assert!(breaker.allow(later));
		assert_eq!(breaker.state(), CircuitState::HalfOpen);

		breaker.record_success();
		assert_eq!(breaker.state(), CircuitState::Closed { failures: 0 });
	}

	#[test_log::test]
	fn failed_trial_reopens() {
		let start = Instant::now();
		let mut breaker = CircuitBreaker::default();
		fail(&mut breaker, 10, start);

		let later = start + COOL_DOWN;
		assert!(breaker.allow(later));
		breaker.record_failure(later);
		assert_eq!(breaker.state(), CircuitState::Open { until: later + COOL_DOWN });
		assert!(!breaker.allow(later + Duration::from_secs(1)));
	}
}
