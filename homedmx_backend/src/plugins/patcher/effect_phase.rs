use std::sync::atomic::{AtomicU32, Ordering};

/// Hands out sequential phase offsets so that effects on neighbouring fixtures
/// don't move in lockstep.
///
/// Offsets start at 0, increase by one per allocation and are never reused.
#[derive(Debug, Default)]
pub struct EffectPhaseAllocator(AtomicU32);

impl EffectPhaseAllocator {
	pub fn new() -> Self {
		return EffectPhaseAllocator(AtomicU32::new(0));
	}

	pub fn next(&self) -> u32 {
		return self.0.fetch_add(1, Ordering::Relaxed);
	}
}
