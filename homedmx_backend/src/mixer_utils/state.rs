use std::{
	fmt,
	ops::Index,
	time::{SystemTime, UNIX_EPOCH},
};

/// Number of addressable channels in a universe
pub const DMX_CHANNELS: usize = 512;

/// Start code plus channels
pub const FRAME_LENGTH: usize = DMX_CHANNELS + 1;

/// A full DMX universe as sent on the wire.
///
/// Slot 0 is the start code, which is always zero. Slots 1-512 are channel data,
/// so a channel number can be used as an index directly.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct DmxFrame([u8; FRAME_LENGTH]);

impl DmxFrame {
	pub fn new() -> Self {
		return DmxFrame([0u8; FRAME_LENGTH]);
	}

	/// The frame as it goes out on the wire, start code included
	pub fn as_bytes(&self) -> &[u8; FRAME_LENGTH] {
		return &self.0;
	}

	/// Value of a 1-based channel, or `None` outside 1-512
	pub fn channel(&self, channel: u16) -> Option<u8> {
		return match channel as usize {
			1..=DMX_CHANNELS => Some(self.0[channel as usize]),
			_ => None,
		};
	}

	/// Channel data without the start code
	pub fn channels(&self) -> &[u8] {
		return &self.0[1..];
	}

	/// Copies `values` into consecutive channels starting at 1-based `start`.
	///
	/// Values that would land past channel 512 are dropped; the patcher rejects such
	/// placements before they get here.
	pub fn write_channels(&mut self, start: u16, values: &[u8]) {
		let start = (start as usize).max(1);
		if start > DMX_CHANNELS {
			return;
		}
		let count = values.len().min(FRAME_LENGTH - start);
		self.0[start..start + count].copy_from_slice(&values[..count]);
	}

	/// Highest-takes-precedence merge of `other` into this frame
	pub fn merge_htp(&mut self, other: &DmxFrame) {
		for (slot, incoming) in self.0.iter_mut().zip(other.0.iter()) {
			if *incoming > *slot {
				*slot = *incoming;
			}
		}
	}
}

impl Default for DmxFrame {
	fn default() -> Self {
		return DmxFrame::new();
	}
}

impl Index<usize> for DmxFrame {
	type Output = u8;

	fn index(&self, slot: usize) -> &u8 {
		return &self.0[slot];
	}
}

impl fmt::Debug for DmxFrame {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		// Only the populated channels are interesting
		let populated: Vec<(usize, u8)> = self.0.iter()
			.enumerate()
			.skip(1)
			.filter(|(_, value)| **value != 0)
			.map(|(channel, value)| (channel, *value))
			.collect();
		return f.debug_tuple("DmxFrame").field(&populated).finish();
	}
}

/// The instant effects are rendered for, as wall-clock seconds.
///
/// One sample is taken per composed frame, so every fixture in a frame animates
/// against the same clock.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EffectTime(f64);

impl EffectTime {
	pub fn now() -> Self {
		let seconds = SystemTime::now()
			.duration_since(UNIX_EPOCH)
			.map_or(0.0, |elapsed| elapsed.as_secs_f64());
		return EffectTime(seconds);
	}

	pub fn from_seconds(seconds: f64) -> Self {
		return EffectTime(seconds);
	}

	pub fn seconds(&self) -> f64 {
		return self.0;
	}
}
