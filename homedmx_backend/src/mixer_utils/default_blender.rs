use rayon::prelude::*;

use super::state::{DmxFrame, EffectTime};
use crate::plugins::patcher::FixtureHandle;

/// Composes the universe from every fixture's snapshot.
///
/// Each channel takes the highest value any fixture gives it (HTP). Fixtures leave
/// channels outside their own range at zero, so disjoint fixtures never interfere and
/// overlapping ones combine by maximum. All snapshots are rendered for the same `time`.
pub fn compose_universe(fixtures: &[FixtureHandle], time: EffectTime) -> DmxFrame {
	return fixtures
		.par_iter()
		.map(|fixture| fixture.snapshot(time))
		.reduce(DmxFrame::new, |mut cumulative, snapshot| {
			cumulative.merge_htp(&snapshot);
			return cumulative;
		});
}
