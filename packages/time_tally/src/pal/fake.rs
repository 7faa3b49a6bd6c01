//! Fake platform implementation for testing.

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use crate::pal::abstractions::Platform;

#[derive(Debug)]
struct FakePlatformState {
    origin: Instant,
    elapsed: Duration,
}

/// Fake clock whose time only moves when a test advances it.
///
/// Clones share the same underlying state, so a test can hand one clone to the
/// registry and advance time through another, including from inside a timed
/// function to simulate work taking a known amount of time.
#[derive(Clone, Debug)]
pub(crate) struct FakePlatform {
    state: Arc<Mutex<FakePlatformState>>,
}

impl FakePlatform {
    pub(crate) fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(FakePlatformState {
                origin: Instant::now(),
                elapsed: Duration::ZERO,
            })),
        }
    }

    /// Moves the fake clock forward, affecting all clones of this platform.
    pub(crate) fn advance(&self, duration: Duration) {
        let mut state = self
            .state
            .lock()
            .expect("FakePlatform state lock should not be poisoned");

        state.elapsed = state
            .elapsed
            .checked_add(duration)
            .expect("fake clock advanced beyond any realistic test duration");
    }
}

impl Platform for FakePlatform {
    fn now(&self) -> Instant {
        let state = self
            .state
            .lock()
            .expect("FakePlatform state lock should not be poisoned");

        state
            .origin
            .checked_add(state.elapsed)
            .expect("fake clock advanced beyond any realistic test duration")
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn time_stands_still_until_advanced() {
        let platform = FakePlatform::new();

        assert_eq!(platform.now(), platform.now());
    }

    #[test]
    fn advance_moves_time_forward() {
        let platform = FakePlatform::new();
        let before = platform.now();

        platform.advance(Duration::from_millis(150));

        assert_eq!(
            platform.now().duration_since(before),
            Duration::from_millis(150)
        );
    }

    #[test]
    fn shared_state_between_clones() {
        let platform1 = FakePlatform::new();
        let platform2 = platform1.clone();
        let before = platform2.now();

        platform1.advance(Duration::from_secs(2));

        assert_eq!(
            platform2.now().duration_since(before),
            Duration::from_secs(2)
        );
    }
}
