use std::time::Instant;

use crate::pal::Platform;

pub(crate) static BUILD_TARGET_PLATFORM: RealPlatform = RealPlatform;

/// Reads the standard library clock.
#[derive(Debug)]
pub(crate) struct RealPlatform;

impl Platform for RealPlatform {
    #[cfg_attr(test, mutants::skip)] // Real time cannot be asserted exactly.
    fn now(&self) -> Instant {
        Instant::now()
    }
}

#[cfg(test)]
#[cfg(not(miri))]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn consecutive_readings_do_not_go_backwards() {
        let first = BUILD_TARGET_PLATFORM.now();
        let second = BUILD_TARGET_PLATFORM.now();

        assert!(second >= first);
    }
}
