//! Platform abstraction layer for reading the clock.
//!
//! The real platform reads the standard library clock. Tests swap in a fake
//! platform whose time only moves when the test says so.

mod abstractions;
mod facade;
#[cfg(test)]
mod fake;
mod real;

pub(crate) use abstractions::Platform;
pub(crate) use facade::PlatformFacade;
#[cfg(test)]
pub(crate) use fake::FakePlatform;
pub(crate) use real::{BUILD_TARGET_PLATFORM, RealPlatform};
