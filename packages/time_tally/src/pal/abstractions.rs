use std::fmt::Debug;
use std::time::Instant;

/// Provides the current time for measuring elapsed durations.
///
/// Only differences between two readings are ever used, so implementations
/// are free to pick any origin.
pub(crate) trait Platform: Debug + Send + Sync + 'static {
    fn now(&self) -> Instant;
}
