use thiserror::Error;

/// Errors that can occur when creating or updating timers.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// The caller tried to create or assign a timer under the name reserved for
    /// the wrapping operation itself ([`RESERVED_KEY`](crate::RESERVED_KEY)).
    #[error("'{key}' is reserved and cannot be used as a timer key")]
    ReservedKey {
        /// The rejected key.
        key: String,
    },

    /// The caller referenced a timer that does not exist while dynamic timer
    /// creation is restricted.
    #[error("unknown timer key '{key}' (dynamic timer creation is restricted)")]
    UnknownTimerKey {
        /// The key that was not found.
        key: String,
    },
}

/// A specialized `Result` type for timer operations, returning the crate's
/// [`Error`] type as the error value.
pub type Result<T> = std::result::Result<T, Error>;
