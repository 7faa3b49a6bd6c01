//! Accumulates the elapsed time of selected function calls into named timers.
//!
//! This package is a small ad hoc profiling aid: wrap the functions you are curious
//! about, run your program, then print how much time was spent in each of them in
//! total.
//!
//! The core functionality includes:
//! - [`Registry`] - Owns the named timers and wraps functions for timing
//! - [`Timed`] - A wrapped function whose calls are added to a timer
//! - [`RegistryBuilder`] - Configures a registry up front
//! - [`Report`] - Snapshot of the timers for printing or inspection
//!
//! This package is not meant for use in production, serving only as a development tool.
//!
//! # Simple usage
//!
//! By default a wrapped function is timed under its own name:
//!
//! ```
//! use time_tally::Registry;
//!
//! fn fibonacci(n: u64) -> u64 {
//!     if n < 2 { n } else { fibonacci(n - 1) + fibonacci(n - 2) }
//! }
//!
//! # fn main() -> time_tally::Result<()> {
//! let registry = Registry::new();
//! let mut timed_fibonacci = registry.wrap(fibonacci)?;
//!
//! for n in 0..20 {
//!     timed_fibonacci.call((n,))?;
//! }
//!
//! // Prints "fibonacci: <total seconds>".
//! registry.print_all();
//! # Ok(())
//! # }
//! ```
//!
//! # Explicit keys
//!
//! Closures have no meaningful name of their own, and sometimes several functions
//! should feed the same timer. In these cases, supply the key when wrapping:
//!
//! ```
//! use time_tally::Registry;
//!
//! # fn main() -> time_tally::Result<()> {
//! let registry = Registry::new();
//!
//! let mut read = registry.wrap_as("io", |path: &str| path.len())?;
//! let mut write = registry.wrap_as("io", |bytes: &[u8]| bytes.len())?;
//!
//! read.call(("config.toml",))?;
//! write.call((b"hello".as_slice(),))?;
//!
//! assert_eq!(registry.len(), 1);
//! # Ok(())
//! # }
//! ```
//!
//! # Catching typos
//!
//! Timers are normally created on first use. After
//! [`restrict_dynamic_creation()`](Registry::restrict_dynamic_creation), only timers that
//! already exist can be updated and any other key is reported as
//! [`Error::UnknownTimerKey`]. Combine this with [`define()`](Registry::define) to fix
//! the set of timers in advance.
//!
//! # Threading
//!
//! A [`Registry`] can be cloned and shared between threads. Increments are applied
//! under a lock, so concurrent measurements of the same timer are all summed.
//! Measurements are wall-clock time, so timers of functions that run concurrently
//! may add up to more than the elapsed program time.

mod callable;
mod error;
mod key_policy;
mod pal;
mod registry;
mod registry_builder;
mod report;
mod timed;

pub use callable::Callable;
pub use error::{Error, Result};
pub use key_policy::{CreationMode, KeyPolicy};
pub use registry::{RESERVED_KEY, Registry};
pub use registry_builder::RegistryBuilder;
pub use report::{Report, ReportEntry};
pub use timed::Timed;

const ERR_POISONED_LOCK: &str = "encountered poisoned lock - timer state can no longer be trusted";
