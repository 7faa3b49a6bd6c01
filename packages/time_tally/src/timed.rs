use std::borrow::Cow;
use std::fmt;

use crate::{Callable, Registry, Result};

/// A function wrapped by a [`Registry`] so that its calls are timed.
///
/// Every successful [`call()`](Self::call) adds the elapsed time of the wrapped
/// function to the timer identified by [`key()`](Self::key). The function's return
/// value is passed through unchanged.
///
/// If the wrapped function panics, the panic propagates through the wrapper and no
/// time is recorded for that call.
///
/// `Timed` is itself [`Callable`] and reports its key as its name, so wrapping it
/// again with [`Registry::wrap()`] times the same key a second time. Each layer adds
/// its own measurement.
///
/// # Examples
///
/// ```
/// use time_tally::Registry;
///
/// fn double(x: u64) -> u64 {
///     x * 2
/// }
///
/// # fn main() -> time_tally::Result<()> {
/// let registry = Registry::new();
/// let mut timed_double = registry.wrap(double)?;
///
/// assert_eq!(timed_double.key(), "double");
/// assert_eq!(timed_double.call((21,))?, 42);
/// assert!(registry.contains("double"));
/// # Ok(())
/// # }
/// ```
pub struct Timed<C> {
    key: String,
    target: C,
    registry: Registry,
}

impl<C> Timed<C> {
    pub(crate) fn new(key: String, target: C, registry: Registry) -> Self {
        Self {
            key,
            target,
            registry,
        }
    }

    /// The key of the timer that calls are recorded into.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The registry that calls are recorded into.
    #[must_use]
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Unwraps the original function.
    #[must_use]
    pub fn into_inner(self) -> C {
        self.target
    }

    /// Calls the wrapped function with `args` and records its elapsed time.
    ///
    /// The arguments are passed as a tuple: `()` for no arguments, `(a,)` for one,
    /// `(a, b)` for two and so on.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownTimerKey`](crate::Error::UnknownTimerKey) without
    /// calling the function if the timer does not exist and the registry restricts
    /// dynamic timer creation. Errors from an inner `Timed` layer are propagated
    /// and nothing is recorded by this layer.
    pub fn call<Args>(&mut self, args: Args) -> Result<C::Output>
    where
        C: Callable<Args>,
    {
        self.registry.ensure_can_record(&self.key)?;

        let start = self.registry.now();
        let output = self.target.invoke(args)?;
        let elapsed = self.registry.now().saturating_duration_since(start);

        self.registry.increment_by(&self.key, elapsed)?;

        Ok(output)
    }
}

impl<C, Args> Callable<Args> for Timed<C>
where
    C: Callable<Args>,
{
    type Output = C::Output;

    fn invoke(&mut self, args: Args) -> Result<Self::Output> {
        self.call(args)
    }

    fn name(&self) -> Cow<'_, str> {
        Cow::Borrowed(&self.key)
    }
}

impl<C> fmt::Debug for Timed<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Timed")
            .field("key", &self.key)
            .finish_non_exhaustive()
    }
}
