use std::fmt;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use foldhash::{HashMap, HashMapExt};

use crate::pal::{Platform, PlatformFacade};
use crate::{
    Callable, CreationMode, ERR_POISONED_LOCK, Error, KeyPolicy, RegistryBuilder, Report,
    ReportEntry, Result, Timed,
};

/// The timer key reserved for the wrapping operation itself.
///
/// Any attempt to create or assign a timer under this key fails with
/// [`Error::ReservedKey`].
pub const RESERVED_KEY: &str = "wrap";

/// Accumulates the elapsed time of wrapped function calls into named timers.
///
/// Each timer is a running total of seconds. Timers are created on first use, or
/// up front via [`define()`](Self::define), and live as long as the registry.
/// There is no reset; to start over, create a new registry.
///
/// Cloning a `Registry` is cheap and the clones share the same timers, so a clone
/// can be handed to every call site that needs one. Separate registries created
/// with [`new()`](Self::new) are fully independent of each other.
///
/// Timers whose key starts with `_` are hidden: they accumulate normally and can
/// be read with [`get()`](Self::get) but are left out of reports and printed output.
///
/// # Examples
///
/// ```
/// use time_tally::Registry;
///
/// fn tokenize(input: &str) -> usize {
///     input.split_whitespace().count()
/// }
///
/// # fn main() -> time_tally::Result<()> {
/// let registry = Registry::new();
/// registry.define(["tokenize", "render"])?;
///
/// let mut timed_tokenize = registry.wrap(tokenize)?;
/// assert_eq!(timed_tokenize.call(("a b c",))?, 3);
///
/// // Prints "tokenize: <seconds>" followed by "render: 0".
/// registry.print_all();
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct Registry {
    state: Arc<Mutex<RegistryState>>,
    platform: PlatformFacade,
}

#[derive(Debug)]
struct RegistryState {
    // In registration order.
    timers: Vec<Timer>,
    positions: HashMap<String, usize>,
    mode: CreationMode,
}

#[derive(Debug)]
struct Timer {
    key: String,
    seconds: f64,
}

impl Registry {
    /// Creates an empty registry that creates timers on first use.
    #[expect(
        clippy::new_without_default,
        reason = "to avoid implying a process-wide default registry, which does not exist"
    )]
    #[must_use]
    pub fn new() -> Self {
        Self::with_platform(PlatformFacade::real())
    }

    /// Starts configuring a registry with pre-defined timers or a restricted
    /// creation mode.
    #[must_use]
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    pub(crate) fn with_platform(platform: PlatformFacade) -> Self {
        Self {
            state: Arc::new(Mutex::new(RegistryState {
                timers: Vec::new(),
                positions: HashMap::new(),
                mode: CreationMode::default(),
            })),
            platform,
        }
    }

    /// Wraps a function so that every call adds its elapsed time to the timer
    /// named after the function.
    ///
    /// This is the default key policy; see [`KeyPolicy::Derived`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::ReservedKey`] if the function's name is [`RESERVED_KEY`].
    pub fn wrap<C, Args>(&self, target: C) -> Result<Timed<C>>
    where
        C: Callable<Args>,
    {
        self.wrap_with(target, KeyPolicy::Derived)
    }

    /// Wraps a function so that every call adds its elapsed time to the timer `key`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ReservedKey`] if `key` is [`RESERVED_KEY`].
    pub fn wrap_as<C, Args>(&self, key: impl Into<String>, target: C) -> Result<Timed<C>>
    where
        C: Callable<Args>,
    {
        self.wrap_with(target, KeyPolicy::Explicit(key.into()))
    }

    /// Wraps a function, resolving its timer key according to `policy`.
    ///
    /// The key is resolved once, here. The timer itself is only created when the
    /// first call completes, unless it was defined in advance.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ReservedKey`] if the resolved key is [`RESERVED_KEY`].
    pub fn wrap_with<C, Args>(&self, target: C, policy: KeyPolicy) -> Result<Timed<C>>
    where
        C: Callable<Args>,
    {
        let key = match policy {
            KeyPolicy::Derived => target.name().into_owned(),
            KeyPolicy::Explicit(key) => key,
        };

        ensure_not_reserved(&key)?;

        tracing::debug!(timer = key.as_str(), "wrapped function for timing");

        Ok(Timed::new(key, target, self.clone()))
    }

    /// Registers timers starting at zero so that they are listed even if never used.
    ///
    /// Timers that already exist keep their accumulated value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ReservedKey`] if any of the names is [`RESERVED_KEY`]. In that
    /// case none of the names are registered.
    pub fn define<I>(&self, names: I) -> Result<()>
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();

        for name in &names {
            ensure_not_reserved(name)?;
        }

        let mut state = self.state.lock().expect(ERR_POISONED_LOCK);

        for name in names {
            if !state.positions.contains_key(&name) {
                tracing::debug!(timer = name.as_str(), "defined timer");
                state.insert(name);
            }
        }

        Ok(())
    }

    /// Makes referencing an unknown timer an error instead of creating it.
    ///
    /// This cannot be undone.
    pub fn restrict_dynamic_creation(&self) {
        let mut state = self.state.lock().expect(ERR_POISONED_LOCK);

        if state.mode != CreationMode::DynamicCreationRestricted {
            tracing::debug!("restricted dynamic timer creation");
            state.mode = CreationMode::DynamicCreationRestricted;
        }
    }

    /// The current timer creation mode.
    #[must_use]
    pub fn creation_mode(&self) -> CreationMode {
        self.state.lock().expect(ERR_POISONED_LOCK).mode
    }

    /// Adds `seconds` to the timer `key`, creating it first if it does not exist and
    /// dynamic creation is allowed.
    ///
    /// Negative or non-finite values are accepted as-is but make the totals
    /// meaningless, so avoid them.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ReservedKey`] if `key` is [`RESERVED_KEY`] and
    /// [`Error::UnknownTimerKey`] if `key` does not exist while dynamic creation is
    /// restricted. The registry is left unchanged in both cases.
    pub fn increment(&self, key: &str, seconds: f64) -> Result<()> {
        let mut state = self.state.lock().expect(ERR_POISONED_LOCK);

        let timer = state.timer_mut(key)?;
        timer.seconds += seconds;

        tracing::trace!(timer = key, seconds, "recorded time");

        Ok(())
    }

    /// Adds `duration` to the timer `key`.
    ///
    /// # Errors
    ///
    /// See [`increment()`](Self::increment).
    pub fn increment_by(&self, key: &str, duration: Duration) -> Result<()> {
        self.increment(key, duration.as_secs_f64())
    }

    /// The accumulated seconds of the timer `key`, if it exists.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<f64> {
        let state = self.state.lock().expect(ERR_POISONED_LOCK);

        state
            .positions
            .get(key)
            .and_then(|&position| state.timers.get(position))
            .map(|timer| timer.seconds)
    }

    /// Whether the timer `key` exists.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.state
            .lock()
            .expect(ERR_POISONED_LOCK)
            .positions
            .contains_key(key)
    }

    /// The number of timers, hidden ones included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.state.lock().expect(ERR_POISONED_LOCK).timers.len()
    }

    /// Whether the registry has no timers at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Takes a snapshot of the visible timers, in registration order.
    #[must_use]
    pub fn to_report(&self) -> Report {
        let state = self.state.lock().expect(ERR_POISONED_LOCK);

        Report::new(
            state
                .timers
                .iter()
                .filter(|timer| !is_hidden(&timer.key))
                .map(|timer| ReportEntry::new(timer.key.clone(), timer.seconds))
                .collect(),
        )
    }

    /// Prints one `<name>: <seconds>` line per visible timer to stdout, in
    /// registration order.
    ///
    /// Prints nothing if there are no visible timers.
    #[cfg_attr(test, mutants::skip)] // Too difficult to test stdout output reliably - manually tested.
    pub fn print_all(&self) {
        self.to_report().print_to_stdout();
    }

    pub(crate) fn now(&self) -> Instant {
        self.platform.now()
    }

    /// Fails if a measurement for `key` could not be recorded, without creating
    /// the timer. Used to reject a call before the wrapped function runs.
    pub(crate) fn ensure_can_record(&self, key: &str) -> Result<()> {
        ensure_not_reserved(key)?;

        let state = self.state.lock().expect(ERR_POISONED_LOCK);

        if state.mode == CreationMode::DynamicCreationRestricted
            && !state.positions.contains_key(key)
        {
            return Err(Error::UnknownTimerKey {
                key: key.to_string(),
            });
        }

        Ok(())
    }
}

impl RegistryState {
    fn timer_mut(&mut self, key: &str) -> Result<&mut Timer> {
        ensure_not_reserved(key)?;

        let position = match self.positions.get(key) {
            Some(&position) => position,
            None => match self.mode {
                CreationMode::DynamicCreationAllowed => {
                    tracing::debug!(timer = key, "created timer on first use");
                    self.insert(key.to_string())
                }
                CreationMode::DynamicCreationRestricted => {
                    return Err(Error::UnknownTimerKey {
                        key: key.to_string(),
                    });
                }
            },
        };

        Ok(self
            .timers
            .get_mut(position)
            .expect("positions only refer to existing timers"))
    }

    fn insert(&mut self, key: String) -> usize {
        let position = self.timers.len();

        self.positions.insert(key.clone(), position);
        self.timers.push(Timer { key, seconds: 0.0 });

        position
    }
}

fn ensure_not_reserved(key: &str) -> Result<()> {
    if key == RESERVED_KEY {
        return Err(Error::ReservedKey {
            key: key.to_string(),
        });
    }

    Ok(())
}

fn is_hidden(key: &str) -> bool {
    key.starts_with('_')
}

impl fmt::Display for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_report())
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::pal::FakePlatform;

    fn create_test_registry() -> Registry {
        Registry::with_platform(PlatformFacade::fake(FakePlatform::new()))
    }

    #[test]
    fn new_registry_is_empty() {
        let registry = create_test_registry();

        assert!(registry.is_empty());
        assert_eq!(registry.len(), 0);
        assert_eq!(
            registry.creation_mode(),
            CreationMode::DynamicCreationAllowed
        );
        assert_eq!(registry.to_string(), "");
    }

    #[test]
    fn increments_sum_from_implicit_zero() {
        let registry = create_test_registry();

        registry.increment("parse", 0.5).unwrap();
        registry.increment("parse", 0.25).unwrap();
        registry.increment("parse", 1.0).unwrap();

        assert_eq!(registry.get("parse"), Some(1.75));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn increment_by_duration_adds_seconds() {
        let registry = create_test_registry();

        registry
            .increment_by("io", Duration::from_millis(1500))
            .unwrap();

        assert_eq!(registry.get("io"), Some(1.5));
    }

    #[test]
    fn negative_increments_are_accepted() {
        let registry = create_test_registry();

        registry.increment("odd", 2.0).unwrap();
        registry.increment("odd", -0.5).unwrap();

        assert_eq!(registry.get("odd"), Some(1.5));
    }

    #[test]
    fn get_unknown_key_is_none() {
        let registry = create_test_registry();

        assert_eq!(registry.get("missing"), None);
        assert!(!registry.contains("missing"));
    }

    #[test]
    fn define_lists_timers_at_zero() {
        let registry = create_test_registry();

        registry.define(["a", "b"]).unwrap();

        assert!(registry.contains("a"));
        assert!(registry.contains("b"));
        assert_eq!(registry.to_string(), "a: 0\nb: 0\n");
    }

    #[test]
    fn define_does_not_reset_existing_timers() {
        let registry = create_test_registry();
        registry.increment("a", 3.0).unwrap();

        registry.define(["a", "b"]).unwrap();

        assert_eq!(registry.get("a"), Some(3.0));
        assert_eq!(registry.get("b"), Some(0.0));
    }

    #[test]
    fn define_with_reserved_name_changes_nothing() {
        let registry = create_test_registry();

        let result = registry.define(["a", RESERVED_KEY, "b"]);

        assert!(matches!(result, Err(Error::ReservedKey { key }) if key == RESERVED_KEY));
        assert!(registry.is_empty());
    }

    #[test]
    fn increment_reserved_key_fails_and_changes_nothing() {
        let registry = create_test_registry();
        registry.increment("a", 1.0).unwrap();

        let result = registry.increment(RESERVED_KEY, 1.0);

        assert!(matches!(result, Err(Error::ReservedKey { .. })));
        assert!(!registry.contains(RESERVED_KEY));
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.to_string(), "a: 1\n");
    }

    #[test]
    fn restricted_registry_rejects_unknown_keys() {
        let registry = create_test_registry();
        registry.define(["known"]).unwrap();

        registry.restrict_dynamic_creation();

        let result = registry.increment("unknown", 1.0);
        assert!(matches!(result, Err(Error::UnknownTimerKey { key }) if key == "unknown"));
        assert!(!registry.contains("unknown"));

        registry.increment("known", 1.0).unwrap();
        assert_eq!(registry.get("known"), Some(1.0));
    }

    #[test]
    fn restriction_is_permanent() {
        let registry = create_test_registry();

        registry.restrict_dynamic_creation();
        registry.restrict_dynamic_creation();

        assert_eq!(
            registry.creation_mode(),
            CreationMode::DynamicCreationRestricted
        );
    }

    #[test]
    fn restricted_registry_still_rejects_reserved_key_first() {
        let registry = create_test_registry();
        registry.restrict_dynamic_creation();

        let result = registry.increment(RESERVED_KEY, 1.0);

        assert!(matches!(result, Err(Error::ReservedKey { .. })));
    }

    #[test]
    fn listing_follows_registration_order() {
        let registry = create_test_registry();

        registry.increment("zeta", 1.0).unwrap();
        registry.define(["alpha"]).unwrap();
        registry.increment("mid", 2.5).unwrap();
        registry.increment("zeta", 1.0).unwrap();

        assert_eq!(registry.to_string(), "zeta: 2\nalpha: 0\nmid: 2.5\n");
    }

    #[test]
    fn hidden_timers_accumulate_but_are_not_listed() {
        let registry = create_test_registry();

        registry.increment("_internal", 1.0).unwrap();
        registry.increment("visible", 2.0).unwrap();

        assert_eq!(registry.get("_internal"), Some(1.0));
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.to_report().len(), 1);
        assert_eq!(registry.to_string(), "visible: 2\n");
    }

    #[test]
    fn clones_share_timers() {
        let registry = create_test_registry();
        let clone = registry.clone();

        clone.increment("shared", 1.0).unwrap();
        registry.increment("shared", 1.0).unwrap();

        assert_eq!(registry.get("shared"), Some(2.0));
        assert_eq!(clone.get("shared"), Some(2.0));
    }

    #[test]
    fn separate_registries_are_independent() {
        let first = create_test_registry();
        let second = create_test_registry();

        first.increment("work", 1.0).unwrap();

        assert!(second.is_empty());
    }

    #[test]
    fn ensure_can_record_does_not_create_timers() {
        let registry = create_test_registry();

        registry.ensure_can_record("lazy").unwrap();
        assert!(!registry.contains("lazy"));

        registry.restrict_dynamic_creation();
        assert!(matches!(
            registry.ensure_can_record("lazy"),
            Err(Error::UnknownTimerKey { .. })
        ));
        assert!(matches!(
            registry.ensure_can_record(RESERVED_KEY),
            Err(Error::ReservedKey { .. })
        ));
    }

    #[test]
    fn concurrent_increments_are_not_lost() {
        let registry = create_test_registry();

        std::thread::scope(|s| {
            for _ in 0..4 {
                let registry = registry.clone();
                s.spawn(move || {
                    for _ in 0..250 {
                        registry.increment("shared", 1.0).unwrap();
                    }
                });
            }
        });

        assert_eq!(registry.get("shared"), Some(1000.0));
    }

    static_assertions::assert_impl_all!(Registry: Send, Sync, Clone);
}
