/// How a [`Registry`](crate::Registry) picks the timer key for a wrapped function.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
#[non_exhaustive]
pub enum KeyPolicy {
    /// The key is the wrapped function's own identifier, as reported by
    /// [`Callable::name()`](crate::Callable::name).
    ///
    /// Wrapping an already timed function resolves to the same key as the original.
    #[default]
    Derived,

    /// The key is supplied by the caller. Different functions may share one timer
    /// by using the same key.
    Explicit(String),
}

impl KeyPolicy {
    /// Creates an explicit-key policy.
    #[must_use]
    pub fn explicit(key: impl Into<String>) -> Self {
        Self::Explicit(key.into())
    }
}

/// Whether a [`Registry`](crate::Registry) creates timers on first use.
///
/// The only transition is from [`DynamicCreationAllowed`](Self::DynamicCreationAllowed)
/// to [`DynamicCreationRestricted`](Self::DynamicCreationRestricted), via
/// [`Registry::restrict_dynamic_creation()`](crate::Registry::restrict_dynamic_creation).
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
#[non_exhaustive]
pub enum CreationMode {
    /// Referencing an unknown key creates a new timer starting at zero.
    #[default]
    DynamicCreationAllowed,

    /// Referencing an unknown key is an error.
    DynamicCreationRestricted,
}
