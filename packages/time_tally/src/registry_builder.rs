use crate::pal::PlatformFacade;
use crate::{CreationMode, Registry, Result};

/// Configures a [`Registry`] before it is used.
///
/// Use [`Registry::builder()`] to create a new instance of this builder.
///
/// # Examples
///
/// ```
/// use time_tally::{CreationMode, Error, Registry};
///
/// # fn main() -> time_tally::Result<()> {
/// let registry = Registry::builder()
///     .define(["parse", "render"])
///     .restrict_dynamic_creation()
///     .build()?;
///
/// assert_eq!(
///     registry.creation_mode(),
///     CreationMode::DynamicCreationRestricted
/// );
///
/// registry.increment("parse", 0.5)?;
/// assert!(matches!(
///     registry.increment("typo", 0.5),
///     Err(Error::UnknownTimerKey { .. })
/// ));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
#[must_use]
pub struct RegistryBuilder {
    defined: Vec<String>,
    mode: CreationMode,
}

impl RegistryBuilder {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Adds timers that start at zero and are listed even if never used.
    ///
    /// May be called multiple times; the names accumulate.
    pub fn define<I>(mut self, names: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.defined.extend(names.into_iter().map(Into::into));
        self
    }

    /// Starts the registry with dynamic timer creation restricted.
    ///
    /// The restriction is applied after the defined timers are registered, so those
    /// remain usable.
    pub fn restrict_dynamic_creation(self) -> Self {
        Self {
            mode: CreationMode::DynamicCreationRestricted,
            ..self
        }
    }

    /// Creates the registry.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ReservedKey`](crate::Error::ReservedKey) if any defined name
    /// is [`RESERVED_KEY`](crate::RESERVED_KEY).
    pub fn build(self) -> Result<Registry> {
        self.build_on(PlatformFacade::real())
    }

    pub(crate) fn build_on(self, platform: PlatformFacade) -> Result<Registry> {
        let registry = Registry::with_platform(platform);

        registry.define(self.defined)?;

        if self.mode == CreationMode::DynamicCreationRestricted {
            registry.restrict_dynamic_creation();
        }

        Ok(registry)
    }
}
